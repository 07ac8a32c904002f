//! WAPI Probe
//!
//! Connects to a grid with the `WAPI_*` environment configuration, prints
//! the grid, its members and its licenses, then logs out.
//!
//! Set `RUST_LOG=wapi_client=debug` to see every request and retry.

use anyhow::Context;
use tracing::{info, warn};
use wapi_client::{Connector, HostConfig, ObjectManager, TransportConfig, WapiError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let host_config = HostConfig::from_env().context("loading host configuration")?;
    let transport_config = TransportConfig::from_env().context("loading transport configuration")?;

    info!("Configuration:");
    info!("  Grid: {}:{}", host_config.host, host_config.port);
    info!("  WAPI version: {}", host_config.version);
    info!("  TLS verification: {:?}", transport_config.verify_mode);

    let connector = Connector::new(host_config, transport_config)
        .await
        .context("connecting to the grid")?;
    let manager = ObjectManager::new(connector, "", "").with_omit_cloud_attrs(true);

    let result = report(&manager).await;
    let logout = manager.connector().logout().await;
    finish(result, logout)
}

/// The report error wins over a logout error, which is only logged then
fn finish(result: anyhow::Result<()>, logout: Result<(), WapiError>) -> anyhow::Result<()> {
    match (result, logout) {
        (Err(e), Err(logout_err)) => {
            warn!("Failed to log out: {}", logout_err);
            Err(e)
        }
        (Ok(()), Err(logout_err)) => Err(anyhow::Error::new(logout_err).context("logging out")),
        (result, Ok(())) => result,
    }
}

async fn report(manager: &ObjectManager<Connector>) -> anyhow::Result<()> {
    for grid in manager.get_grid_info().await.context("fetching grid")? {
        println!("grid {}", grid.name);
    }

    for member in manager.get_all_members().await.context("fetching members")? {
        let status = member
            .node_info
            .iter()
            .flat_map(|node| node.service_status.iter())
            .find(|s| s.service == "NODE_STATUS")
            .map(|s| s.status.as_str())
            .unwrap_or("UNKNOWN");
        println!("member {} ({}) {}", member.host_name, member.platform, status);
    }

    let licenses = manager.get_license().await.context("fetching member licenses")?;
    let grid_licenses = manager.get_grid_license().await.context("fetching grid licenses")?;
    for license in licenses.iter().chain(grid_licenses.iter()) {
        let expiry = license
            .expires_at()
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "never".to_string());
        println!("license {} {} expires {}", license.license_type, license.expiration_status, expiry);
    }

    Ok(())
}
