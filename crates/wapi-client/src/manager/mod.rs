//! Resource operations
//!
//! [`ObjectManager`] maps business parameters onto connector calls. Every
//! operation follows one of three shapes:
//! - create: build the object (tagged with the basic cloud EAs), create it
//!   and keep the returned reference
//! - search: fill a template with filter fields, fetch the matches and keep
//!   the first one
//! - by reference: get or delete the object at a reference
//!
//! The operations are grouped by domain:
//! - `ipam.rs` - network views, networks, containers, fixed addresses, EA definitions
//! - `dns.rs` - host, A, CNAME, TXT and PTR records, authoritative and delegated zones
//! - `grid.rs` - grid administration and multi-object requests

mod dns;
mod grid;
mod ipam;

use crate::error::WapiError;
use crate::models::{ea_bool, Ea, WapiObject};
use crate::wapi_trait::WapiConnector;
use serde::de::DeserializeOwned;

/// EA marking an object as owned by the cloud API
pub const EA_CLOUD_API_OWNED: &str = "Cloud API Owned";
/// EA naming the cloud management platform
pub const EA_CMP_TYPE: &str = "CMP Type";
/// EA carrying the tenant of the object
pub const EA_TENANT_ID: &str = "Tenant ID";
pub const EA_NETWORK_NAME: &str = "Network Name";
pub const EA_VM_ID: &str = "VM ID";
pub const EA_VM_NAME: &str = "VM Name";

/// MAC used for fixed addresses allocated without one
pub const ZERO_MAC: &str = "00:00:00:00:00:00";

/// High-level operations on grid resources
#[derive(Debug, Clone)]
pub struct ObjectManager<C> {
    connector: C,
    cmp_type: String,
    tenant_id: String,
    omit_cloud_attrs: bool,
}

impl<C: WapiConnector> ObjectManager<C> {
    /// Create a manager
    ///
    /// # Arguments
    /// * `connector` - Connection used for every call
    /// * `cmp_type` - Cloud management platform recorded in `CMP Type`
    /// * `tenant_id` - Tenant recorded in `Tenant ID`
    pub fn new(connector: C, cmp_type: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            connector,
            cmp_type: cmp_type.into(),
            tenant_id: tenant_id.into(),
            omit_cloud_attrs: false,
        }
    }

    /// Stop tagging created objects with the cloud EAs
    pub fn with_omit_cloud_attrs(mut self, omit: bool) -> Self {
        self.omit_cloud_attrs = omit;
        self
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn cmp_type(&self) -> &str {
        &self.cmp_type
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Cloud EAs attached to created objects; empty when cloud attributes are omitted
    pub fn basic_ea(&self, cloud_api_owned: bool) -> Ea {
        if self.omit_cloud_attrs {
            return Ea::new();
        }
        Ea::new()
            .with(EA_CLOUD_API_OWNED, ea_bool(cloud_api_owned))
            .with(EA_CMP_TYPE, self.cmp_type.as_str())
            .with(EA_TENANT_ID, self.tenant_id.as_str())
    }

    /// Cloud-owned basic EAs overridden by `ea`
    pub fn extend_ea(&self, ea: Ea) -> Ea {
        let mut eas = self.basic_ea(true);
        eas.extend(ea.iter().map(|(k, v)| (k.clone(), v.clone())));
        eas
    }

    /// First object matching `template`
    async fn find_first<T>(&self, template: &dyn WapiObject) -> Result<Option<T>, WapiError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        Ok(self
            .connector
            .get_object::<Vec<T>>(template, "")
            .await?
            .and_then(|found| found.into_iter().next()))
    }

    /// Every object matching `template`
    async fn find_all<T>(&self, template: &dyn WapiObject) -> Result<Vec<T>, WapiError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        Ok(self
            .connector
            .get_object::<Vec<T>>(template, "")
            .await?
            .unwrap_or_default())
    }

    /// Object at `reference`, decoded with the return fields of `template`
    async fn find_by_ref<T>(&self, template: &dyn WapiObject, reference: &str) -> Result<Option<T>, WapiError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.connector.get_object::<T>(template, reference).await
    }
}

/// Address that makes the grid pick the next free IP of `cidr`
fn next_available_ip(cidr: &str, netview: &str) -> String {
    format!("func:nextavailableip:{cidr},{netview}")
}

/// `ip_addr`, or the next free IP of `cidr` when it is empty
fn ip_or_next_available(ip_addr: &str, cidr: &str, netview: &str) -> String {
    if ip_addr.is_empty() {
        next_available_ip(cidr, netview)
    } else {
        ip_addr.to_string()
    }
}

/// Basic EAs plus the VM identity, or `None` when neither is given
fn vm_ea(basic: Ea, vm_id: &str, vm_name: &str) -> Option<Ea> {
    if vm_id.is_empty() && vm_name.is_empty() {
        return None;
    }
    let mut ea = basic;
    if !vm_id.is_empty() {
        ea.insert(EA_VM_ID.to_string(), vm_id.into());
    }
    if !vm_name.is_empty() {
        ea.insert(EA_VM_NAME.to_string(), vm_name.into());
    }
    Some(ea)
}
