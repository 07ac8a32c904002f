//! Grid WAPI Client
//!
//! A Rust client library for the grid appliance WAPI (REST API).
//! Provides typed models and operations for IPAM, DNS records, zones and
//! grid administration.
//!
//! # Example
//!
//! ```no_run
//! use wapi_client::{Connector, Ea, HostConfig, ObjectManager, TransportConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Connect; this checks credentials and reachability
//! let connector = Connector::new(
//!     HostConfig::new("gm.example.com", "2.5", 443, "admin", "secret"),
//!     TransportConfig::new("true", 60, 10)?,
//! )
//! .await?;
//!
//! let manager = ObjectManager::new(connector, "Kubernetes", "tenant-1");
//!
//! // Reserve the next free address of a network
//! let fixed = manager
//!     .allocate_ip("default", "10.0.0.0/24", "", "aa:bb:cc:dd:ee:ff", "vm-1", Ea::new())
//!     .await?;
//! println!("allocated {}", fixed.ip_address);
//!
//! manager.connector().logout().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Grid Master retry**: failed calls are retried once with `_proxy_search=GM`
//! - **Empty result retry**: empty GET results are re-asked through the Grid Master
//! - **EA search**: filter GETs by extensible attributes
//! - **Session cookies**: the grid's auth cookie is kept between calls, never for a public suffix
//! - **Test doubles**: `test-util` exposes a scripted requestor and a mock connector

pub mod client;
pub mod common;
pub mod config;
pub mod error;
pub mod manager;
pub mod models;
#[path = "trait.rs"]
pub mod wapi_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::{Connector, NoValidation, UserProfileCheck};
pub use common::{QueryParams, RequestOperation, SessionCookieJar, WapiHttpRequestor, WapiRequestBuilder};
pub use config::{HostConfig, TransportConfig, VerifyMode};
pub use error::WapiError;
pub use manager::ObjectManager;
pub use models::*;
pub use wapi_trait::{ConnectorValidator, HttpRequestor, RequestBuilder, WapiConnector};
#[cfg(any(test, feature = "test-util"))]
pub use mock::{MockConnector, ScriptedRequestor};
