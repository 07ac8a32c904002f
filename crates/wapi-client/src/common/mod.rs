//! Common utilities for the WAPI client
//!
//! Provides the request vocabulary shared by the builder, the requestor and
//! the connector, plus the default implementations of the first two.

pub mod builder;
pub mod cookies;
pub mod requestor;

pub use builder::WapiRequestBuilder;
pub use cookies::SessionCookieJar;
pub use requestor::WapiHttpRequestor;

use crate::error::WapiError;
use reqwest::Method;
use std::fmt;
use std::str::FromStr;

/// CRUD operation of a WAPI request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestOperation {
    /// Create an object (POST)
    Create,
    /// Read objects (GET)
    Get,
    /// Delete an object (DELETE)
    Delete,
    /// Update an object (PUT)
    Update,
}

impl RequestOperation {
    /// HTTP method the operation is sent with
    pub fn method(self) -> Method {
        match self {
            RequestOperation::Create => Method::POST,
            RequestOperation::Get => Method::GET,
            RequestOperation::Delete => Method::DELETE,
            RequestOperation::Update => Method::PUT,
        }
    }
}

impl fmt::Display for RequestOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestOperation::Create => "create",
            RequestOperation::Get => "get",
            RequestOperation::Delete => "delete",
            RequestOperation::Update => "update",
        };
        f.write_str(name)
    }
}

impl FromStr for RequestOperation {
    type Err = WapiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(RequestOperation::Create),
            "get" => Ok(RequestOperation::Get),
            "delete" => Ok(RequestOperation::Delete),
            "update" => Ok(RequestOperation::Update),
            _ => Err(WapiError::InvalidRequest(format!("unknown request operation '{s}'"))),
        }
    }
}

/// Per-call query options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Route the request to the Grid Master (`_proxy_search=GM`)
    pub force_proxy: bool,
}

impl QueryParams {
    /// Query options, optionally routed to the Grid Master
    pub fn new(force_proxy: bool) -> Self {
        Self { force_proxy }
    }
}
