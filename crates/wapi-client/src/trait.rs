//! Capability traits of the WAPI client
//!
//! The connector only talks to its collaborators through these traits, so the
//! request builder, the HTTP requestor and the construction-time check can be
//! swapped for test doubles or alternate transports. [`WapiConnector`] is the
//! seam the object manager is written against.

use crate::client::Connector;
use crate::common::{QueryParams, RequestOperation};
use crate::error::WapiError;
use crate::models::{MultiRequest, WapiObject};
use reqwest::{Request, Url};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Turns a CRUD operation on a domain object into an HTTP request
pub trait RequestBuilder: Send + Sync {
    /// URL of the request: `https://{host}:{port}/wapi/v{version}/{ref or type}`
    ///
    /// The reference is escaped segment by segment, so the decoded path always
    /// ends with the reference as given.
    fn build_url(
        &self,
        op: RequestOperation,
        object_type: &str,
        reference: &str,
        return_fields: &[String],
        params: QueryParams,
    ) -> Result<Url, WapiError>;

    /// JSON body for `obj`, with the EA search filter merged in on a GET
    fn build_body(&self, op: RequestOperation, obj: &dyn WapiObject) -> Result<Vec<u8>, WapiError>;

    /// Complete request, ready to be sent
    fn build_request(
        &self,
        op: RequestOperation,
        obj: Option<&dyn WapiObject>,
        reference: &str,
        params: QueryParams,
    ) -> Result<Request, WapiError>;
}

/// Sends built requests to the grid
#[async_trait::async_trait]
pub trait HttpRequestor: Send + Sync {
    /// Send `request` and return the response body on success
    ///
    /// Success is HTTP 200 for any method, or HTTP 201 for a POST.
    async fn send_request(&self, request: Request) -> Result<Vec<u8>, WapiError>;
}

/// CRUD operations against the WAPI
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait WapiConnector: Send + Sync {
    /// Create `obj` and return its new reference (empty if the grid sent no body)
    async fn create_object(&self, obj: &dyn WapiObject) -> Result<String, WapiError>;

    /// Fetch objects matching `obj`, or the single object at `reference`
    ///
    /// `Ok(None)` means the grid returned nothing, even after asking the
    /// Grid Master.
    async fn get_object<T>(&self, obj: &dyn WapiObject, reference: &str) -> Result<Option<T>, WapiError>
    where
        T: DeserializeOwned + Send + 'static;

    /// Update the object at `reference` with the fields of `obj`
    async fn update_object(&self, obj: &dyn WapiObject, reference: &str) -> Result<String, WapiError>;

    /// Delete the object at `reference`
    async fn delete_object(&self, reference: &str) -> Result<String, WapiError>;

    /// Run a multi-object request and return the per-operation results
    async fn create_multi_object(&self, request: &MultiRequest) -> Result<Vec<Map<String, Value>>, WapiError>;
}

/// Check run once when a [`Connector`] is built
#[async_trait::async_trait]
pub trait ConnectorValidator: Send + Sync {
    /// Fail if `connector` cannot reach the grid with its credentials
    async fn validate(&self, connector: &Connector) -> Result<(), WapiError>;
}
