//! WAPI connector
//!
//! Orchestrates the request builder and the HTTP requestor for each CRUD
//! operation, applies the Grid Master retry policy and decodes responses.

use crate::common::{QueryParams, RequestOperation, WapiHttpRequestor, WapiRequestBuilder};
use crate::config::{HostConfig, TransportConfig};
use crate::error::WapiError;
use crate::models::{MultiRequest, UserProfile, WapiObject};
use crate::wapi_trait::{ConnectorValidator, HttpRequestor, RequestBuilder, WapiConnector};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Connection to a grid
///
/// Every call is tried once as is; if sending fails for any reason it is
/// rebuilt with `_proxy_search=GM` and sent exactly once more, so the Grid
/// Master can answer for a member that could not. A GET that comes back empty
/// is asked again the same way before being reported as "nothing found".
///
/// Without a call timeout (see [`Connector::with_call_timeout`]), a call is
/// bounded only by the sum of the per-request timeouts of its attempts: two
/// for create/update/delete, up to four for a GET.
pub struct Connector {
    builder: Arc<dyn RequestBuilder>,
    requestor: Arc<dyn HttpRequestor>,
    call_timeout: Option<Duration>,
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}

impl Connector {
    /// Connect to a grid with the default builder and requestor
    ///
    /// Fetches the current user profile before returning, so a connector
    /// that exists has working credentials and a reachable grid.
    ///
    /// # Arguments
    /// * `host_config` - Grid host, WAPI version and credentials
    /// * `transport_config` - TLS policy, timeout and pooling
    ///
    /// # Returns
    /// * `Ok(Connector)` - The grid answered the liveness check
    /// * `Err(WapiError)` - The transport could not be built, or the check failed
    pub async fn new(host_config: HostConfig, transport_config: TransportConfig) -> Result<Self, WapiError> {
        let builder = Arc::new(WapiRequestBuilder::new(host_config));
        let requestor = Arc::new(WapiHttpRequestor::new(transport_config)?);
        Self::with_components(builder, requestor, &UserProfileCheck).await
    }

    /// Connect with explicit collaborators
    ///
    /// `validator` runs once against the new connector; its failure is
    /// returned wrapped in [`WapiError::Validation`].
    pub async fn with_components(
        builder: Arc<dyn RequestBuilder>,
        requestor: Arc<dyn HttpRequestor>,
        validator: &dyn ConnectorValidator,
    ) -> Result<Self, WapiError> {
        let connector = Self {
            builder,
            requestor,
            call_timeout: None,
        };

        validator
            .validate(&connector)
            .await
            .map_err(|e| WapiError::Validation(Box::new(e)))?;

        debug!("Connected to the grid");
        Ok(connector)
    }

    /// Bound every call, retries included, by `timeout`
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Call-level deadline, if one is set
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout
    }

    /// Invalidate the session cookie
    ///
    /// Pair with a successful construction once the connector is no longer
    /// needed.
    pub async fn logout(&self) -> Result<(), WapiError> {
        self.with_deadline(self.make_request(RequestOperation::Create, None, "logout", QueryParams::default()))
            .await
            .map(|_| ())
    }

    async fn with_deadline<T, F>(&self, call: F) -> Result<T, WapiError>
    where
        F: Future<Output = Result<T, WapiError>>,
    {
        match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| WapiError::Timeout(limit))?,
            None => call.await,
        }
    }

    /// Send once with `params`, then once more through the Grid Master on any failure
    async fn make_request(
        &self,
        op: RequestOperation,
        obj: Option<&dyn WapiObject>,
        reference: &str,
        params: QueryParams,
    ) -> Result<Vec<u8>, WapiError> {
        let request = self.builder.build_request(op, obj, reference, params)?;

        match self.requestor.send_request(request).await {
            Ok(body) => Ok(body),
            Err(err) => {
                debug!("{} request failed, retrying through the Grid Master: {}", op, err);
                let request = self
                    .builder
                    .build_request(op, obj, reference, QueryParams::new(true))?;
                self.requestor.send_request(request).await
            }
        }
    }

    /// Decode a bare JSON string reference; an empty body is an empty reference
    fn decode_ref(body: &[u8]) -> Result<String, WapiError> {
        if is_blank(body) {
            return Ok(String::new());
        }
        serde_json::from_slice(body).map_err(|e| WapiError::decode(e, body))
    }

    async fn get_inner<T>(&self, obj: &dyn WapiObject, reference: &str) -> Result<Option<T>, WapiError>
    where
        T: DeserializeOwned,
    {
        let mut body = self
            .make_request(RequestOperation::Get, Some(obj), reference, QueryParams::default())
            .await?;

        if is_empty_result(&body)? {
            debug!("Empty {} result, asking the Grid Master", obj.object_type());
            body = self
                .make_request(RequestOperation::Get, Some(obj), reference, QueryParams::new(true))
                .await?;
            if is_empty_result(&body)? {
                return Ok(None);
            }
        }

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| WapiError::decode(e, &body))
    }
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

/// Empty body, `null` or `[]`
fn is_empty_result(body: &[u8]) -> Result<bool, WapiError> {
    if is_blank(body) {
        return Ok(true);
    }
    let value: Value = serde_json::from_slice(body).map_err(|e| WapiError::decode(e, body))?;
    Ok(match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    })
}

#[async_trait::async_trait]
impl WapiConnector for Connector {
    async fn create_object(&self, obj: &dyn WapiObject) -> Result<String, WapiError> {
        let body = self
            .with_deadline(self.make_request(RequestOperation::Create, Some(obj), "", QueryParams::default()))
            .await?;
        Self::decode_ref(&body)
    }

    async fn get_object<T>(&self, obj: &dyn WapiObject, reference: &str) -> Result<Option<T>, WapiError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.with_deadline(self.get_inner(obj, reference)).await
    }

    async fn update_object(&self, obj: &dyn WapiObject, reference: &str) -> Result<String, WapiError> {
        let body = self
            .with_deadline(self.make_request(RequestOperation::Update, Some(obj), reference, QueryParams::default()))
            .await?;
        Self::decode_ref(&body)
    }

    async fn delete_object(&self, reference: &str) -> Result<String, WapiError> {
        let body = self
            .with_deadline(self.make_request(RequestOperation::Delete, None, reference, QueryParams::default()))
            .await?;
        Self::decode_ref(&body)
    }

    async fn create_multi_object(&self, request: &MultiRequest) -> Result<Vec<Map<String, Value>>, WapiError> {
        let body = self
            .with_deadline(self.make_request(RequestOperation::Create, Some(request), "", QueryParams::default()))
            .await?;
        if is_blank(&body) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&body).map_err(|e| WapiError::decode(e, &body))
    }
}

/// Liveness check: fetch the current user profile
#[derive(Debug, Clone, Copy, Default)]
pub struct UserProfileCheck;

#[async_trait::async_trait]
impl ConnectorValidator for UserProfileCheck {
    async fn validate(&self, connector: &Connector) -> Result<(), WapiError> {
        connector
            .get_object::<Vec<UserProfile>>(&UserProfile::default(), "")
            .await
            .map(|_| ())
    }
}

/// Skips the construction-time check
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValidation;

#[async_trait::async_trait]
impl ConnectorValidator for NoValidation {
    async fn validate(&self, _connector: &Connector) -> Result<(), WapiError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ScriptedRequestor, ScriptedResponse};
    use crate::models::{Ea, FixedAddress, Network, NetworkView, RequestBody};
    use reqwest::Method;
    use serde_json::json;

    fn host() -> HostConfig {
        HostConfig::new("172.22.18.66", "2.2", 443, "myname", "mysecrete!")
    }

    async fn connector(requestor: &ScriptedRequestor) -> Connector {
        Connector::with_components(
            Arc::new(WapiRequestBuilder::new(host())),
            Arc::new(requestor.clone()),
            &NoValidation,
        )
        .await
        .unwrap()
    }

    fn network_view() -> NetworkView {
        NetworkView {
            name: "private-view".to_string(),
            ea: Ea::new().with("CMP Type", "OpenStack"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_returns_reference() {
        let requestor = ScriptedRequestor::new()
            .with_response(ScriptedResponse::json(&json!("networkview/abc123:private-view/false")));
        let conn = connector(&requestor).await;

        let reference = conn.create_object(&network_view()).await.unwrap();

        assert_eq!(reference, "networkview/abc123:private-view/false");
        let requests = requestor.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].url.path(), "/wapi/v2.2/networkview");
        assert_eq!(
            requests[0].body_json(),
            Some(json!({"name": "private-view", "extattrs": {"CMP Type": {"value": "OpenStack"}}}))
        );
    }

    #[tokio::test]
    async fn create_with_empty_body_returns_empty_reference() {
        let requestor = ScriptedRequestor::new().with_response(ScriptedResponse::Body(Vec::new()));
        let conn = connector(&requestor).await;

        assert_eq!(conn.create_object(&network_view()).await.unwrap(), "");
        assert_eq!(requestor.request_count(), 1);
    }

    #[tokio::test]
    async fn delete_targets_reference() {
        let reference = "fixedaddress/xyz:12.0.10.1/external";
        let requestor = ScriptedRequestor::new().with_response(ScriptedResponse::json(&json!(reference)));
        let conn = connector(&requestor).await;

        assert_eq!(conn.delete_object(reference).await.unwrap(), reference);

        let requests = requestor.requests();
        assert_eq!(requests[0].method, Method::DELETE);
        assert_eq!(requests[0].url.path(), format!("/wapi/v2.2/{reference}"));
        assert_eq!(requests[0].body, None);
    }

    #[tokio::test]
    async fn failed_send_is_retried_through_grid_master() {
        let reference = "fixedaddress/xyz:12.0.10.1/external";
        let fixed = FixedAddress {
            mac: "aa:bb:cc:dd:ee:ff".to_string(),
            ..Default::default()
        };

        let requestor = ScriptedRequestor::new()
            .with_response(ScriptedResponse::Status(400, "not the master".to_string()))
            .with_response(ScriptedResponse::json(&json!(reference)));
        let conn = connector(&requestor).await;

        assert_eq!(conn.update_object(&fixed, reference).await.unwrap(), reference);

        let requests = requestor.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], requests[1]);
        assert_eq!(requests[1].method, Method::PUT);
    }

    #[tokio::test]
    async fn failed_get_retry_only_adds_proxy_search() {
        let requestor = ScriptedRequestor::new()
            .with_response(ScriptedResponse::Status(502, String::new()))
            .with_response(ScriptedResponse::json(&json!([{"_ref": "network/ZG5z:10.0.0.0/24/default"}])));
        let conn = connector(&requestor).await;
        let template = Network {
            netview_name: "default".to_string(),
            ..Default::default()
        };

        let found: Vec<Network> = conn.get_object(&template, "").await.unwrap().unwrap();
        assert_eq!(found[0].reference, "network/ZG5z:10.0.0.0/24/default");

        let requests = requestor.requests();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].has_proxy_search());
        assert!(requests[1].has_proxy_search());
        assert_eq!(requests[0].body, requests[1].body);

        let first: Vec<_> = requests[0].url.query_pairs().collect();
        let mut second: Vec<_> = requests[1].url.query_pairs().collect();
        second.retain(|(k, _)| k != "_proxy_search");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn retry_stops_after_two_attempts() {
        let requestor = ScriptedRequestor::new()
            .with_response(ScriptedResponse::Status(500, "first".to_string()))
            .with_response(ScriptedResponse::Status(500, "second".to_string()))
            .with_response(ScriptedResponse::json(&json!("never")));
        let conn = connector(&requestor).await;

        let err = conn.create_object(&network_view()).await.unwrap_err();

        match err {
            WapiError::Api { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, "second");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(requestor.request_count(), 2);
    }

    #[tokio::test]
    async fn empty_get_is_asked_again_through_grid_master() {
        let requestor = ScriptedRequestor::new()
            .with_response(ScriptedResponse::json(&json!([])))
            .with_response(ScriptedResponse::json(&json!([
                {"_ref": "networkview/ZG5z:private-view/false", "name": "private-view"}
            ])));
        let conn = connector(&requestor).await;

        let found: Option<Vec<NetworkView>> = conn.get_object(&NetworkView::default(), "").await.unwrap();

        assert_eq!(found.unwrap()[0].name, "private-view");
        let requests = requestor.requests();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].has_proxy_search());
        assert!(requests[1].has_proxy_search());
    }

    #[tokio::test]
    async fn still_empty_get_is_not_found() {
        let requestor = ScriptedRequestor::new()
            .with_response(ScriptedResponse::json(&json!(null)))
            .with_response(ScriptedResponse::json(&json!([])));
        let conn = connector(&requestor).await;

        let found: Option<Vec<NetworkView>> = conn.get_object(&NetworkView::default(), "").await.unwrap();

        assert!(found.is_none());
        assert_eq!(requestor.request_count(), 2);
    }

    #[tokio::test]
    async fn malformed_response_is_a_decode_error() {
        let requestor = ScriptedRequestor::new().with_response(ScriptedResponse::Body(b"<html>".to_vec()));
        let conn = connector(&requestor).await;

        let err = conn.delete_object("network/ZG5z:10.0.0.0/24/default").await.unwrap_err();

        assert!(matches!(err, WapiError::Decode { .. }));
        assert_eq!(requestor.request_count(), 1);
    }

    #[tokio::test]
    async fn logout_posts_without_body() {
        let requestor = ScriptedRequestor::new().with_response(ScriptedResponse::Body(Vec::new()));
        let conn = connector(&requestor).await;

        conn.logout().await.unwrap();

        let requests = requestor.requests();
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].url.path(), "/wapi/v2.2/logout");
        assert_eq!(requests[0].body, None);
    }

    #[tokio::test]
    async fn multi_object_returns_result_maps() {
        let requestor = ScriptedRequestor::new()
            .with_response(ScriptedResponse::json(&json!([{"_ref": "network/ZG5z:10.0.0.0/24/default"}])));
        let conn = connector(&requestor).await;
        let request = MultiRequest::new(vec![RequestBody {
            method: "GET".to_string(),
            object: "network".to_string(),
            ..Default::default()
        }]);

        let results = conn.create_multi_object(&request).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["_ref"], "network/ZG5z:10.0.0.0/24/default");
        assert_eq!(requestor.requests()[0].url.path(), "/wapi/v2.2/request");
    }

    #[tokio::test]
    async fn liveness_check_fetches_user_profile() {
        let requestor = ScriptedRequestor::new()
            .with_response(ScriptedResponse::json(&json!([{"_ref": "userprofile/ZG5z:admin", "name": "admin"}])));

        Connector::with_components(
            Arc::new(WapiRequestBuilder::new(host())),
            Arc::new(requestor.clone()),
            &UserProfileCheck,
        )
        .await
        .unwrap();

        let requests = requestor.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(requests[0].url.path(), "/wapi/v2.2/userprofile");
        assert_eq!(requests[0].url.query(), Some("_return_fields=name"));
    }

    #[tokio::test]
    async fn failed_liveness_check_fails_construction() {
        let requestor = ScriptedRequestor::new()
            .with_response(ScriptedResponse::Status(401, "Authorization Required".to_string()))
            .with_response(ScriptedResponse::Status(401, "Authorization Required".to_string()));

        let err = Connector::with_components(
            Arc::new(WapiRequestBuilder::new(host())),
            Arc::new(requestor.clone()),
            &UserProfileCheck,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, WapiError::Validation(_)));
        assert_eq!(err.status(), Some(401));
        assert_eq!(requestor.request_count(), 2);
    }

    #[tokio::test]
    async fn call_timeout_bounds_retries() {
        let requestor = ScriptedRequestor::new()
            .with_delay(Duration::from_millis(200))
            .with_response(ScriptedResponse::Status(500, String::new()))
            .with_response(ScriptedResponse::json(&json!("late")));
        let conn = connector(&requestor).await.with_call_timeout(Duration::from_millis(300));

        let err = conn.create_object(&network_view()).await.unwrap_err();

        assert!(matches!(err, WapiError::Timeout(limit) if limit == Duration::from_millis(300)));
    }
}
