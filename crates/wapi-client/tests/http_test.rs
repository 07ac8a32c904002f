//! HTTP-level tests of the requestor and the connector against a local server

use reqwest::{Method, Request, Url};
use serde_json::json;
use std::sync::Arc;
use wapi_client::{
    Connector, HostConfig, HttpRequestor, NetworkView, QueryParams, RequestBuilder,
    RequestOperation, TransportConfig, UserProfileCheck, WapiConnector, WapiError,
    WapiHttpRequestor, WapiObject, WapiRequestBuilder,
};
use wiremock::matchers::{basic_auth, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds WAPI requests against the plain HTTP mock server
struct PlainHttpBuilder {
    inner: WapiRequestBuilder,
}

impl PlainHttpBuilder {
    fn new(server: &MockServer) -> Self {
        Self::with_port(server.address().port())
    }

    fn with_port(port: u16) -> Self {
        let host = HostConfig::new("127.0.0.1", "2.5", port, "admin", "s3cret");
        Self {
            inner: WapiRequestBuilder::new(host),
        }
    }
}

impl RequestBuilder for PlainHttpBuilder {
    fn build_url(
        &self,
        op: RequestOperation,
        object_type: &str,
        reference: &str,
        return_fields: &[String],
        params: QueryParams,
    ) -> Result<Url, WapiError> {
        let mut url = self.inner.build_url(op, object_type, reference, return_fields, params)?;
        url.set_scheme("http").expect("http scheme");
        Ok(url)
    }

    fn build_body(&self, op: RequestOperation, obj: &dyn WapiObject) -> Result<Vec<u8>, WapiError> {
        self.inner.build_body(op, obj)
    }

    fn build_request(
        &self,
        op: RequestOperation,
        obj: Option<&dyn WapiObject>,
        reference: &str,
        params: QueryParams,
    ) -> Result<Request, WapiError> {
        let mut request = self.inner.build_request(op, obj, reference, params)?;
        request.url_mut().set_scheme("http").expect("http scheme");
        Ok(request)
    }
}

fn requestor() -> WapiHttpRequestor {
    WapiHttpRequestor::new(TransportConfig::default()).expect("requestor")
}

fn request(server: &MockServer, op: RequestOperation, reference: &str) -> Request {
    PlainHttpBuilder::new(server)
        .build_request(op, None, reference, QueryParams::default())
        .expect("request")
}

async fn mount_user_profile(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/wapi/v2.5/userprofile"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "ibapauth=session-1; Path=/")
                .set_body_json(json!([{"_ref": "userprofile/YWRtaW4:admin", "name": "admin"}])),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn connect(server: &MockServer) -> Connector {
    Connector::with_components(
        Arc::new(PlainHttpBuilder::new(server)),
        Arc::new(requestor()),
        &UserProfileCheck,
    )
    .await
    .expect("connector")
}

#[tokio::test]
async fn created_post_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wapi/v2.5/logout"))
        .respond_with(ResponseTemplate::new(201).set_body_string("\"ok\""))
        .expect(1)
        .mount(&server)
        .await;

    let body = requestor()
        .send_request(request(&server, RequestOperation::Create, "logout"))
        .await
        .expect("response");

    assert_eq!(body, b"\"ok\"");
}

#[tokio::test]
async fn created_get_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(201).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let err = requestor()
        .send_request(request(&server, RequestOperation::Get, "grid"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(201));
}

#[tokio::test]
async fn error_status_carries_reason_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(400).set_body_string("{\"Error\": \"AdmConDataNotFoundError\"}"))
        .expect(1)
        .mount(&server)
        .await;

    let err = requestor()
        .send_request(request(&server, RequestOperation::Delete, "network/ZG5z:10.0.0.0/24/default"))
        .await
        .unwrap_err();

    match err {
        WapiError::Api { status, reason, body } => {
            assert_eq!(status, 400);
            assert_eq!(reason, "Bad Request");
            assert!(body.contains("AdmConDataNotFoundError"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_grid_is_a_transport_error() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("free port")
        .port();
    let req = PlainHttpBuilder::with_port(port)
        .build_request(RequestOperation::Get, None, "grid", QueryParams::default())
        .expect("request");

    let err = requestor().send_request(req).await.unwrap_err();

    assert!(matches!(err, WapiError::Http(_)));
}

#[tokio::test]
async fn connector_round_trip() {
    let server = MockServer::start().await;
    mount_user_profile(&server).await;

    Mock::given(method("POST"))
        .and(path("/wapi/v2.5/networkview"))
        .and(basic_auth("admin", "s3cret"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "private-view"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!("networkview/abc123:private-view/false")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/wapi/v2.5/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let conn = connect(&server).await;
    let view = NetworkView {
        name: "private-view".to_string(),
        ..Default::default()
    };

    let reference = conn.create_object(&view).await.expect("create");
    assert_eq!(reference, "networkview/abc123:private-view/false");

    conn.logout().await.expect("logout");
}

#[tokio::test]
async fn session_cookie_is_sent_back() {
    let server = MockServer::start().await;
    mount_user_profile(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/wapi/v2.5/networkview/abc123:private-view/false"))
        .and(header("cookie", "ibapauth=session-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("networkview/abc123:private-view/false")))
        .expect(1)
        .mount(&server)
        .await;

    let conn = connect(&server).await;
    let deleted = conn
        .delete_object("networkview/abc123:private-view/false")
        .await
        .expect("delete");

    assert_eq!(deleted, "networkview/abc123:private-view/false");
}

#[tokio::test]
async fn reference_with_reserved_characters_reaches_its_resource() {
    let server = MockServer::start().await;
    mount_user_profile(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/wapi/v2.5/networkview/abc123:lab%231/false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("networkview/abc123:lab#1/false")))
        .expect(1)
        .mount(&server)
        .await;

    let conn = connect(&server).await;
    let deleted = conn
        .delete_object("networkview/abc123:lab#1/false")
        .await
        .expect("delete");

    assert_eq!(deleted, "networkview/abc123:lab#1/false");
}

#[tokio::test]
async fn failing_member_is_retried_through_grid_master() {
    let server = MockServer::start().await;
    mount_user_profile(&server).await;

    Mock::given(method("GET"))
        .and(path("/wapi/v2.5/networkview"))
        .and(query_param("_proxy_search", "GM"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_ref": "networkview/abc123:private-view/false", "name": "private-view"}
        ])))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wapi/v2.5/networkview"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let conn = connect(&server).await;
    let found: Vec<NetworkView> = conn
        .get_object(&NetworkView::default(), "")
        .await
        .expect("get")
        .expect("results");

    assert_eq!(found[0].name, "private-view");
}

#[tokio::test]
async fn empty_result_is_asked_again_through_grid_master() {
    let server = MockServer::start().await;
    mount_user_profile(&server).await;

    Mock::given(method("GET"))
        .and(path("/wapi/v2.5/networkview"))
        .and(query_param("_proxy_search", "GM"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wapi/v2.5/networkview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let conn = connect(&server).await;
    let found: Option<Vec<NetworkView>> = conn.get_object(&NetworkView::default(), "").await.expect("get");

    assert!(found.is_none());
    assert_eq!(
        server
            .received_requests()
            .await
            .expect("recorded")
            .iter()
            .filter(|r| r.method.as_str() == Method::GET.as_str() && r.url.path() == "/wapi/v2.5/networkview")
            .count(),
        2
    );
}
