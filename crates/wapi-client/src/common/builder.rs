//! Default request builder
//!
//! Builds WAPI requests from a [`HostConfig`]. Pure: nothing here touches the
//! network.

use crate::common::{QueryParams, RequestOperation};
use crate::config::HostConfig;
use crate::error::WapiError;
use crate::models::WapiObject;
use crate::wapi_trait::RequestBuilder;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Body, Request, Url};
use serde_json::Value;

/// Builds requests against the host described by a [`HostConfig`]
#[derive(Debug, Clone)]
pub struct WapiRequestBuilder {
    host_config: HostConfig,
}

impl WapiRequestBuilder {
    /// Create a builder for the grid described by `host_config`
    pub fn new(host_config: HostConfig) -> Self {
        Self { host_config }
    }

    /// Host the requests are built for
    pub fn host_config(&self) -> &HostConfig {
        &self.host_config
    }

    fn basic_auth(&self) -> Result<HeaderValue, WapiError> {
        let credentials = format!("{}:{}", self.host_config.username, self.host_config.password);
        let mut value = HeaderValue::from_str(&format!("Basic {}", STANDARD.encode(credentials)))
            .map_err(|e| WapiError::InvalidRequest(format!("invalid credentials header: {e}")))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl RequestBuilder for WapiRequestBuilder {
    fn build_url(
        &self,
        op: RequestOperation,
        object_type: &str,
        reference: &str,
        return_fields: &[String],
        params: QueryParams,
    ) -> Result<Url, WapiError> {
        let base = format!("https://{}:{}/", self.host_config.host, self.host_config.port);
        let mut url =
            Url::parse(&base).map_err(|e| WapiError::InvalidRequest(format!("invalid URL '{base}': {e}")))?;

        // Each part of the reference is pushed as its own segment so that
        // '#', '?' and '%' in readable parts are escaped
        let target = if reference.is_empty() { object_type } else { reference };
        url.path_segments_mut()
            .map_err(|()| WapiError::InvalidRequest(format!("'{base}' cannot carry a path")))?
            .pop_if_empty()
            .push("wapi")
            .push(&format!("v{}", self.host_config.version))
            .extend(target.split('/'));

        if op == RequestOperation::Get {
            // Keys in lexical order
            let mut query: Vec<(&str, String)> = Vec::new();
            if params.force_proxy {
                query.push(("_proxy_search", "GM".to_string()));
            }
            if !return_fields.is_empty() {
                query.push(("_return_fields", return_fields.join(",")));
            }
            if !query.is_empty() {
                let encoded: Vec<String> = query
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                    .collect();
                url.set_query(Some(&encoded.join("&")));
            }
        }

        Ok(url)
    }

    fn build_body(&self, op: RequestOperation, obj: &dyn WapiObject) -> Result<Vec<u8>, WapiError> {
        let mut body = obj.to_json()?;

        let ea_search = obj.ea_search();
        if op == RequestOperation::Get && !ea_search.is_empty() {
            let filters = serde_json::to_value(ea_search)?;
            match (&mut body, filters) {
                (Value::Object(fields), Value::Object(filters)) => fields.extend(filters),
                _ => {
                    return Err(WapiError::InvalidRequest(format!(
                        "cannot apply EA search to a non-object '{}' body",
                        obj.object_type()
                    )));
                }
            }
        }

        Ok(serde_json::to_vec(&body)?)
    }

    fn build_request(
        &self,
        op: RequestOperation,
        obj: Option<&dyn WapiObject>,
        reference: &str,
        params: QueryParams,
    ) -> Result<Request, WapiError> {
        let object_type = obj.map(|o| o.object_type()).unwrap_or_default();
        let return_fields = obj.map(|o| o.return_fields()).unwrap_or_default();

        let url = self.build_url(op, object_type, reference, &return_fields, params)?;

        let mut request = Request::new(op.method(), url);
        let headers = request.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, self.basic_auth()?);

        if let Some(obj) = obj {
            *request.body_mut() = Some(Body::from(self.build_body(op, obj)?));
        }

        Ok(request)
    }
}
