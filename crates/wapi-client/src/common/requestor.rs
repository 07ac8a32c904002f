//! Default HTTP requestor
//!
//! Owns the pooled reqwest client, its cookie jar and the TLS trust policy.
//! The WAPI answers a successful login with a session cookie; keeping it in
//! a [`SessionCookieJar`] spares the grid from re-authenticating every request.

use crate::common::SessionCookieJar;
use crate::config::{TransportConfig, VerifyMode};
use crate::error::WapiError;
use crate::wapi_trait::HttpRequestor;
use reqwest::{Client, Method, Request, StatusCode};
use std::sync::Arc;
use tracing::debug;

/// Sends WAPI requests over a shared, pooled HTTP client
///
/// Cloning is cheap: clones share the connection pool and the cookie jar.
#[derive(Debug, Clone)]
pub struct WapiHttpRequestor {
    client: Client,
}

impl WapiHttpRequestor {
    /// Create a requestor from a transport configuration
    ///
    /// # Arguments
    /// * `config` - TLS policy, timeout and pooling parameters
    ///
    /// # Returns
    /// * `Ok(WapiHttpRequestor)` - Ready to send
    /// * `Err(WapiError)` - If the HTTP client cannot be built
    pub fn new(config: TransportConfig) -> Result<Self, WapiError> {
        let mut builder = Client::builder()
            .cookie_provider(Arc::new(SessionCookieJar::new()))
            .pool_max_idle_per_host(config.pool_connections)
            .timeout(config.request_timeout);

        match config.verify_mode {
            VerifyMode::Off => builder = builder.danger_accept_invalid_certs(true),
            VerifyMode::On => {}
            VerifyMode::CustomCa(certs) => {
                for cert in certs {
                    builder = builder.add_root_certificate(cert);
                }
            }
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an already configured reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

/// 200 for any method, 201 only for a POST
fn is_success(method: &Method, status: StatusCode) -> bool {
    status == StatusCode::OK || (status == StatusCode::CREATED && method == Method::POST)
}

#[async_trait::async_trait]
impl HttpRequestor for WapiHttpRequestor {
    async fn send_request(&self, request: Request) -> Result<Vec<u8>, WapiError> {
        let method = request.method().clone();
        debug!("{} {}", method, request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();

        if !is_success(&method, status) {
            let body = response.text().await.unwrap_or_default();
            return Err(WapiError::Api {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
