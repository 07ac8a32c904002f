//! Scripted HTTP requestor

use super::lock;
use crate::error::WapiError;
use crate::wapi_trait::HttpRequestor;
use reqwest::header::HeaderMap;
use reqwest::{Method, Request, StatusCode, Url};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Response replayed by a [`ScriptedRequestor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedResponse {
    /// Successful send with this body
    Body(Vec<u8>),
    /// Failed send with this status code and body
    Status(u16, String),
}

impl ScriptedResponse {
    /// Successful send with a JSON body
    pub fn json(value: &Value) -> Self {
        ScriptedResponse::Body(value.to_string().into_bytes())
    }
}

/// A request as seen by a [`ScriptedRequestor`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl RecordedRequest {
    /// Whether the request was routed to the Grid Master
    pub fn has_proxy_search(&self) -> bool {
        self.url
            .query_pairs()
            .any(|(k, v)| k == "_proxy_search" && v == "GM")
    }

    /// Body decoded as JSON, if there is one and it parses
    pub fn body_json(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }
}

/// Records requests and answers them from a queue
///
/// Clones share the queue and the record. Once the queue is exhausted every
/// send fails with a 500.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRequestor {
    responses: Arc<Mutex<VecDeque<ScriptedResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    delay: Option<Duration>,
}

impl ScriptedRequestor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response
    pub fn with_response(self, response: ScriptedResponse) -> Self {
        self.push(response);
        self
    }

    /// Wait this long before answering each request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a response on a shared handle
    pub fn push(&self, response: ScriptedResponse) {
        lock(&self.responses).push_back(response);
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait::async_trait]
impl HttpRequestor for ScriptedRequestor {
    async fn send_request(&self, request: Request) -> Result<Vec<u8>, WapiError> {
        lock(&self.requests).push(RecordedRequest {
            method: request.method().clone(),
            url: request.url().clone(),
            headers: request.headers().clone(),
            body: request.body().and_then(|b| b.as_bytes()).map(<[u8]>::to_vec),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = lock(&self.responses).pop_front();
        match next {
            Some(ScriptedResponse::Body(body)) => Ok(body),
            Some(ScriptedResponse::Status(status, body)) => Err(WapiError::Api {
                status,
                reason: StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or_default()
                    .to_string(),
                body,
            }),
            None => Err(WapiError::Api {
                status: 500,
                reason: "Internal Server Error".to_string(),
                body: "no scripted response left".to_string(),
            }),
        }
    }
}
