//! Recording connector

use super::lock;
use crate::error::WapiError;
use crate::models::{MultiRequest, WapiObject};
use crate::wapi_trait::WapiConnector;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A CRUD call received by a [`MockConnector`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Create {
        object_type: String,
        body: Value,
    },
    Get {
        object_type: String,
        reference: String,
        body: Value,
        return_fields: Vec<String>,
        ea_search: Value,
    },
    Update {
        object_type: String,
        reference: String,
        body: Value,
    },
    Delete {
        reference: String,
    },
    Multi {
        body: Value,
    },
}

/// Reply replayed by a [`MockConnector`]
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Decoded response of the call
    Json(Value),
    /// Failure with this status code and body
    Fail(u16, String),
}

/// Records CRUD calls and answers them from a queue
///
/// An exhausted queue behaves like an empty response body: create, update
/// and delete return an empty reference, get returns `None`.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply
    pub fn reply(self, value: Value) -> Self {
        self.push(MockReply::Json(value));
        self
    }

    /// Queue a failure
    pub fn fail(self, status: u16, body: impl Into<String>) -> Self {
        self.push(MockReply::Fail(status, body.into()));
        self
    }

    pub fn push(&self, reply: MockReply) {
        lock(&self.replies).push_back(reply);
    }

    /// Calls received so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    fn record(&self, call: RecordedCall) {
        lock(&self.calls).push(call);
    }

    fn next_reply(&self) -> Result<Value, WapiError> {
        let next = lock(&self.replies).pop_front();
        match next {
            Some(MockReply::Json(value)) => Ok(value),
            Some(MockReply::Fail(status, body)) => Err(WapiError::Api {
                status,
                reason: String::new(),
                body,
            }),
            None => Ok(Value::Null),
        }
    }

    fn next_ref(&self) -> Result<String, WapiError> {
        match self.next_reply()? {
            Value::Null => Ok(String::new()),
            value => decode(value),
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, WapiError> {
    let raw = value.to_string();
    serde_json::from_value(value).map_err(|e| WapiError::decode(e, raw.as_bytes()))
}

#[async_trait::async_trait]
impl WapiConnector for MockConnector {
    async fn create_object(&self, obj: &dyn WapiObject) -> Result<String, WapiError> {
        self.record(RecordedCall::Create {
            object_type: obj.object_type().to_string(),
            body: obj.to_json()?,
        });
        self.next_ref()
    }

    async fn get_object<T>(&self, obj: &dyn WapiObject, reference: &str) -> Result<Option<T>, WapiError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.record(RecordedCall::Get {
            object_type: obj.object_type().to_string(),
            reference: reference.to_string(),
            body: obj.to_json()?,
            return_fields: obj.return_fields(),
            ea_search: serde_json::to_value(obj.ea_search())?,
        });

        match self.next_reply()? {
            Value::Null => Ok(None),
            Value::Array(items) if items.is_empty() => Ok(None),
            value => decode(value).map(Some),
        }
    }

    async fn update_object(&self, obj: &dyn WapiObject, reference: &str) -> Result<String, WapiError> {
        self.record(RecordedCall::Update {
            object_type: obj.object_type().to_string(),
            reference: reference.to_string(),
            body: obj.to_json()?,
        });
        self.next_ref()
    }

    async fn delete_object(&self, reference: &str) -> Result<String, WapiError> {
        self.record(RecordedCall::Delete {
            reference: reference.to_string(),
        });
        self.next_ref()
    }

    async fn create_multi_object(&self, request: &MultiRequest) -> Result<Vec<Map<String, Value>>, WapiError> {
        self.record(RecordedCall::Multi {
            body: request.to_json()?,
        });
        match self.next_reply()? {
            Value::Null => Ok(Vec::new()),
            value => decode(value),
        }
    }
}
