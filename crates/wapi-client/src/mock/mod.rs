//! Test doubles for the WAPI client
//!
//! These doubles let tests run without a grid:
//! - `requestor.rs` - [`ScriptedRequestor`], an [`HttpRequestor`](crate::wapi_trait::HttpRequestor)
//!   that records every request and replays scripted responses. Plug it into a
//!   real [`Connector`](crate::Connector) to exercise the retry and decode logic.
//! - `connector.rs` - [`MockConnector`], a [`WapiConnector`](crate::wapi_trait::WapiConnector)
//!   that records CRUD calls and replays scripted JSON, for testing code
//!   written against the connector trait.

mod connector;
mod requestor;

pub use connector::{MockConnector, MockReply, RecordedCall};
pub use requestor::{RecordedRequest, ScriptedRequestor, ScriptedResponse};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock ignoring poisoning; a panicking test must not hide the recorded state
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
