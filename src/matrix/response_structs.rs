//! Response structures for client-server API endpoints.
//!
//! This module contains structures for deserializing JSON responses from a
//! Matrix homeserver. Required fields are optional here so that a missing field
//! can be reported as a protocol error instead of a decoding error.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// Response of `rooms/{roomId}/send/...` and `rooms/{roomId}/redact/...`.
#[derive(Deserialize, Debug, Default)]
pub struct EventIdResponse {
    /// Identifier assigned by the homeserver.
    pub event_id: Option<String>,
}

impl fmt::Display for EventIdResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "event_id={:?}", self.event_id)
    }
}

/// Response of `/_matrix/media/v3/upload`.
#[derive(Deserialize, Debug, Default)]
pub struct ContentUriResponse {
    /// `mxc://` URI of the uploaded content.
    pub content_uri: Option<String>,
}

impl fmt::Display for ContentUriResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "content_uri={:?}", self.content_uri)
    }
}

/// Response of `rooms/{roomId}/messages`.
#[derive(Deserialize, Debug, Default)]
pub struct MessagesResponse {
    /// Raw room events, most recent first when paginating backwards.
    #[serde(default)]
    pub chunk: Vec<Value>,
}

impl fmt::Display for MessagesResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "chunk={} events", self.chunk.len())
    }
}

/// Standard error body, e.g. `{"errcode": "M_FORBIDDEN", "error": "..."}`.
#[derive(Deserialize, Debug)]
pub struct ErrorResponse {
    pub errcode: String,
    #[serde(default)]
    pub error: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "errcode={}, error={}", self.errcode, self.error)
    }
}
