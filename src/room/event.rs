//! Read-only view over a raw room event.

use serde_json::Value;

/// Raw protocol event as returned by the homeserver.
///
/// Accessors return `None` when the field is absent or has an unexpected type.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    data: Value,
}

impl Event {
    pub fn new(data: Value) -> Self {
        Event { data }
    }

    /// Event type, e.g. `m.room.message`.
    pub fn type_name(&self) -> Option<&str> {
        self.data.get("type").and_then(Value::as_str)
    }

    /// User ID of the sender.
    pub fn sender_username(&self) -> Option<&str> {
        self.data.get("sender").and_then(Value::as_str)
    }

    /// Legacy `user_id` field, only sent by some homeservers.
    pub fn user_id(&self) -> Option<&str> {
        self.data.get("user_id").and_then(Value::as_str)
    }

    pub fn event_id(&self) -> Option<&str> {
        self.data.get("event_id").and_then(Value::as_str)
    }

    /// Milliseconds since the unix epoch at which the homeserver received the event.
    pub fn origin_server_ts(&self) -> Option<i64> {
        self.data.get("origin_server_ts").and_then(Value::as_i64)
    }

    pub fn content(&self) -> Option<&Value> {
        self.data.get("content").filter(|c| c.is_object())
    }

    pub fn msgtype(&self) -> Option<&str> {
        self.content()?.get("msgtype").and_then(Value::as_str)
    }

    pub fn body(&self) -> Option<&str> {
        self.content()?.get("body").and_then(Value::as_str)
    }
}
