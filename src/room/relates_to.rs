//! Thread relation attached to a room message under `m.relates_to`.

use serde::Serialize;
use serde_json::Value;

/// Marks a message as part of the thread rooted at `event_id`.
///
/// The same event is used as thread root and as the fallback reply target, so
/// clients without thread support still render the message as a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatesTo {
    rel_type: &'static str,
    event_id: String,
    is_falling_back: bool,
    #[serde(rename = "m.in_reply_to")]
    in_reply_to: InReplyTo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct InReplyTo {
    event_id: String,
}

impl RelatesTo {
    pub fn new(event_id: &str) -> Self {
        RelatesTo {
            rel_type: "m.thread",
            event_id: event_id.to_owned(),
            is_falling_back: true,
            in_reply_to: InReplyTo {
                event_id: event_id.to_owned(),
            },
        }
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    /// JSON fragment stored under `m.relates_to`.
    pub fn to_payload(&self) -> Value {
        serde_json::json!({
            "rel_type": self.rel_type,
            "event_id": self.event_id,
            "is_falling_back": self.is_falling_back,
            "m.in_reply_to": {
                "event_id": self.in_reply_to.event_id,
            },
        })
    }
}
