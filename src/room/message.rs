//! Messages read back from a room.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::room::sender::Sender;

/// Kind of a received [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageKind {
    #[default]
    Message,
    Action,
    Event,
    File,
    Image,
}

/// A message received in a room.
///
/// Sender, body, timestamp and kind are fixed at construction. Summary, extra
/// data and the media fields can be filled in afterwards by a caller enriching
/// the message.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use mxpost::{Message, MessageKind, Sender};
///
/// let mut message = Message::new(
///     Sender::new("@alice:example.org", "alice"),
///     "hello",
///     Utc::now(),
///     MessageKind::Message,
/// );
/// message.set_summary("greeting");
///
/// assert!(message.is_message());
/// assert_eq!(message.summary(), "greeting");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    sender: Sender,
    body: String,
    created_at: DateTime<Utc>,
    kind: MessageKind,
    summary: String,
    extra_data: Option<String>,
    info: Option<Value>,
    binary: Option<Vec<u8>>,
    data_uri: Option<String>,
}

impl Message {
    pub fn new(sender: Sender, body: &str, created_at: DateTime<Utc>, kind: MessageKind) -> Self {
        Message {
            sender,
            body: body.to_owned(),
            created_at,
            kind,
            summary: String::new(),
            extra_data: None,
            info: None,
            binary: None,
            data_uri: None,
        }
    }

    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn extra_data(&self) -> Option<&str> {
        self.extra_data.as_deref()
    }

    /// Media info block (`mimetype`, `size`, ...) of a file or image message.
    pub fn info(&self) -> Option<&Value> {
        self.info.as_ref()
    }

    pub fn binary(&self) -> Option<&[u8]> {
        self.binary.as_deref()
    }

    pub fn data_uri(&self) -> Option<&str> {
        self.data_uri.as_deref()
    }

    pub fn set_summary(&mut self, summary: &str) -> &mut Self {
        self.summary = summary.to_owned();
        self
    }

    pub fn set_extra_data(&mut self, extra_data: Option<&str>) -> &mut Self {
        self.extra_data = extra_data.map(str::to_owned);
        self
    }

    pub fn set_info(&mut self, info: Option<Value>) -> &mut Self {
        self.info = info;
        self
    }

    pub fn set_binary(&mut self, binary: Option<Vec<u8>>) -> &mut Self {
        self.binary = binary;
        self
    }

    pub fn set_data_uri(&mut self, data_uri: Option<&str>) -> &mut Self {
        self.data_uri = data_uri.map(str::to_owned);
        self
    }

    pub fn is_message(&self) -> bool {
        self.kind == MessageKind::Message
    }

    pub fn is_action(&self) -> bool {
        self.kind == MessageKind::Action
    }

    pub fn is_event(&self) -> bool {
        self.kind == MessageKind::Event
    }

    pub fn is_file(&self) -> bool {
        self.kind == MessageKind::File
    }

    pub fn is_image(&self) -> bool {
        self.kind == MessageKind::Image
    }
}
