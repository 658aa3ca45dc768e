//! Message type vocabulary of `m.room.message` events.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::MatrixError;

/// The `msgtype` of a room message.
///
/// Only the values of the protocol vocabulary can be represented. Parsing any
/// other string fails with [`MatrixError::Validation`].
///
/// # Examples
///
/// ```
/// use mxpost::MsgType;
///
/// let msg_type: MsgType = "m.image".parse().unwrap();
/// assert_eq!(msg_type, MsgType::Image);
/// assert_eq!(msg_type.as_str(), "m.image");
/// assert!("m.sticker".parse::<MsgType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MsgType {
    #[serde(rename = "m.audio")]
    Audio,
    #[serde(rename = "m.file")]
    File,
    #[serde(rename = "m.image")]
    Image,
    #[serde(rename = "m.location")]
    Location,
    #[serde(rename = "m.text")]
    Text,
    #[serde(rename = "m.video")]
    Video,
    #[serde(rename = "m.emote")]
    Emote,
    #[serde(rename = "m.notice")]
    Notice,
}

impl MsgType {
    /// Every member of the vocabulary.
    pub const ALL: [MsgType; 8] = [
        MsgType::Audio,
        MsgType::Emote,
        MsgType::File,
        MsgType::Image,
        MsgType::Location,
        MsgType::Notice,
        MsgType::Text,
        MsgType::Video,
    ];

    /// Wire representation of the message type.
    pub fn as_str(&self) -> &'static str {
        match self {
            MsgType::Audio => "m.audio",
            MsgType::File => "m.file",
            MsgType::Image => "m.image",
            MsgType::Location => "m.location",
            MsgType::Text => "m.text",
            MsgType::Video => "m.video",
            MsgType::Emote => "m.emote",
            MsgType::Notice => "m.notice",
        }
    }

    /// Returns `true` when `value` belongs to the vocabulary.
    pub fn is_valid(value: &str) -> bool {
        MsgType::ALL.iter().any(|t| t.as_str() == value)
    }
}

impl FromStr for MsgType {
    type Err = MatrixError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        MsgType::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| MatrixError::Validation(format!("unknown msgtype \"{value}\"")))
    }
}

impl TryFrom<&str> for MsgType {
    type Error = MatrixError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_vocabulary_value() {
        for value in [
            "m.audio",
            "m.file",
            "m.image",
            "m.location",
            "m.text",
            "m.video",
            "m.emote",
            "m.notice",
        ] {
            let msg_type: MsgType = value.parse().unwrap();
            assert_eq!(msg_type.as_str(), value);
            assert_eq!(msg_type.to_string(), value);
            assert!(MsgType::is_valid(value));
        }
    }

    #[test]
    fn test_parse_unknown_value_fails() {
        for value in ["", "m.sticker", "M.TEXT", "text", "m.text "] {
            let result = MsgType::try_from(value);
            assert!(matches!(result, Err(MatrixError::Validation(_))));
            assert!(!MsgType::is_valid(value));
        }
    }

    #[test]
    fn test_equal_values_are_interchangeable() {
        let a: MsgType = "m.notice".parse().unwrap();
        let b = MsgType::try_from("m.notice").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, MsgType::Notice);
    }

    #[test]
    fn test_serialize_as_wire_string() {
        assert_eq!(serde_json::to_string(&MsgType::Emote).unwrap(), "\"m.emote\"");
        let parsed: MsgType = serde_json::from_str("\"m.location\"").unwrap();
        assert_eq!(parsed, MsgType::Location);
    }
}
