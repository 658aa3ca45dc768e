//! Typed payloads sent to the client-server API.
//!
//! Payloads are built as records and only turned into JSON when the request is
//! dispatched. Serialization follows field order, so the wire document keeps the
//! order `msgtype`, `body`, `format`, `formatted_body`, `m.relates_to`, `url`,
//! `w`, `h`, `info`, `geo_uri`. Absent optional fields are omitted.

use serde::Serialize;

use crate::room::{MsgType, RelatesTo};

/// HTML format marker of `formatted_body`.
pub const HTML_FORMAT: &str = "org.matrix.custom.html";

/// Blurhash sent with uploaded videos.
pub const VIDEO_BLURHASH_PLACEHOLDER: &str = "UIIXNu_NOZ^ltlxaxEe-01a0IUELS$MxRONG";

/// Content of an `m.room.message` event.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RoomMessage {
    pub msgtype: MsgType,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_body: Option<String>,
    #[serde(rename = "m.relates_to", skip_serializing_if = "Option::is_none")]
    pub relates_to: Option<RelatesTo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<MediaInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_uri: Option<String>,
}

impl RoomMessage {
    pub fn new(msgtype: MsgType, body: &str) -> Self {
        RoomMessage {
            msgtype,
            body: body.to_owned(),
            format: None,
            formatted_body: None,
            relates_to: None,
            url: None,
            w: None,
            h: None,
            info: None,
            geo_uri: None,
        }
    }

    /// Adds an HTML rendition of the body. Empty strings are ignored.
    pub fn formatted(mut self, formatted_body: Option<&str>) -> Self {
        if let Some(formatted_body) = formatted_body.filter(|f| !f.is_empty()) {
            self.format = Some(HTML_FORMAT);
            self.formatted_body = Some(formatted_body.to_owned());
        }
        self
    }

    /// Places the message in the thread rooted at `thread_id`. Empty ids are ignored.
    pub fn in_thread(mut self, thread_id: Option<&str>) -> Self {
        self.relates_to = thread_id.filter(|t| !t.is_empty()).map(RelatesTo::new);
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_owned());
        self
    }

    pub fn with_dimensions(mut self, w: u32, h: u32) -> Self {
        self.w = Some(w);
        self.h = Some(h);
        self
    }

    pub fn with_info(mut self, info: MediaInfo) -> Self {
        self.info = Some(info);
        self
    }

    pub fn with_geo_uri(mut self, geo_uri: String) -> Self {
        self.geo_uri = Some(geo_uri);
        self
    }
}

/// `info` block describing attached media.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MediaInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    pub mimetype: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(
        rename = "xyz.amorgan.blurhash",
        skip_serializing_if = "Option::is_none"
    )]
    pub blurhash: Option<String>,
    #[serde(flatten)]
    pub thumbnail: Option<ThumbnailInfo>,
}

impl MediaInfo {
    pub fn new(mimetype: &str, size: u64) -> Self {
        MediaInfo {
            w: None,
            h: None,
            mimetype: mimetype.to_owned(),
            size,
            duration: None,
            blurhash: None,
            thumbnail: None,
        }
    }
}

/// Thumbnail fields merged into a [`MediaInfo`].
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailInfo {
    pub thumbnail_info: ThumbnailDetails,
    pub thumbnail_url: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailDetails {
    pub mimetype: String,
    pub w: u32,
    pub h: u32,
    pub size: u64,
}

/// Body of `PUT rooms/{roomId}/typing/{userId}`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Typing {
    pub typing: bool,
    /// Milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Typing {
    /// Typing for `timeout_seconds`, or stopped when the timeout is 0.
    pub fn for_seconds(timeout_seconds: u64) -> Self {
        if timeout_seconds > 0 {
            Typing {
                typing: true,
                timeout: Some(timeout_seconds.saturating_mul(1000)),
            }
        } else {
            Typing {
                typing: false,
                timeout: None,
            }
        }
    }
}

/// Body of `POST rooms/{roomId}/redact/{eventId}`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Redaction {
    pub reason: String,
}

/// `geo:` URI with 10 decimal places.
pub fn geo_uri(latitude: f64, longitude: f64) -> String {
    format!("geo:{:.10},{:.10}", latitude, longitude)
}
