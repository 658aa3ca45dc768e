//! Matrix client-server API facade.
//!
//! This module provides the [`MatrixClient`], which composes protocol payloads
//! for room messages, media, locations, typing notifications and redactions,
//! and sends them through a [`Transport`].

use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned, de::IgnoredAny};

use crate::config;
use crate::error::{MatrixError, TransportError};
use crate::matrix::payload::{
    MediaInfo, Redaction, RoomMessage, Typing, VIDEO_BLURHASH_PLACEHOLDER, geo_uri,
};
use crate::matrix::response_structs::{
    ContentUriResponse, ErrorResponse, EventIdResponse, MessagesResponse,
};
use crate::matrix::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::media::{FfprobeVideoProbe, File, PathExt, Thumbnail, VideoData, VideoProbe};
use crate::room::{Event, Message, MessageKind, MsgType, Sender};

const CLIENT_API_PATH: &str = "_matrix/client/v3";
const MEDIA_API_PATH: &str = "_matrix/media/v3";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Reason attached to every redaction.
pub const REDACTION_REASON: &str = "Feature test";

/// Characters escaped in room, event and user IDs placed in a URL path.
/// Matrix sigils (`!`, `$`, `@`, `:`) are kept as is.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Optional parts of a text message.
///
/// # Examples
///
/// ```
/// use mxpost::MessageOptions;
///
/// let options = MessageOptions::new()
///     .formatted_body("<b>Hello</b>")
///     .thread_id("$root:example.org");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageOptions {
    formatted_body: Option<String>,
    thread_id: Option<String>,
}

impl MessageOptions {
    pub fn new() -> Self {
        MessageOptions::default()
    }

    /// HTML rendition of the body, sent as `org.matrix.custom.html`.
    pub fn formatted_body(mut self, formatted_body: &str) -> Self {
        self.formatted_body = Some(formatted_body.to_owned());
        self
    }

    /// Root event of the thread the message belongs to.
    pub fn thread_id(mut self, thread_id: &str) -> Self {
        self.thread_id = Some(thread_id.to_owned());
        self
    }
}

/// Request body, which also selects the API the request is routed to.
enum Payload {
    /// No body, client API.
    Empty,
    /// Encoded JSON document, client API.
    Json(Vec<u8>),
    /// Raw bytes, media API.
    Binary { bytes: Vec<u8>, content_type: String },
}

impl Payload {
    fn json<S: Serialize>(value: &S) -> Result<Self, MatrixError> {
        Ok(Payload::Json(serde_json::to_vec(value)?))
    }
}

/// Client for the client-server API of a Matrix homeserver.
///
/// The client only holds its configuration, so it can be reused for any number
/// of calls. Each operation sends one request, or two when a file is uploaded
/// before the message referencing it. Nothing is retried: a failed request is
/// returned to the caller as a [`MatrixError`].
///
/// # Examples
///
/// ```no_run
/// use mxpost::{MatrixClient, MessageOptions, ReqwestTransport};
///
/// # async fn example() -> Result<(), mxpost::MatrixError> {
/// let client = MatrixClient::new("https://matrix.example.org", "access-token", ReqwestTransport::new())
///     .with_user_id("@bot:example.org");
///
/// let event_id = client
///     .post_message("!room:example.org", "Hello", &MessageOptions::new())
///     .await?;
/// client
///     .post_file("!room:example.org", "./cat.png", Some(&event_id))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct MatrixClient<T = ReqwestTransport, P = FfprobeVideoProbe> {
    /// Homeserver URL, without trailing slash
    base_url: String,
    /// Bearer access token
    access_token: String,
    /// User ID of the account, required for typing notifications
    user_id: Option<String>,
    /// HTTP transport
    transport: T,
    /// Video metadata extractor
    video_probe: P,
}

impl MatrixClient<ReqwestTransport, FfprobeVideoProbe> {
    /// Creates a client from the `matrix` configuration section, using
    /// [`ReqwestTransport`] and [`FfprobeVideoProbe`].
    pub fn from_config(config: &config::Matrix) -> Self {
        let client = MatrixClient::new(
            &config.base_url,
            &config.access_token,
            ReqwestTransport::new(),
        );
        match config.user_id.as_deref().filter(|u| !u.is_empty()) {
            Some(user_id) => client.with_user_id(user_id),
            None => client,
        }
    }
}

impl<T: Transport> MatrixClient<T, FfprobeVideoProbe> {
    /// Create a new [MatrixClient].
    ///
    /// # Arguments
    ///
    /// * `base_url` - URL of the homeserver, e.g. `https://matrix.example.org`
    /// * `access_token` - Access token sent as `Authorization: Bearer <token>`
    /// * `transport` - The [`Transport`] requests are sent through
    pub fn new(base_url: &str, access_token: &str, transport: T) -> Self {
        MatrixClient {
            base_url: base_url.trim_end_matches('/').to_owned(),
            access_token: access_token.to_owned(),
            user_id: None,
            transport,
            video_probe: FfprobeVideoProbe::new(),
        }
    }
}

impl<T: Transport, P: VideoProbe> MatrixClient<T, P> {
    /// Sets the user ID of the account. Typing notifications are skipped without it.
    pub fn with_user_id(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id)
            .filter(|u| !u.is_empty())
            .map(str::to_owned);
        self
    }

    /// Replaces the video probe.
    pub fn with_video_probe<Q: VideoProbe>(self, video_probe: Q) -> MatrixClient<T, Q> {
        MatrixClient {
            base_url: self.base_url,
            access_token: self.access_token,
            user_id: self.user_id,
            transport: self.transport,
            video_probe,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Posts an `m.text` message and returns its event ID.
    pub async fn post_message(
        &self,
        room_id: &str,
        body: &str,
        options: &MessageOptions,
    ) -> Result<String, MatrixError> {
        self.post_text(MsgType::Text, room_id, body, options).await
    }

    /// Posts an `m.emote` message and returns its event ID.
    pub async fn emote(
        &self,
        room_id: &str,
        body: &str,
        options: &MessageOptions,
    ) -> Result<String, MatrixError> {
        self.post_text(MsgType::Emote, room_id, body, options).await
    }

    /// Posts an `m.notice` message and returns its event ID.
    pub async fn notice(
        &self,
        room_id: &str,
        body: &str,
        options: &MessageOptions,
    ) -> Result<String, MatrixError> {
        self.post_text(MsgType::Notice, room_id, body, options).await
    }

    async fn post_text(
        &self,
        msgtype: MsgType,
        room_id: &str,
        body: &str,
        options: &MessageOptions,
    ) -> Result<String, MatrixError> {
        let message = RoomMessage::new(msgtype, body)
            .formatted(options.formatted_body.as_deref())
            .in_thread(options.thread_id.as_deref());

        self.send_room_message(room_id, &message).await
    }

    /// Uploads a local file and posts it.
    ///
    /// The message type follows the MIME type sniffed from the file content,
    /// or from its extension when the content is not recognised: `image/*` is posted
    /// as `m.image`, `audio/*` as `m.audio` and anything else as `m.file`.
    /// Videos are handed over to [`Self::post_video`] without thumbnail.
    ///
    /// # Errors
    ///
    /// - [`MatrixError::Io`] if the file cannot be read
    /// - [`MatrixError::Upload`] if the upload returns no content URI
    /// - [`MatrixError::Protocol`] if the message is not assigned an event ID
    /// - [`MatrixError::Transport`] on any HTTP failure
    pub async fn post_file(
        &self,
        room_id: &str,
        file_path: impl AsRef<Path>,
        thread_id: Option<&str>,
    ) -> Result<String, MatrixError> {
        let path = file_path.as_ref();
        let bytes = read_file(path).await?;
        let media_type = path.sniffed_media_type(&bytes);

        let msgtype = if media_type.type_() == mime::IMAGE {
            MsgType::Image
        } else if media_type.type_() == mime::AUDIO {
            MsgType::Audio
        } else if media_type.type_() == mime::VIDEO {
            return self.post_video(room_id, path, None, thread_id).await;
        } else {
            MsgType::File
        };

        let size = bytes.len() as u64;
        let url = self
            .upload_binary(bytes, &path.base_name(), media_type.essence_str())
            .await?;

        let message = RoomMessage::new(msgtype, &path.base_name())
            .in_thread(thread_id)
            .with_url(&url)
            .with_info(MediaInfo::new(media_type.essence_str(), size));

        self.send_room_message(room_id, &message).await
    }

    /// Uploads a local video, and optionally its thumbnail, then posts it as `m.video`.
    ///
    /// Dimensions and duration come from the video probe. When probing fails
    /// the video is posted with zero dimensions and duration.
    pub async fn post_video(
        &self,
        room_id: &str,
        file_path: impl AsRef<Path>,
        thumb_path: Option<&Path>,
        thread_id: Option<&str>,
    ) -> Result<String, MatrixError> {
        let path = file_path.as_ref();

        let video_data = match self.video_probe.probe(path).await {
            Ok(video_data) => video_data,
            Err(e) => {
                warn!("unable to probe video {}: {}", path.display(), e);
                VideoData::default()
            }
        };

        let bytes = read_file(path).await?;
        let media_type = path.sniffed_media_type(&bytes);
        let size = bytes.len() as u64;
        let url = self
            .upload_binary(bytes, &path.base_name(), media_type.essence_str())
            .await?;

        let mut info = MediaInfo::new(media_type.essence_str(), size);
        info.duration = Some(video_data.duration());
        info.blurhash = Some(VIDEO_BLURHASH_PLACEHOLDER.to_owned());

        if let Some(thumb_path) = thumb_path {
            let thumb_url = self.upload_file(thumb_path).await?;
            let thumbnail = Thumbnail::new(thumb_path, &thumb_url);
            let thumbnail_info = tokio::task::spawn_blocking(move || thumbnail.to_payload())
                .await
                .map_err(|e| MatrixError::io(thumb_path, std::io::Error::other(e)))??;
            info.thumbnail = Some(thumbnail_info);
        }

        let message = RoomMessage::new(MsgType::Video, &path.base_name())
            .in_thread(thread_id)
            .with_url(&url)
            .with_dimensions(video_data.width(), video_data.height())
            .with_info(info);

        self.send_room_message(room_id, &message).await
    }

    /// Uploads a local file to the media repository and returns its content URI.
    pub async fn upload_file(&self, file_path: impl AsRef<Path>) -> Result<String, MatrixError> {
        let path = file_path.as_ref();
        let bytes = read_file(path).await?;
        let media_type = path.sniffed_media_type(&bytes);

        self.upload_binary(bytes, &path.base_name(), media_type.essence_str())
            .await
    }

    /// Posts media already hosted on a homeserver.
    ///
    /// `msg_type` must belong to the [`MsgType`] vocabulary. The `info` block is
    /// built from `media`, and from `thumb` when given. Nothing is uploaded.
    pub async fn post_media_by_reference(
        &self,
        room_id: &str,
        msg_type: &str,
        media: &File,
        thumb: Option<&File>,
        thread_id: Option<&str>,
    ) -> Result<String, MatrixError> {
        let msgtype: MsgType = msg_type.parse()?;

        let info = MediaInfo {
            w: Some(media.width()),
            h: Some(media.height()),
            mimetype: media.mime().to_owned(),
            size: media.file_size(),
            duration: Some(media.duration()),
            blurhash: media
                .blur_hash()
                .filter(|b| !b.is_empty())
                .map(str::to_owned),
            thumbnail: thumb.map(File::thumbnail_info),
        };

        let message = RoomMessage::new(msgtype, media.file_name())
            .in_thread(thread_id)
            .with_url(media.uri())
            .with_info(info);

        self.send_room_message(room_id, &message).await
    }

    /// Uploads raw bytes to the media repository and returns their content URI.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Upload`] when the response has no `content_uri`
    /// or an empty one.
    pub async fn upload_binary(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        mime_type: &str,
    ) -> Result<String, MatrixError> {
        info!(
            "upload {} ({}, {} bytes)",
            file_name,
            mime_type,
            bytes.len()
        );

        let response: ContentUriResponse = self
            .request(
                Method::POST,
                "upload",
                vec![("filename".to_owned(), file_name.to_owned())],
                Payload::Binary {
                    bytes,
                    content_type: mime_type.to_owned(),
                },
            )
            .await?;

        non_empty(response.content_uri).ok_or_else(|| {
            error!("no content uri returned for {}", file_name);
            MatrixError::Upload(format!("file upload error: no content_uri for {}", file_name))
        })
    }

    /// Redacts an event and returns the event ID of the redaction.
    pub async fn delete_message(
        &self,
        room_id: &str,
        event_id: &str,
    ) -> Result<String, MatrixError> {
        let path = format!(
            "rooms/{}/redact/{}",
            encode_segment(room_id),
            encode_segment(event_id)
        );
        let redaction = Redaction {
            reason: REDACTION_REASON.to_owned(),
        };

        let response: EventIdResponse = self
            .request(Method::POST, &path, vec![], Payload::json(&redaction)?)
            .await?;

        non_empty(response.event_id).ok_or_else(|| {
            error!("no event id returned when redacting {}", event_id);
            MatrixError::Protocol(format!("unable to redact {}: missing event_id", event_id))
        })
    }

    /// Posts an `m.location` message with a `geo:` URI and returns its event ID.
    pub async fn post_location(
        &self,
        room_id: &str,
        latitude: f64,
        longitude: f64,
        label: &str,
        thread_id: Option<&str>,
    ) -> Result<String, MatrixError> {
        let message = RoomMessage::new(MsgType::Location, label)
            .in_thread(thread_id)
            .with_geo_uri(geo_uri(latitude, longitude));

        self.send_room_message(room_id, &message).await
    }

    /// Shows the account as typing for `timeout_seconds`, or stops it when 0.
    ///
    /// Does nothing when the client has no user ID.
    pub async fn set_typing_indicator(
        &self,
        room_id: &str,
        timeout_seconds: u64,
    ) -> Result<(), MatrixError> {
        let Some(user_id) = self.user_id.as_deref() else {
            debug!("no user id configured, skip typing indicator in {}", room_id);
            return Ok(());
        };

        let path = format!(
            "rooms/{}/typing/{}",
            encode_segment(room_id),
            encode_segment(user_id)
        );
        let typing = Typing::for_seconds(timeout_seconds);

        let _: IgnoredAny = self
            .request(Method::PUT, &path, vec![], Payload::json(&typing)?)
            .await?;

        Ok(())
    }

    /// Stops the typing notification, same as `set_typing_indicator(room_id, 0)`.
    pub async fn clear_typing_indicator(&self, room_id: &str) -> Result<(), MatrixError> {
        self.set_typing_indicator(room_id, 0).await
    }

    /// Fetches up to `limit` recent events of a room and keeps the `m.text` ones.
    ///
    /// Experimental: events without `content.msgtype`, or with another
    /// message type, are skipped.
    pub async fn list_recent_messages(
        &self,
        room_id: &str,
        limit: u32,
    ) -> Result<Vec<Message>, MatrixError> {
        let path = format!("rooms/{}/messages", encode_segment(room_id));
        let query = vec![
            ("dir".to_owned(), "b".to_owned()),
            ("limit".to_owned(), limit.to_string()),
        ];

        let response: MessagesResponse = self
            .request(Method::GET, &path, query, Payload::Empty)
            .await?;
        debug!("messages of {} -> {}", room_id, response);

        Ok(response
            .chunk
            .into_iter()
            .map(Event::new)
            .filter_map(|event| text_message(&event))
            .collect())
    }

    /// Sends an `m.room.message` event and returns its event ID.
    ///
    /// Second half of the upload-then-reference flow: upload with
    /// [`Self::upload_file`] or [`Self::upload_binary`], then send a message
    /// whose `url` is the returned content URI.
    pub async fn send_room_message(
        &self,
        room_id: &str,
        message: &RoomMessage,
    ) -> Result<String, MatrixError> {
        let path = format!("rooms/{}/send/m.room.message", encode_segment(room_id));

        let response: EventIdResponse = self
            .request(Method::POST, &path, vec![], Payload::json(message)?)
            .await?;

        non_empty(response.event_id).ok_or_else(|| {
            error!("no event id returned for {} message", message.msgtype);
            MatrixError::Protocol("unable to post message: missing event_id".to_owned())
        })
    }

    /// Sends a request and decodes the JSON response.
    ///
    /// Binary payloads go to the media API, everything else to the client API.
    async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        payload: Payload,
    ) -> Result<R, MatrixError> {
        let (api_path, content_type, body) = match payload {
            Payload::Empty => (CLIENT_API_PATH, JSON_CONTENT_TYPE.to_owned(), Vec::new()),
            Payload::Json(body) => (CLIENT_API_PATH, JSON_CONTENT_TYPE.to_owned(), body),
            Payload::Binary {
                bytes,
                content_type,
            } => (MEDIA_API_PATH, content_type, bytes),
        };

        info!("{} /{}/{}", method, api_path, path);
        if api_path == CLIENT_API_PATH && !body.is_empty() {
            debug!("payload {}", String::from_utf8_lossy(&body));
        }

        let request = HttpRequest {
            method,
            url: format!("{}/{}/{}", self.base_url, api_path, path),
            query,
            headers: vec![
                (
                    "Authorization".to_owned(),
                    format!("Bearer {}", self.access_token),
                ),
                ("Content-Type".to_owned(), content_type),
            ],
            body,
        };

        let response = self.transport.send(request).await.inspect_err(|e| {
            error!("request to /{}/{} failed: {}", api_path, path, e);
        })?;

        decode_response(response)
    }
}

/// Turns a homeserver response into `R`, or a [`TransportError`] for non-2xx
/// statuses and malformed bodies. An empty body decodes as `{}`.
fn decode_response<R: DeserializeOwned>(response: HttpResponse) -> Result<R, MatrixError> {
    let status = response.status;

    if !(200..300).contains(&status) {
        let transport_error = match serde_json::from_slice::<ErrorResponse>(&response.body) {
            Ok(body) if !body.error.is_empty() => TransportError::new(body.error)
                .with_status(status)
                .with_errcode(body.errcode),
            Ok(body) => TransportError::new(format!("homeserver returned status {}", status))
                .with_status(status)
                .with_errcode(body.errcode),
            Err(_) => TransportError::new(format!("homeserver returned status {}", status))
                .with_status(status),
        };
        error!("{}", transport_error);
        return Err(transport_error.into());
    }

    let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        &response.body
    };

    serde_json::from_slice(body).map_err(|e| {
        error!("malformed response body: {}", e);
        MatrixError::from(
            TransportError::new(format!("malformed response body: {}", e))
                .with_status(status)
                .with_source(e),
        )
    })
}

/// Builds a [`Message`] from an `m.text` event, `None` for anything else.
fn text_message(event: &Event) -> Option<Message> {
    if event.msgtype()? != MsgType::Text.as_str() {
        return None;
    }

    let body = event.body()?;
    let sender_id = event.sender_username()?;
    let username = event.user_id().unwrap_or(sender_id);
    let created_at = event
        .origin_server_ts()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_else(Utc::now);

    Some(Message::new(
        Sender::new(sender_id, username),
        body,
        created_at,
        MessageKind::Message,
    ))
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

async fn read_file(path: &Path) -> Result<Vec<u8>, MatrixError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| MatrixError::io(path, e))
}
