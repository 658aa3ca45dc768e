//! mxpost - A client for the Matrix client-server API.
//!
//! mxpost posts messages into Matrix rooms on behalf of an account identified by
//! an access token.
//!
//! # Features
//!
//! - **Text Messages**: `m.text`, `m.emote` and `m.notice`, with optional HTML and thread
//! - **Media**: upload local files and post them as `m.image`, `m.audio`, `m.video` or `m.file`
//! - **Media by Reference**: post media already hosted on a homeserver, with its thumbnail
//! - **Locations**: `m.location` messages with a `geo:` URI
//! - **Typing Notifications**: start and stop the typing indicator
//! - **Redactions**: remove a previously sent event
//! - **Reading**: list the recent text messages of a room
//!
//! # Architecture
//!
//! - [`config`] - YAML configuration with environment variable overrides
//! - [`error`] - [`MatrixError`] and [`TransportError`]
//! - [`matrix`] - [`MatrixClient`], payloads and HTTP transport
//! - [`media`] - media descriptors, thumbnails and video probing
//! - [`room`] - message vocabulary and messages read back from rooms
//!
//! # Examples
//!
//! ```no_run
//! use mxpost::{MatrixClient, MessageOptions, ReqwestTransport};
//!
//! # async fn example() -> Result<(), mxpost::MatrixError> {
//! let client = MatrixClient::new("https://matrix.example.org", "access-token", ReqwestTransport::new());
//!
//! let options = MessageOptions::new().formatted_body("<b>Hello</b>");
//! client.post_message("!room:example.org", "Hello", &options).await?;
//! client
//!     .post_location("!room:example.org", 48.8584, 2.2945, "Eiffel Tower", None)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod matrix;
pub mod media;
pub mod room;

pub use crate::error::{MatrixError, TransportError};
pub use crate::matrix::{
    HttpRequest, HttpResponse, MatrixClient, MessageOptions, ReqwestTransport, Transport,
};
pub use crate::media::{File, FfprobeVideoProbe, NoVideoProbe, Thumbnail, VideoData, VideoProbe};
pub use crate::room::{Event, Message, MessageKind, MsgType, RelatesTo, Sender};
