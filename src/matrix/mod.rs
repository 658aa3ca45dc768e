//! Matrix client-server API integration.
//!
//! # Architecture
//!
//! The module is structured around the [`MatrixClient`] which coordinates:
//! - **Payloads**: typed bodies of room messages, typing notifications and redactions
//! - **Transport**: the HTTP exchange, behind the [`Transport`] trait
//! - **Responses**: the homeserver answers the client reads back
//!
//! # Examples
//!
//! ```no_run
//! use mxpost::matrix::{MatrixClient, MessageOptions, ReqwestTransport};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = MatrixClient::new("https://matrix.example.org", "access-token", ReqwestTransport::new());
//! let event_id = client
//!     .notice("!room:example.org", "Deployment done", &MessageOptions::new())
//!     .await?;
//! client.delete_message("!room:example.org", &event_id).await?;
//! # Ok(())
//! # }
//! ```

mod client;
pub mod payload;
mod response_structs;
mod transport;

pub use crate::matrix::client::{MatrixClient, MessageOptions, REDACTION_REASON};
#[cfg(test)]
pub use crate::matrix::transport::MockTransport;
pub use crate::matrix::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
