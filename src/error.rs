//! Error types raised by the Matrix client.
//!
//! Every public operation of [`crate::MatrixClient`] either returns the identifier
//! assigned by the homeserver or fails with a [`MatrixError`]. Failures coming from
//! the HTTP layer are carried by [`TransportError`], which keeps the original
//! message, the HTTP status, the Matrix `errcode` and the underlying cause.

use std::{error::Error as StdError, fmt, path::PathBuf};

use thiserror::Error;

/// Boxed error kept as the cause of a [`TransportError`].
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Domain error of the Matrix client.
#[derive(Error, Debug)]
pub enum MatrixError {
    /// A value is outside the protocol vocabulary (e.g. an unknown `msgtype`).
    #[error("validation error: {0}")]
    Validation(String),
    /// The media repository did not return a usable content URI.
    #[error("upload error: {0}")]
    Upload(String),
    /// The homeserver answered but a required response field is missing or empty.
    #[error("protocol error: {0}")]
    Protocol(String),
    /// The request could not be performed or the homeserver rejected it.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// A local file could not be read.
    #[error("unable to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A local image exists but its format or dimensions cannot be determined.
    #[error("unreadable image {}: {source}", path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// A payload could not be encoded to JSON.
    #[error("unable to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl MatrixError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MatrixError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure of the HTTP exchange with the homeserver.
///
/// Raised for network errors, non-2xx statuses and response bodies that are not
/// valid JSON.
#[derive(Error, Debug)]
pub struct TransportError {
    message: String,
    status: Option<u16>,
    errcode: Option<String>,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    /// Creates an error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        TransportError {
            message: message.into(),
            status: None,
            errcode: None,
            source: None,
        }
    }

    /// Attaches the HTTP status code.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attaches the Matrix error code (e.g. `M_FORBIDDEN`).
    pub fn with_errcode(mut self, errcode: impl Into<String>) -> Self {
        self.errcode = Some(errcode.into());
        self
    }

    /// Attaches the underlying cause.
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn errcode(&self) -> Option<&str> {
        self.errcode.as_deref()
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "transport error: {}", self.message)?;
        if let Some(status) = self.status {
            write!(f, " (status {status})")?;
        }
        if let Some(errcode) = &self.errcode {
            write!(f, " [{errcode}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        let error = TransportError::new("You are not allowed to send here")
            .with_status(403)
            .with_errcode("M_FORBIDDEN");

        assert_eq!(
            error.to_string(),
            "transport error: You are not allowed to send here (status 403) [M_FORBIDDEN]"
        );
        assert_eq!(error.status(), Some(403));
        assert_eq!(error.errcode(), Some("M_FORBIDDEN"));
    }

    #[test]
    fn test_transport_error_keeps_source() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let error = TransportError::new("connection failed").with_source(cause);

        assert_eq!(error.to_string(), "transport error: connection failed");
        assert_eq!(error.source().unwrap().to_string(), "refused");
    }

    #[test]
    fn test_matrix_error_wraps_transport_error() {
        let error: MatrixError = TransportError::new("boom").with_status(502).into();

        assert!(matches!(error, MatrixError::Transport(ref e) if e.status() == Some(502)));
        assert_eq!(error.to_string(), "transport error: boom (status 502)");
    }
}
