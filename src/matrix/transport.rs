//! HTTP transport used by the Matrix client.
//!
//! This module provides the [`Transport`] trait the client sends its requests
//! through, and [`ReqwestTransport`], its implementation on top of `reqwest`.

use log::debug;
use mockall::automock;
use reqwest::{Client, Method};

use crate::error::TransportError;

/// Outgoing HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL without query string.
    pub url: String,
    /// Query parameters, encoded by the transport.
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Incoming HTTP response, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Sends HTTP requests to the homeserver.
///
/// Implementations report network failures as [`TransportError`] and return
/// every response received, including non-2xx ones. Timeouts, connection reuse
/// and thread safety are the implementation's concern.
#[allow(async_fn_in_trait)]
#[automock]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`Transport`] backed by a [`reqwest::Client`].
///
/// # Examples
///
/// ```no_run
/// use mxpost::{HttpRequest, ReqwestTransport, Transport};
///
/// # async fn example() -> Result<(), mxpost::TransportError> {
/// let transport = ReqwestTransport::new();
/// let response = transport
///     .send(HttpRequest {
///         method: reqwest::Method::GET,
///         url: "https://matrix.example.org/_matrix/client/versions".to_string(),
///         query: vec![],
///         headers: vec![],
///         body: vec![],
///     })
///     .await?;
/// println!("status {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    /// HTTP client
    client: Client,
}

impl ReqwestTransport {
    /// Create a new [ReqwestTransport] with a default [`reqwest::Client`].
    pub fn new() -> Self {
        ReqwestTransport {
            client: Client::new(),
        }
    }

    /// Create a new [ReqwestTransport] reusing a configured client
    /// (timeouts, proxies, TLS settings...).
    pub fn with_client(client: Client) -> Self {
        ReqwestTransport { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!("request {} {}", request.method, request.url);

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(|e| reqwest_error(&request.url, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| reqwest_error(&request.url, e))?
            .to_vec();

        debug!(
            "response from {} -> status {}, {} bytes",
            &request.url,
            status,
            body.len()
        );

        Ok(HttpResponse { status, body })
    }
}

fn reqwest_error(url: &str, error: reqwest::Error) -> TransportError {
    let mut transport_error = TransportError::new(format!("request to {} failed: {}", url, error));
    if let Some(status) = error.status() {
        transport_error = transport_error.with_status(status.as_u16());
    }
    transport_error.with_source(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(method: Method, url: String) -> HttpRequest {
        HttpRequest {
            method,
            url,
            query: vec![],
            headers: vec![],
            body: vec![],
        }
    }

    #[tokio::test]
    async fn test_send_forwards_query_headers_and_body() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("POST", "/_matrix/media/v3/upload")
            .match_query(mockito::Matcher::UrlEncoded(
                "filename".to_owned(),
                "my cat.png".to_owned(),
            ))
            .match_header("authorization", "Bearer secret")
            .match_header("content-type", "image/png")
            .match_body("raw bytes")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content_uri": "mxc://x/y"}"#)
            .create_async()
            .await;

        let mut request = create_request(Method::POST, format!("{}/_matrix/media/v3/upload", url));
        request.query = vec![("filename".to_owned(), "my cat.png".to_owned())];
        request.headers = vec![
            ("Authorization".to_owned(), "Bearer secret".to_owned()),
            ("Content-Type".to_owned(), "image/png".to_owned()),
        ];
        request.body = b"raw bytes".to_vec();

        let response = ReqwestTransport::new().send(request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 200);
        assert_eq!(response.body, br#"{"content_uri": "mxc://x/y"}"#.to_vec());
    }

    #[tokio::test]
    async fn test_send_returns_error_statuses() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        server
            .mock("GET", "/_matrix/client/v3/rooms/!room:example.org/messages")
            .with_status(403)
            .with_body(r#"{"errcode": "M_FORBIDDEN", "error": "nope"}"#)
            .create_async()
            .await;

        let request = create_request(
            Method::GET,
            format!("{}/_matrix/client/v3/rooms/!room:example.org/messages", url),
        );
        let response = ReqwestTransport::new().send(request).await.unwrap();

        assert_eq!(response.status, 403);
    }

    #[tokio::test]
    async fn test_send_network_failure() {
        let request = create_request(Method::GET, "http://127.0.0.1:1/unreachable".to_owned());

        let error = ReqwestTransport::new().send(request).await.unwrap_err();

        assert!(error.message().contains("http://127.0.0.1:1/unreachable"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut request = create_request(Method::GET, "http://localhost".to_owned());
        request.headers = vec![("Content-Type".to_owned(), "application/json".to_owned())];

        assert_eq!(request.header("content-type"), Some("application/json"));
        assert!(request.header("authorization").is_none());
    }
}
