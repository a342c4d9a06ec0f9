//! The transport seam and its default HTTP/1.1 implementation.

use crate::base::context::classify_io;
use crate::base::neterror::NetError;
use crate::http::rawrequest::RawRequest;
use crate::socket::connectjob::ConnectJob;
use bytes::Bytes;
use futures::future::{BoxFuture, FutureExt};
use http::{HeaderMap, StatusCode, Uri, Version};
use http_body_util::BodyExt;
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use std::error::Error as _;
use std::io;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use url::Url;

/// A fully buffered response as produced by a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub version: Version,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Alias for the `Future` type returned by a transport.
pub type Sending = BoxFuture<'static, Result<TransportResponse, NetError>>;

/// Performs one HTTP round trip for a raw request.
///
/// Non-2xx statuses are successful round trips; only failures to obtain a
/// response are errors. Implementations must be thread-safe.
pub trait Transport: Send + Sync {
    fn send(&self, request: RawRequest) -> Sending;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: RawRequest) -> Sending {
        (**self).send(request)
    }
}

/// Shared default transport used by requests that were not given one.
pub(crate) fn default_transport() -> Arc<dyn Transport> {
    static DEFAULT: LazyLock<Arc<dyn Transport>> =
        LazyLock::new(|| Arc::new(HttpTransport::default()));
    DEFAULT.clone()
}

/// HTTP/1.1 over a fresh TCP (or BoringSSL TLS) connection per request.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the whole round trip, connect included.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: RawRequest) -> Sending {
        let timeout = self.timeout;
        async move {
            match timeout {
                Some(limit) => tokio::time::timeout(limit, round_trip(request))
                    .await
                    .map_err(|_| NetError::ConnectionTimedOut)?,
                None => round_trip(request).await,
            }
        }
        .boxed()
    }
}

async fn round_trip(request: RawRequest) -> Result<TransportResponse, NetError> {
    let mut http_request = request.to_http()?;
    *http_request.uri_mut() = origin_form(request.url())?;

    let socket = ConnectJob::connect(request.url()).await?;
    let (mut sender, conn) = http1::handshake(TokioIo::new(socket))
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "http1 handshake failed");
            NetError::ConnectionFailed
        })?;

    tokio::spawn(async move {
        if let Err(e) = conn.await {
            tracing::debug!(error = %e, "connection driver ended with error");
        }
    });

    let response = sender
        .send_request(http_request)
        .await
        .map_err(from_hyper)?;
    let (parts, body) = response.into_parts();
    let body = body
        .collect()
        .await
        .map_err(|_| NetError::HttpBodyError)?
        .to_bytes();

    Ok(TransportResponse {
        status: parts.status,
        version: parts.version,
        headers: parts.headers,
        body,
    })
}

/// Path and query only, as HTTP/1.1 expects on the request line.
fn origin_form(url: &Url) -> Result<Uri, NetError> {
    let target = match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    };
    target.parse().map_err(|_| NetError::InvalidUrl)
}

fn from_hyper(error: hyper::Error) -> NetError {
    let io_error = error
        .source()
        .and_then(|source| source.downcast_ref::<io::Error>());
    if let Some(classified) = io_error.and_then(classify_io) {
        return classified;
    }

    if error.is_timeout() {
        NetError::ConnectionTimedOut
    } else if error.is_parse() {
        NetError::InvalidResponse
    } else if error.is_incomplete_message() {
        NetError::EmptyResponse
    } else if error.is_closed() || error.is_canceled() {
        NetError::ConnectionClosed
    } else {
        NetError::Failed(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_origin_form() {
        let url = Url::parse("http://example.com/a/b?x=1&y=2").unwrap();
        assert_eq!(origin_form(&url).unwrap(), "/a/b?x=1&y=2");

        let url = Url::parse("http://example.com").unwrap();
        assert_eq!(origin_form(&url).unwrap(), "/");
    }

    async fn serve_once(reply: &'static [u8]) -> (u16, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            buf.truncate(n);
            socket.write_all(reply).await.unwrap();
            socket.shutdown().await.unwrap();
            buf
        });
        (port, handle)
    }

    #[tokio::test]
    async fn test_round_trip_against_local_server() {
        let (port, server) = serve_once(
            b"HTTP/1.1 404 Not Found\r\nContent-Type: text/plain\r\nContent-Length: 4\r\n\r\nnope",
        )
        .await;

        let url = Url::parse(&format!("http://127.0.0.1:{}/items?q=1", port)).unwrap();
        let mut raw = RawRequest::new(http::Method::GET, url);
        raw.set_header("X-Test", "yes");

        let response = HttpTransport::new().send(raw).await.unwrap();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body, "nope");
        assert_eq!(response.headers["content-type"], "text/plain");

        let seen = String::from_utf8(server.await.unwrap()).unwrap();
        assert!(seen.starts_with("GET /items?q=1 HTTP/1.1\r\n"));
        assert!(seen.to_ascii_lowercase().contains("x-test: yes"));
    }

    #[tokio::test]
    async fn test_closed_without_reply() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let _server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            drop(socket);
        });

        let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
        let err = HttpTransport::new()
            .send(RawRequest::new(http::Method::GET, url))
            .await
            .unwrap_err();
        assert!(err.is_transport(), "{:?}", err);
    }

    #[tokio::test]
    async fn test_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        // Accept but never answer.
        let _server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });

        let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
        let raw = RawRequest::new(http::Method::GET, url);
        let err = HttpTransport::with_timeout(Duration::from_millis(100))
            .send(raw)
            .await
            .unwrap_err();
        assert!(matches!(err, NetError::ConnectionTimedOut));
    }
}
