use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use crate::socket::stream::SocketType;
use boring::ssl::{SslConnector, SslMethod};
use tokio::net::TcpStream;
use url::Url;

/// ALPN wire format for HTTP/1.1 only; the transport never speaks h2.
const ALPN_HTTP11: &[u8] = b"\x08http/1.1";

/// Establishes a connection for one request: DNS, TCP, then TLS for https.
pub struct ConnectJob;

impl ConnectJob {
    pub async fn connect(url: &Url) -> Result<SocketType, NetError> {
        let secure = match url.scheme() {
            "http" => false,
            "https" => true,
            _ => return Err(NetError::UnknownUrlScheme),
        };
        let host = url.host_str().ok_or(NetError::InvalidUrl)?;
        let port = url.port_or_known_default().ok_or(NetError::InvalidUrl)?;

        // 1. DNS
        let addrs: Vec<_> = tokio::net::lookup_host((host, port))
            .await
            .dns_context(host)?
            .collect();
        if addrs.is_empty() {
            return Err(NetError::NameNotResolved);
        }

        // 2. TCP, first address that answers
        let mut last_error = None;
        let mut stream = None;
        for addr in addrs {
            match TcpStream::connect(addr).await {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => {
                    tracing::debug!(%addr, error = %e, "tcp connect attempt failed");
                    last_error = Some(e);
                }
            }
        }
        let stream = match (stream, last_error) {
            (Some(s), _) => s,
            (None, Some(e)) => return Err(e).connection_context(host, port),
            (None, None) => return Err(NetError::ConnectionFailed),
        };
        // Best effort; small request bodies go out in one segment.
        let _ = stream.set_nodelay(true);

        if !secure {
            return Ok(SocketType::Tcp(stream));
        }

        // 3. TLS
        let mut builder =
            SslConnector::builder(SslMethod::tls()).map_err(|_| NetError::SslProtocolError)?;
        builder
            .set_alpn_protos(ALPN_HTTP11)
            .map_err(|_| NetError::SslProtocolError)?;
        let config = builder
            .build()
            .configure()
            .map_err(|_| NetError::SslProtocolError)?;

        let tls_stream = tokio_boring::connect(config, host, stream)
            .await
            .map_err(|e| {
                tracing::debug!(host, error = ?e, "tls handshake failed");
                NetError::SslProtocolError
            })?;

        Ok(SocketType::Ssl(tls_stream))
    }
}
