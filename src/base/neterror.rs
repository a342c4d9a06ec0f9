use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Broad classification of a [`NetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The transport could not deliver the request or read the response.
    Transport,
    /// A body could not be interpreted as UTF-8 or JSON.
    Decoding,
    /// The request itself is malformed (URL, path parameters, headers, body).
    Configuration,
}

#[derive(Debug, Error, Clone)]
pub enum NetError {
    // Transport Errors
    #[error("Request failed: {0}")]
    Failed(String),
    #[error("Connection closed (TCP FIN)")]
    ConnectionClosed,
    #[error("Connection reset (TCP RST)")]
    ConnectionReset,
    #[error("Connection refused")]
    ConnectionRefused,
    #[error("Connection aborted")]
    ConnectionAborted,
    #[error("Connection failed")]
    ConnectionFailed,
    #[error("Connection to {host}:{port} failed: {source}")]
    ConnectionFailedTo {
        host: String,
        port: u16,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("Name not resolved")]
    NameNotResolved,
    #[error("Name {domain} not resolved: {source}")]
    NameNotResolvedFor {
        domain: String,
        #[source]
        source: Arc<io::Error>,
    },
    #[error("SSL protocol error")]
    SslProtocolError,
    #[error("Connection timed out")]
    ConnectionTimedOut,
    #[error("Invalid response")]
    InvalidResponse,
    #[error("Empty response")]
    EmptyResponse,
    #[error("Failed to read response body")]
    HttpBodyError,

    // Configuration Errors
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Unknown URL scheme")]
    UnknownUrlScheme,
    #[error("Missing value for path parameter {{{0}}}")]
    MissingPathParameter(String),
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    // Decoding Errors
    #[error("Response has no body")]
    EmptyBody,
    #[error("Body is not valid UTF-8")]
    InvalidUtf8,
    #[error("Body is not valid JSON: {0}")]
    JsonParseError(String),
}

impl NetError {
    /// Stable numeric code. Chromium's `net_error_list.h` values where one
    /// exists, custom codes from -10000 downwards otherwise.
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::Failed(_) => -2,
            NetError::ConnectionClosed => -100,
            NetError::ConnectionReset => -101,
            NetError::ConnectionRefused => -102,
            NetError::ConnectionAborted => -103,
            NetError::ConnectionFailed | NetError::ConnectionFailedTo { .. } => -104,
            NetError::NameNotResolved | NetError::NameNotResolvedFor { .. } => -105,
            NetError::SslProtocolError => -107,
            NetError::ConnectionTimedOut => -118,
            NetError::InvalidResponse => -320,
            NetError::EmptyResponse => -324,
            NetError::HttpBodyError => -10000,

            NetError::InvalidUrl => -300,
            NetError::UnknownUrlScheme => -302,
            NetError::MissingPathParameter(_) => -10001,
            NetError::InvalidHeader(_) => -10002,
            NetError::InvalidBody(_) => -10003,

            NetError::EmptyBody => -10004,
            NetError::InvalidUtf8 => -10005,
            NetError::JsonParseError(_) => -10006,
        }
    }

    /// Which part of the pipeline produced this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NetError::InvalidUrl
            | NetError::UnknownUrlScheme
            | NetError::MissingPathParameter(_)
            | NetError::InvalidHeader(_)
            | NetError::InvalidBody(_) => ErrorKind::Configuration,
            NetError::EmptyBody | NetError::InvalidUtf8 | NetError::JsonParseError(_) => {
                ErrorKind::Decoding
            }
            _ => ErrorKind::Transport,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    pub(crate) fn connection_failed_to(host: &str, port: u16, source: io::Error) -> Self {
        NetError::ConnectionFailedTo {
            host: host.to_string(),
            port,
            source: Arc::new(source),
        }
    }

    pub(crate) fn dns_failed(domain: &str, source: io::Error) -> Self {
        NetError::NameNotResolvedFor {
            domain: domain.to_string(),
            source: Arc::new(source),
        }
    }
}
