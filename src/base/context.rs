//! IO error classification for the connect and transfer phases.
//!
//! Socket errors with a well-known meaning (refused, reset, aborted, timed
//! out, closed) map onto their own `NetError` variants so error handlers can
//! match on them. Everything else keeps the host or domain it happened on.

use crate::base::neterror::NetError;
use std::io;

/// The `NetError` a socket-level IO error stands for, if it has one.
pub fn classify_io(error: &io::Error) -> Option<NetError> {
    match error.kind() {
        io::ErrorKind::ConnectionRefused => Some(NetError::ConnectionRefused),
        io::ErrorKind::ConnectionReset => Some(NetError::ConnectionReset),
        io::ErrorKind::ConnectionAborted => Some(NetError::ConnectionAborted),
        io::ErrorKind::TimedOut => Some(NetError::ConnectionTimedOut),
        io::ErrorKind::UnexpectedEof | io::ErrorKind::BrokenPipe => {
            Some(NetError::ConnectionClosed)
        }
        _ => None,
    }
}

/// Extension trait turning IO results from the connect path into `NetError`s.
pub trait IoResultExt<T> {
    /// Classify a TCP connect failure.
    ///
    /// # Example
    /// ```ignore
    /// use rage::base::context::IoResultExt;
    ///
    /// let stream = TcpStream::connect(addr).await
    ///     .connection_context("example.com", 443)?;
    /// // refused -> NetError::ConnectionRefused
    /// // anything unclassified -> "Connection to example.com:443 failed: ..."
    /// ```
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError>;

    /// Attach the domain to a resolver failure.
    fn dns_context(self, domain: &str) -> Result<T, NetError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError> {
        self.map_err(|e| match classify_io(&e) {
            Some(classified) => {
                tracing::debug!(host, port, error = %e, "connect failed");
                classified
            }
            None => NetError::connection_failed_to(host, port, e),
        })
    }

    fn dns_context(self, domain: &str) -> Result<T, NetError> {
        self.map_err(|e| NetError::dns_failed(domain, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    fn failed(kind: ErrorKind) -> Result<(), io::Error> {
        Err(Error::new(kind, "boom"))
    }

    #[test]
    fn test_well_known_socket_errors_are_classified() {
        let cases = [
            (ErrorKind::ConnectionRefused, -102),
            (ErrorKind::ConnectionReset, -101),
            (ErrorKind::ConnectionAborted, -103),
            (ErrorKind::TimedOut, -118),
            (ErrorKind::UnexpectedEof, -100),
        ];
        for (kind, code) in cases {
            let err = failed(kind).connection_context("example.com", 443).unwrap_err();
            assert_eq!(err.as_i32(), code, "{:?}", kind);
            assert!(err.is_transport());
        }
        assert!(matches!(
            failed(ErrorKind::ConnectionRefused).connection_context("a.test", 80),
            Err(NetError::ConnectionRefused)
        ));
    }

    #[test]
    fn test_unclassified_error_keeps_host() {
        let err = failed(ErrorKind::AddrNotAvailable)
            .connection_context("example.com", 443)
            .unwrap_err();

        match err {
            NetError::ConnectionFailedTo { host, port, .. } => {
                assert_eq!(host, "example.com");
                assert_eq!(port, 443);
            }
            other => panic!("expected ConnectionFailedTo, got {:?}", other),
        }
    }

    #[test]
    fn test_dns_failure_keeps_domain() {
        let err = failed(ErrorKind::NotFound)
            .dns_context("unknown.example.com")
            .unwrap_err();

        match err {
            NetError::NameNotResolvedFor { domain, .. } => {
                assert_eq!(domain, "unknown.example.com");
            }
            other => panic!("expected NameNotResolvedFor, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_leaves_other_kinds_alone() {
        assert!(classify_io(&Error::new(ErrorKind::InvalidData, "x")).is_none());
        assert!(classify_io(&Error::new(ErrorKind::PermissionDenied, "x")).is_none());
    }
}
