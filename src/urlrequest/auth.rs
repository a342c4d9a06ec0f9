//! Credential decoration for outgoing requests.

use crate::http::rawrequest::RawRequest;
use std::fmt;
use std::sync::Arc;

/// Decorates an outgoing raw request with credentials.
///
/// Called once per execution, after the raw request is built and before
/// `did_send_request` fires. Implementations must be thread-safe.
pub trait Authenticator: Send + Sync {
    fn authorize(&self, request: RawRequest) -> RawRequest;
}

impl<A: Authenticator + ?Sized> Authenticator for Arc<A> {
    fn authorize(&self, request: RawRequest) -> RawRequest {
        (**self).authorize(request)
    }
}

/// HTTP Basic authentication (`Authorization: Basic base64(user:password)`).
#[derive(Clone)]
pub struct BasicAuthenticator {
    username: String,
    password: String,
}

impl BasicAuthenticator {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn header_value(&self) -> String {
        use base64::{engine::general_purpose, Engine as _};
        let creds = format!("{}:{}", self.username, self.password);
        format!("Basic {}", general_purpose::STANDARD.encode(creds))
    }
}

impl fmt::Debug for BasicAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthenticator")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Authenticator for BasicAuthenticator {
    fn authorize(&self, mut request: RawRequest) -> RawRequest {
        request.set_header("Authorization", self.header_value());
        request
    }
}

type TokenSource = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Bearer token authentication.
///
/// The token is read from its source on every execution, so rotating
/// credentials take effect without rebuilding requests. A source that
/// yields `None` leaves the request untouched.
#[derive(Clone)]
pub struct BearerAuthenticator {
    source: TokenSource,
}

impl BearerAuthenticator {
    /// A fixed token.
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            source: Arc::new(move || Some(token.clone())),
        }
    }

    /// A token looked up at execution time.
    pub fn from_source<F>(source: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        Self {
            source: Arc::new(source),
        }
    }
}

impl fmt::Debug for BearerAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuthenticator").finish_non_exhaustive()
    }
}

impl Authenticator for BearerAuthenticator {
    fn authorize(&self, mut request: RawRequest) -> RawRequest {
        match (self.source)() {
            Some(token) => request.set_header("Authorization", format!("Bearer {}", token)),
            None => tracing::debug!(url = %request.url(), "bearer token source returned nothing"),
        }
        request
    }
}
