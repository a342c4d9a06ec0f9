//! The result of one request execution, live or stubbed.

use crate::base::neterror::NetError;
use crate::urlrequest::request::Request;
use bytes::Bytes;
use http::{HeaderMap, StatusCode, Version};

/// Status line and headers reported by the transport.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub version: Version,
    pub headers: HeaderMap,
}

/// Outcome of executing a [`Request`].
///
/// Stubbed responses carry `data` but no [`ResponseHead`]; failed transport
/// calls carry only `error`.
#[derive(Debug, Clone)]
pub struct Response {
    request: Request,
    data: Option<Bytes>,
    response: Option<ResponseHead>,
    error: Option<NetError>,
}

impl Response {
    pub fn new(
        request: Request,
        data: Option<Bytes>,
        response: Option<ResponseHead>,
        error: Option<NetError>,
    ) -> Self {
        Self {
            request,
            data,
            response,
            error,
        }
    }

    /// The request that produced this response.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Raw body bytes, if any were produced.
    pub fn data(&self) -> Option<&Bytes> {
        self.data.as_ref()
    }

    /// Transport metadata; `None` for stubbed or failed executions.
    pub fn response(&self) -> Option<&ResponseHead> {
        self.response.as_ref()
    }

    pub fn error(&self) -> Option<&NetError> {
        self.error.as_ref()
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        self.response.as_ref().map(|head| head.status)
    }

    pub fn headers(&self) -> Option<&HeaderMap> {
        self.response.as_ref().map(|head| &head.headers)
    }

    /// True for an error-free response whose status, if known, is 2xx.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
            && self
                .response
                .as_ref()
                .map_or(true, |head| head.status.is_success())
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> Result<String, NetError> {
        let data = self.data.as_ref().ok_or(NetError::EmptyBody)?;
        String::from_utf8(data.to_vec()).map_err(|_| NetError::InvalidUtf8)
    }

    /// Body deserialized as JSON.
    #[cfg(feature = "json")]
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, NetError> {
        let data = self.data.as_ref().ok_or(NetError::EmptyBody)?;
        serde_json::from_slice(data).map_err(|e| NetError::JsonParseError(e.to_string()))
    }
}
