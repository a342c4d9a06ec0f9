//! The fully materialized request handed to plugins, authenticators and the transport.

use crate::base::neterror::NetError;
use crate::http::orderedmap::Headers;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::Method;
use http_body_util::Full;
use url::Url;

/// Method, absolute URL, headers (original casing) and encoded body.
#[derive(Debug, Clone)]
pub struct RawRequest {
    method: Method,
    url: Url,
    headers: Headers,
    body: Option<Bytes>,
}

impl RawRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Set or replace a header, keeping its position if it already exists.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name, value.into());
    }

    pub fn remove_header(&mut self, name: &str) {
        self.headers.remove(name);
    }

    pub fn set_body(&mut self, body: Option<Bytes>) {
        self.body = body;
    }

    /// Convert into an `http::Request` for hyper.
    ///
    /// Adds `Host` when absent; header names are validated here, not at build time.
    pub fn to_http(&self) -> Result<http::Request<Full<Bytes>>, NetError> {
        let mut builder = http::Request::builder()
            .method(self.method.clone())
            .uri(self.url.as_str());

        if !self.headers.keys().any(|k| k.eq_ignore_ascii_case("host")) {
            let host = self.url.host_str().ok_or(NetError::InvalidUrl)?;
            let host = match self.url.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            };
            builder = builder.header(http::header::HOST, host);
        }

        for (name, value) in self.headers.iter() {
            let (name, value) = parse_header(name, value)?;
            builder = builder.header(name, value);
        }

        builder
            .body(Full::new(self.body.clone().unwrap_or_default()))
            .map_err(|_| NetError::InvalidUrl)
    }
}

/// Validate a header pair against the HTTP grammar.
pub(crate) fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), NetError> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| NetError::InvalidHeader(name.to_string()))?;
    let header_value =
        HeaderValue::from_str(value).map_err(|_| NetError::InvalidHeader(name.to_string()))?;
    Ok((header_name, header_value))
}
