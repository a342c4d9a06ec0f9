//! Request factory with shared defaults.
//!
//! A [`Client`] stamps its base URL, default headers and capabilities onto
//! every [`Request`] it creates. Each request is independent afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use rage::{Client, ContentType, LogLevel};
//!
//! let client = Client::builder()
//!     .base_url("https://api.example.com")
//!     .content_type(ContentType::Json)
//!     .log_level(LogLevel::Basic)
//!     .build();
//!
//! let resp = client.get("/users/{id}").path("id", 7).send().await?;
//! ```

use crate::http::contenttype::ContentType;
use crate::http::orderedmap::Headers;
use crate::http::parameter::IntoParameter;
use crate::plugins::logging::{LogLevel, LoggingPlugin};
use crate::socket::transport::{default_transport, HttpTransport, Transport};
use crate::urlrequest::auth::Authenticator;
use crate::urlrequest::errorhandler::ErrorHandler;
use crate::urlrequest::plugin::Plugin;
use crate::urlrequest::request::Request;
use http::Method;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Declarative client settings.
///
/// ```json
/// {
///   "base_url": "https://api.example.com",
///   "timeout_ms": 5000,
///   "user_agent": "my-app/1.0",
///   "default_headers": { "Accept": "application/json" },
///   "log_level": "basic"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix for every request path.
    pub base_url: String,

    /// Round-trip timeout for the default transport.
    pub timeout_ms: Option<u64>,

    /// Sent as `User-Agent` when set.
    pub user_agent: Option<String>,

    /// Headers added to every request, in key order.
    pub default_headers: BTreeMap<String, String>,

    /// Installs a [`LoggingPlugin`] over `tracing` when above `None`.
    pub log_level: LogLevel,
}

impl ClientConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Creates pre-configured [`Request`]s.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    headers: Headers,
    plugins: Vec<Arc<dyn Plugin>>,
    authenticator: Option<Arc<dyn Authenticator>>,
    error_handlers: Vec<Arc<dyn ErrorHandler>>,
    transport: Arc<dyn Transport>,
}

impl Default for Client {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::builder().base_url(base_url).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    pub fn get(&self, path: impl Into<String>) -> Request {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: impl Into<String>) -> Request {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: impl Into<String>) -> Request {
        self.request(Method::PUT, path)
    }

    pub fn patch(&self, path: impl Into<String>) -> Request {
        self.request(Method::PATCH, path)
    }

    pub fn delete(&self, path: impl Into<String>) -> Request {
        self.request(Method::DELETE, path)
    }

    pub fn head(&self, path: impl Into<String>) -> Request {
        self.request(Method::HEAD, path)
    }

    pub fn options(&self, path: impl Into<String>) -> Request {
        self.request(Method::OPTIONS, path)
    }

    pub fn request(&self, method: Method, path: impl Into<String>) -> Request {
        let request = Request::new(method, self.base_url.clone())
            .with_method_path(path)
            .header_dictionary(self.headers.iter().map(|(k, v)| (k, v.as_str())))
            .with_plugins(self.plugins.clone())
            .with_error_handlers(self.error_handlers.clone())
            .with_transport(self.transport.clone());
        match &self.authenticator {
            Some(authenticator) => request.authorized(authenticator.clone()),
            None => request,
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .field("plugins", &self.plugins.len())
            .field("authenticator", &self.authenticator.is_some())
            .field("error_handlers", &self.error_handlers.len())
            .finish()
    }
}

/// Builder for [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    headers: Headers,
    plugins: Vec<Arc<dyn Plugin>>,
    authenticator: Option<Arc<dyn Authenticator>>,
    error_handlers: Vec<Arc<dyn ErrorHandler>>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Start from a declarative config; later calls override it.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Default header; `None` removes one set earlier on this builder.
    pub fn header(mut self, name: impl Into<String>, value: impl IntoParameter) -> Self {
        let name = name.into();
        match value.into_parameter() {
            Some(value) => {
                self.headers.insert(name, value.value());
            }
            None => {
                self.headers.remove(&name);
            }
        }
        self
    }

    pub fn content_type(self, content_type: ContentType) -> Self {
        self.header(ContentType::HEADER, content_type.as_str())
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    pub fn error_handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.error_handlers.push(handler);
        self
    }

    /// Round-trip timeout. Ignored when a custom transport is set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.config.timeout_ms = Some(millis);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.log_level = level;
        self
    }

    pub fn build(self) -> Client {
        let config = self.config;

        let mut headers = Headers::new();
        for (name, value) in &config.default_headers {
            headers.insert(name.as_str(), value.clone());
        }
        if let Some(user_agent) = &config.user_agent {
            headers.insert("User-Agent", user_agent.clone());
        }
        for (name, value) in self.headers.iter() {
            headers.insert(name, value.clone());
        }

        let transport = match (self.transport, config.timeout_ms) {
            (Some(transport), _) => transport,
            (None, Some(ms)) => Arc::new(HttpTransport::with_timeout(Duration::from_millis(ms))),
            (None, None) => default_transport(),
        };

        let mut plugins = Vec::with_capacity(self.plugins.len() + 1);
        if config.log_level > LogLevel::None {
            plugins.push(Arc::new(LoggingPlugin::new(config.log_level)) as Arc<dyn Plugin>);
        }
        plugins.extend(self.plugins);

        tracing::debug!(
            base_url = %config.base_url,
            headers = headers.len(),
            plugins = plugins.len(),
            "client built"
        );

        Client {
            base_url: config.base_url,
            headers,
            plugins,
            authenticator: self.authenticator,
            error_handlers: self.error_handlers,
            transport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_saturates() {
        let builder = Client::builder().timeout(Duration::MAX);
        assert_eq!(builder.config.timeout_ms, Some(u64::MAX));

        let builder = Client::builder().timeout(Duration::from_millis(1500));
        assert_eq!(builder.config.timeout_ms, Some(1500));
    }

    #[test]
    fn test_config_from_json() {
        let config = ClientConfig::from_json(
            r#"{
                "base_url": "https://api.example.com",
                "timeout_ms": 2500,
                "default_headers": {"Accept": "application/json"},
                "log_level": "full"
            }"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout_ms, Some(2500));
        assert_eq!(config.user_agent, None);
        assert_eq!(config.default_headers["Accept"], "application/json");
        assert_eq!(config.log_level, LogLevel::Full);
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::from_json("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.log_level, LogLevel::None);
    }

    #[test]
    fn test_header_order_and_override() {
        let mut config = ClientConfig::default();
        config.default_headers.insert("Accept".into(), "*/*".into());
        config.user_agent = Some("rage-test".into());

        let client = Client::builder()
            .config(config)
            .header("Accept", "text/plain")
            .header("X-Extra", 1)
            .build();

        let keys: Vec<_> = client.headers().keys().collect();
        assert_eq!(keys, vec!["Accept", "User-Agent", "X-Extra"]);
        assert_eq!(client.headers().get("Accept").unwrap(), "text/plain");
    }

    #[test]
    fn test_log_level_installs_plugin() {
        assert!(Client::builder().build().plugins().is_empty());
        let client = Client::builder().log_level(LogLevel::Basic).build();
        assert_eq!(client.plugins().len(), 1);
    }
}
