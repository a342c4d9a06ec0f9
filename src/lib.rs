//! # rage
//!
//! A declarative HTTP request builder with a pluggable execution pipeline.
//!
//! Requests are assembled fluently (base URL, path and query parameters,
//! headers, body encoding, authentication, stubs, error handlers, plugins)
//! and then executed either blocking or asynchronously. Stubbed and live
//! requests flow through the same pipeline and produce the same
//! [`Response`] type, so plugins observe both identically.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rage::{Client, ContentType, LogLevel};
//!
//! let client = Client::builder()
//!     .base_url("https://api.example.com")
//!     .content_type(ContentType::Json)
//!     .log_level(LogLevel::Medium)
//!     .build();
//!
//! let response = client
//!     .get("/users/{id}")
//!     .path("id", 42)
//!     .query("expand", "profile")
//!     .execute()?;
//! println!("Status: {:?}", response.status_code());
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error types and context helpers
//! - [`http`] - Parameters, ordered maps, bodies, raw requests and responses
//! - [`urlrequest`] - The request builder, stubs, capabilities and execution engine
//! - [`plugins`] - Bundled plugins (logging)
//! - [`socket`] - The transport seam and the default HTTP/1.1 transport
//! - [`client`] - A factory that pre-configures requests

pub mod base;
pub mod client;
pub mod http;
pub mod plugins;
pub mod socket;
pub mod urlrequest;

pub use crate::base::neterror::{ErrorKind, NetError};
pub use crate::client::{Client, ClientBuilder, ClientConfig};
pub use crate::http::{ContentType, Parameter, RawRequest, Response, ResponseHead};
pub use crate::plugins::logging::{BufferSink, LogLevel, LogSink, LoggingPlugin, StdoutSink, TracingSink};
pub use crate::socket::transport::{HttpTransport, Transport, TransportResponse};
pub use crate::urlrequest::{
    Authenticator, ErrorHandler, Handling, Plugin, Request, StubDescriptor, StubMode,
};
