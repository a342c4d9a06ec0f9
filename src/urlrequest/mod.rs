//! Request building and execution.
//!
//! - [`request`]: the declarative [`Request`] builder
//! - [`job`]: the execution state machine behind `send`/`execute`/`enqueue`
//! - [`plugin`], [`auth`], [`errorhandler`]: the extension points
//! - [`stub`]: canned responses

pub mod auth;
pub mod errorhandler;
pub mod job;
pub mod plugin;
pub mod request;
pub mod stub;

pub use auth::{Authenticator, BasicAuthenticator, BearerAuthenticator};
pub use errorhandler::{ErrorHandler, FnErrorHandler, Handling};
pub use job::{ExecutionState, RequestJob};
pub use plugin::Plugin;
pub use request::Request;
pub use stub::{StubDescriptor, StubMode};
