//! Bundled plugins.

pub mod logging;

pub use logging::{BufferSink, LogLevel, LogSink, LoggingPlugin, StdoutSink, TracingSink};
