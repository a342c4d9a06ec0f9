//! Request/response logging.
//!
//! Output is line-oriented and goes through a [`LogSink`], so the same
//! plugin can feed `tracing`, stdout, or an in-memory buffer for tests.
//!
//! | level    | request line | request headers | request body | response |
//! |----------|--------------|-----------------|--------------|----------|
//! | `None`   |              |                 |              |          |
//! | `Basic`  | yes          |                 |              |          |
//! | `Medium` | yes          |                 | yes          | yes      |
//! | `Full`   | yes          | yes             | yes          | yes, with headers |

use crate::http::rawrequest::RawRequest;
use crate::http::response::Response;
use crate::urlrequest::plugin::Plugin;
use crate::urlrequest::request::Request;
use serde::Deserialize;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const STUB_MARKER: &str = "STUBBED ";

/// Verbosity of a [`LoggingPlugin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    None,
    Basic,
    Medium,
    Full,
}

/// Destination for log lines.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Forwards each line to `tracing` at INFO under target `rage::logging`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&self, line: &str) {
        tracing::info!(target: "rage::logging", "{}", line);
    }
}

/// Prints each line to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&self, line: &str) {
        println!("{}", line);
    }
}

/// Keeps lines in memory.
#[derive(Debug, Default)]
pub struct BufferSink {
    lines: Mutex<Vec<String>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub fn lines(&self) -> Vec<String> {
        self.buffer().clone()
    }

    pub fn clear(&self) {
        self.buffer().clear();
    }

    /// A panicking writer must not silence every later line.
    fn buffer(&self) -> MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for BufferSink {
    fn write_line(&self, line: &str) {
        self.buffer().push(line.to_string());
    }
}

/// Plugin that writes request and response traces.
#[derive(Clone)]
pub struct LoggingPlugin {
    level: LogLevel,
    sink: Arc<dyn LogSink>,
}

impl LoggingPlugin {
    /// Log through `tracing`.
    pub fn new(level: LogLevel) -> Self {
        Self::with_sink(level, Arc::new(TracingSink))
    }

    pub fn with_sink(level: LogLevel, sink: Arc<dyn LogSink>) -> Self {
        Self { level, sink }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    fn line(&self, line: impl AsRef<str>) {
        self.sink.write_line(line.as_ref());
    }

    fn log_request(&self, stubbed: bool, raw: &RawRequest) {
        if self.level >= LogLevel::Basic {
            self.line(format!("--> {}{} {}", marker(stubbed), raw.method(), raw.url()));
        }
        if self.level >= LogLevel::Full {
            for (name, value) in raw.headers().iter() {
                self.line(format!("{}: {}", name, value));
            }
        }
        if self.level >= LogLevel::Medium {
            if let Some(text) = raw.body().and_then(|b| std::str::from_utf8(b).ok()) {
                self.line("");
                self.line(text);
            }
        }
    }

    fn log_response(&self, response: &Response, raw: &RawRequest) {
        if self.level < LogLevel::Medium {
            return;
        }
        let stubbed = response.request().is_stubbed();
        self.line(format!("<-- {}{} {}", marker(stubbed), raw.method(), raw.url()));

        let Some(data) = response.data() else {
            self.line("Empty response data");
            return;
        };

        if stubbed {
            if let Ok(text) = std::str::from_utf8(data) {
                self.line(text);
            }
            return;
        }

        let Some(head) = response.response() else {
            self.line("Empty response");
            return;
        };

        self.line(status_line(head.status.as_u16()));

        if self.level >= LogLevel::Full {
            for (name, value) in head.headers.iter() {
                self.line(format!("{}: {}", name, String::from_utf8_lossy(value.as_bytes())));
            }
        }

        let is_json = head
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));

        if is_json {
            self.line(pretty_json(data).unwrap_or_default());
        } else if let Ok(text) = std::str::from_utf8(data) {
            self.line(text);
        }
    }
}

impl fmt::Debug for LoggingPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingPlugin")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}

impl Plugin for LoggingPlugin {
    fn did_send_request(&self, request: &Request, raw: &RawRequest) {
        self.log_request(request.is_stubbed(), raw);
    }

    fn did_receive_response(&self, response: &Response, raw: &RawRequest) {
        self.log_response(response, raw);
    }
}

fn marker(stubbed: bool) -> &'static str {
    if stubbed {
        STUB_MARKER
    } else {
        ""
    }
}

/// `"Status code: <code>"` plus an emoji for the status class.
pub fn status_line(code: u16) -> String {
    let emoji = match code {
        100..=199 => " ℹ️",
        200..=299 => " ✅",
        300..=399 => " ➡️",
        400..=499 => " ❌",
        500..=599 => " 🆘",
        _ => "",
    };
    format!("Status code: {}{}", code, emoji)
}

fn pretty_json(data: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(data).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_sink_survives_poisoning() {
        let sink = Arc::new(BufferSink::new());
        sink.write_line("before");

        let poisoner = sink.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lines.lock().unwrap();
            panic!("writer died");
        })
        .join();
        assert!(sink.lines.is_poisoned());

        sink.write_line("after");
        assert_eq!(sink.lines(), vec!["before", "after"]);
        sink.clear();
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_status_lines() {
        assert_eq!(status_line(101), "Status code: 101 ℹ️");
        assert_eq!(status_line(200), "Status code: 200 ✅");
        assert_eq!(status_line(302), "Status code: 302 ➡️");
        assert_eq!(status_line(404), "Status code: 404 ❌");
        assert_eq!(status_line(503), "Status code: 503 🆘");
        assert_eq!(status_line(99), "Status code: 99");
        assert_eq!(status_line(600), "Status code: 600");
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(LogLevel::None < LogLevel::Basic);
        assert!(LogLevel::Basic < LogLevel::Medium);
        assert!(LogLevel::Medium < LogLevel::Full);
    }

    #[test]
    fn test_level_from_config() {
        let level: LogLevel = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(level, LogLevel::Medium);
    }

    #[test]
    fn test_pretty_json() {
        assert_eq!(pretty_json(br#"{"a":1}"#).unwrap(), "{\n  \"a\": 1\n}");
        assert!(pretty_json(b"not json").is_none());
    }

    #[test]
    fn test_buffer_sink() {
        let sink = BufferSink::new();
        sink.write_line("one");
        sink.write_line("two");
        assert_eq!(sink.lines(), vec!["one", "two"]);
        sink.clear();
        assert!(sink.lines().is_empty());
    }
}
