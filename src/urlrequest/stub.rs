//! Canned responses that replace the transport.

use bytes::Bytes;
use std::time::Duration;

/// When a stub is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StubMode {
    /// Answer from the stub without waiting.
    #[default]
    Immediate,
    /// Ignore the stub and go to the network.
    Never,
    /// Answer from the stub after the given number of milliseconds.
    Delayed(u64),
}

impl StubMode {
    /// Whether a stub in this mode replaces the transport.
    pub fn is_active(&self) -> bool {
        !matches!(self, StubMode::Never)
    }

    /// Delay before the stubbed response is delivered.
    pub fn delay(&self) -> Option<Duration> {
        match self {
            StubMode::Delayed(ms) => Some(Duration::from_millis(*ms)),
            _ => None,
        }
    }
}

/// Stub bytes together with their [`StubMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubDescriptor {
    pub data: Bytes,
    pub mode: StubMode,
}

impl StubDescriptor {
    pub fn new(data: impl Into<Bytes>, mode: StubMode) -> Self {
        Self {
            data: data.into(),
            mode,
        }
    }
}
