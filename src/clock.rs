//! Source of identifiers and timestamps
//!
//! The state machine never reads the wall clock or a random source directly;
//! everything time- or id-dependent goes through a [`Clock`] held in the
//! session context so transitions stay reproducible under test.

use chrono::Local;
use std::fmt;

/// Display format for message timestamps (24-hour, minutes precision)
pub const DISPLAY_TIME_FORMAT: &str = "%H:%M";

/// Provider of fresh ids and current times
pub trait Clock: Send + Sync + fmt::Debug {
    /// A new opaque identifier, unique for the lifetime of the process
    fn new_id(&self) -> String;

    /// Current time formatted for display next to a message
    fn display_time(&self) -> String;

    /// Current time as an RFC 3339 timestamp
    fn timestamp(&self) -> String;
}

/// Wall-clock implementation backed by uuid v4 and the local timezone
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn new_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn display_time(&self) -> String {
        Local::now().format(DISPLAY_TIME_FORMAT).to_string()
    }

    fn timestamp(&self) -> String {
        Local::now().to_rfc3339()
    }
}

/// Deterministic clock for tests: sequential ids, frozen time
#[cfg(test)]
#[derive(Debug, Default)]
pub struct FixedClock {
    next: std::sync::atomic::AtomicU64,
}

#[cfg(test)]
impl FixedClock {
    pub const DISPLAY_TIME: &'static str = "10:30";
    pub const TIMESTAMP: &'static str = "2025-02-16T10:30:00+01:00";

    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn new_id(&self) -> String {
        let n = self
            .next
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        format!("id-{n}")
    }

    fn display_time(&self) -> String {
        Self::DISPLAY_TIME.to_string()
    }

    fn timestamp(&self) -> String {
        Self::TIMESTAMP.to_string()
    }
}
