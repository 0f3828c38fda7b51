// Per-request logger
// Prefixes every line with the request id and target so that errors raised
// while serving one request can be traced back to it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{write, Level};

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Logger attached to a single in-flight request
#[derive(Debug, Clone)]
pub struct RequestLogger {
    id: u64,
    method: String,
    path: String,
}

impl RequestLogger {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed),
            method: method.into(),
            path: path.into(),
        }
    }

    pub const fn id(&self) -> u64 {
        self.id
    }

    fn prefixed(&self, message: &dyn fmt::Display) -> String {
        format!("[req#{} {} {}] {message}", self.id, self.method, self.path)
    }

    pub fn info(&self, message: &dyn fmt::Display) {
        write(Level::Info, &self.prefixed(message));
    }

    pub fn error(&self, message: &dyn fmt::Display) {
        write(Level::Error, &self.prefixed(message));
    }
}
