// Uncaught error policy
// Maps a class of error to what the process does after logging it.

use std::collections::HashMap;
use std::error::Error;
use std::io;

/// Coarse classification of an uncaught error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The listening address is already taken by another process
    AddrInUse,
    Other,
}

impl ErrorClass {
    pub fn of_io(err: &io::Error) -> Self {
        if err.kind() == io::ErrorKind::AddrInUse {
            Self::AddrInUse
        } else {
            Self::Other
        }
    }

    /// Classify an error by walking its source chain for an `io::Error`
    pub fn of_error(err: &(dyn Error + 'static)) -> Self {
        let mut current = Some(err);
        while let Some(e) = current {
            if let Some(io_err) = e.downcast_ref::<io::Error>() {
                if Self::of_io(io_err) == Self::AddrInUse {
                    return Self::AddrInUse;
                }
            }
            current = e.source();
        }
        Self::of_message(&err.to_string())
    }

    /// Classify a bare message, as carried by panic payloads
    pub fn of_message(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("eaddrinuse") || lower.contains("address already in use") {
            Self::AddrInUse
        } else {
            Self::Other
        }
    }
}

/// What happens after an uncaught error was logged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LogAndContinue,
    LogAndTerminate,
}

/// Error class to action table with a fallback for unlisted classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    rules: HashMap<ErrorClass, Action>,
    fallback: Action,
}

impl PolicyTable {
    /// Empty table answering `fallback` for every class
    pub fn new(fallback: Action) -> Self {
        Self {
            rules: HashMap::new(),
            fallback,
        }
    }

    #[must_use]
    pub fn with_rule(mut self, class: ErrorClass, action: Action) -> Self {
        self.rules.insert(class, action);
        self
    }

    pub fn action_for(&self, class: ErrorClass) -> Action {
        self.rules.get(&class).copied().unwrap_or(self.fallback)
    }
}

impl Default for PolicyTable {
    /// Port conflicts stop the process, everything else keeps serving
    fn default() -> Self {
        Self::new(Action::LogAndContinue).with_rule(ErrorClass::AddrInUse, Action::LogAndTerminate)
    }
}
