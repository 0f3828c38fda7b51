//! Uniform API response envelope
//!
//! Every JSON endpoint answers with `{code, message, data}`. A zero code
//! means success.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Code used for successful responses
pub const SUCCESS_CODE: i32 = 0;

/// Message used for successful responses
pub const SUCCESS_MESSAGE: &str = "success";

/// `{code, message, data}` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn new(code: i32, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }

    /// Successful envelope carrying `data`
    pub fn success(data: T) -> Self {
        Self::new(SUCCESS_CODE, SUCCESS_MESSAGE, Some(data))
    }

    /// Failed envelope without payload
    pub fn failure(code: i32, message: impl Into<String>) -> Self {
        Self::new(code, message, None)
    }

    pub const fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self::new(SUCCESS_CODE, SUCCESS_MESSAGE, None)
    }
}
