//! BlockPad error types and failure classification.

use core_logic::Retryable;
use serde::Deserialize;
use serde_json::Value;
use std::error::Error as StdError;
use std::io;
use thiserror::Error;

/// Wording the service uses for a faucet claim made too early.
const FAUCET_COOLDOWN_MARKER: &str = "Faucet on cooldown";

/// Error payload returned by the API on non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default, rename = "remainingHours")]
    pub remaining_hours: Option<Value>,
}

impl ApiErrorBody {
    pub fn error_text(&self) -> Option<String> {
        match &self.error {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        }
    }

    pub fn remaining_hours_text(&self) -> String {
        match &self.remaining_hours {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => "unknown".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum BlockpadError {
    /// The API answered with a non-2xx status.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        body: Option<ApiErrorBody>,
    },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid endpoint '{path}': {source}")]
    InvalidEndpoint {
        path: String,
        #[source]
        source: url::ParseError,
    },
}

impl BlockpadError {
    /// Builds an [`BlockpadError::Api`] from a raw response body.
    ///
    /// The message is the body's `error` field when present, otherwise a
    /// generic status line.
    pub fn from_response(status: u16, text: &str) -> Self {
        let body = serde_json::from_str::<ApiErrorBody>(text).ok();
        let message = body
            .as_ref()
            .and_then(ApiErrorBody::error_text)
            .unwrap_or_else(|| format!("Request failed with status code {}", status));

        BlockpadError::Api {
            status,
            message,
            body,
        }
    }

    pub fn body(&self) -> Option<&ApiErrorBody> {
        match self {
            BlockpadError::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    pub fn is_cooldown(&self) -> bool {
        match self {
            BlockpadError::Api {
                status,
                body: Some(body),
                ..
            } => is_faucet_cooldown(*status, body),
            _ => false,
        }
    }
}

/// The only place that knows what a faucet cooldown looks like on the wire.
pub fn is_faucet_cooldown(status: u16, body: &ApiErrorBody) -> bool {
    status == 400
        && matches!(&body.error, Some(Value::String(msg)) if msg.contains(FAUCET_COOLDOWN_MARKER))
}

impl Retryable for BlockpadError {
    fn is_terminal(&self) -> bool {
        self.is_cooldown()
    }

    fn is_connection_fault(&self) -> bool {
        let BlockpadError::Transport(e) = self else {
            return false;
        };
        if e.is_timeout() {
            return true;
        }

        let mut source = e.source();
        while let Some(err) = source {
            if let Some(io_err) = err.downcast_ref::<io::Error>() {
                if matches!(
                    io_err.kind(),
                    io::ErrorKind::ConnectionReset
                        | io::ErrorKind::ConnectionAborted
                        | io::ErrorKind::TimedOut
                ) {
                    return true;
                }
            }
            source = err.source();
        }
        false
    }
}
