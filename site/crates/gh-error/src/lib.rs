//! Error taxonomy for calls against the WHMCS action API.
//!
//! The three variants distinguish where a round trip broke down: before any
//! response arrived, at the HTTP status line, or while decoding the body.
//! Errors serialise with a `kind` tag so a frontend can render them without
//! matching on display strings.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiError {
    /// Connection, DNS, or timeout failure before a response was read.
    #[error("network error: {message}")]
    Network { message: String },
    /// The endpoint answered with a status outside 200-299.
    #[error("HTTP error! status: {status}")]
    Transport { status: u16 },
    /// The body was not valid JSON.
    #[error("invalid JSON response: {message}")]
    Decode { message: String },
}

impl ApiError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Transport { .. } => "transport",
            Self::Decode { .. } => "decode",
        }
    }

    /// HTTP status for transport failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}
