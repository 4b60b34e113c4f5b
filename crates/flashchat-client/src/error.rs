//! FlashChat client errors.

use thiserror::Error;

/// Message returned when the gateway gives no usable error text.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Caller input rejected before any network call.
///
/// Variants are listed in the order the builder checks them; the first
/// failing rule wins.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Phone number is required")]
    MissingPhone,

    #[error("WhatsApp account is required")]
    MissingAccount,

    #[error("Message is required")]
    MissingMessage,

    #[error("OTP expiry must be a positive number of seconds")]
    InvalidExpiry,
}

impl ValidationError {
    /// Stable snake_case identifier for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingPhone => "missing_phone",
            Self::MissingAccount => "missing_account",
            Self::MissingMessage => "missing_message",
            Self::InvalidExpiry => "invalid_expiry",
        }
    }
}

/// A remote call that did not succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The gateway could not be reached or answered with something that is
    /// not an envelope.
    #[error("{0}")]
    Transport(String),

    /// The gateway answered with an envelope reporting failure.
    #[error("{0}")]
    Business(String),
}

impl DispatchError {
    pub fn message(&self) -> &str {
        match self {
            Self::Transport(msg) | Self::Business(msg) => msg,
        }
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("Request timed out: {}", err))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Errors raised while constructing a client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Template validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error(
        "Unsupported variables found: {}. Available variables: {}",
        .unsupported.join(", "),
        .available.join(", ")
    )]
    Unsupported {
        unsupported: Vec<String>,
        available: Vec<String>,
    },
}

/// Rejected inbound notifications.
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Malformed webhook payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A string that does not name a known value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {what}: {value}")]
pub struct ParseError {
    pub what: &'static str,
    pub value: String,
}
