//! Application error types.

use flashchat_client::{ClientError, MessageType, ValidationError, WebhookError};
use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to send {message_type}: {error}")]
    SendFailed {
        message_type: MessageType,
        error: String,
    },

    #[error("{operation} failed: {error}")]
    RequestFailed {
        operation: &'static str,
        error: String,
    },

    #[error("Invalid statistics window: {0}")]
    InvalidWindow(String),

    #[error("Webhook rejected: {0}")]
    Webhook(#[from] WebhookError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid bulk file: {0}")]
    BulkFile(#[from] serde_json::Error),
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;
