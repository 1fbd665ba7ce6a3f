//! Notification channels for delivering chat messages
//!
//! A channel only knows how to put a block of text in front of a chat;
//! formatting lives in [`crate::notifications::messages`].

pub mod telegram;

use async_trait::async_trait;

use crate::error::{ErrorCategory, TicketwatchErrorTrait};

/// Result type for channel operations
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Errors that can occur while delivering a message
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The chat API answered but refused the request
    #[error("API rejected request ({status}): {description}")]
    Api { status: u16, description: String },

    /// Invalid channel configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Response body could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TicketwatchErrorTrait for DeliveryError {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Api { status, .. } => matches!(status, 429 | 500..=599),
            Self::InvalidConfig(_) | Self::Serialization(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Delivery
    }
}

/// Trait for outbound message channels
#[async_trait]
pub trait Channel: Send + Sync {
    /// Get the channel name
    fn name(&self) -> &str;

    /// Deliver `text` to `chat_id`; no retries
    async fn send_text(&self, chat_id: i64, text: &str) -> DeliveryResult<()>;
}
