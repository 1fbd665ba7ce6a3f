//! Unified error handling for the ticketwatch crate
//!
//! Domain-specific errors are consolidated into a single [`Error`] enum so
//! the scheduler can treat every failure of a check cycle the same way,
//! while callers that care can still match on the concrete variant.
//!
//! - [`TicketwatchErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors

use thiserror::Error;

pub use crate::notifications::channels::DeliveryError;
pub use crate::utils::error::{ExtractionError, FetchError};

/// Common trait for all ticketwatch error types
pub trait TicketwatchErrorTrait: std::error::Error {
    /// Check if this error is likely transient
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// HTTP, timeout and transport failures while fetching the page
    Network,
    /// Page structure did not match expectations
    Parsing,
    /// Chat message could not be delivered
    Delivery,
}

impl ErrorCategory {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Parsing => "parsing",
            Self::Delivery => "delivery",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unified error type for the ticketwatch crate
#[derive(Error, Debug)]
pub enum Error {
    /// Page could not be retrieved
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Page was retrieved but lacks the expected structure
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Notification could not be delivered
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),
}

impl TicketwatchErrorTrait for FetchError {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout => true,
            Self::ServerError(status) => matches!(status, 429 | 500..=599),
            Self::InvalidUrl(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Network
    }
}

impl TicketwatchErrorTrait for ExtractionError {
    fn is_recoverable(&self) -> bool {
        // An error page served once can be gone on the next request
        matches!(self, Self::NoMatchBlocks)
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Parsing
    }
}

impl TicketwatchErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_recoverable(),
            Self::Extraction(e) => e.is_recoverable(),
            Self::Delivery(e) => e.is_recoverable(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(_) => ErrorCategory::Network,
            Self::Extraction(_) => ErrorCategory::Parsing,
            Self::Delivery(_) => ErrorCategory::Delivery,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
