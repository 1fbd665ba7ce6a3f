//! ticketwatch - ticket-sale availability watcher
//!
//! Periodically scrapes a ticket listing page and messages a single operator
//! on Telegram the moment tickets for a tracked match go on sale.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration from the environment and optional TOML file
//! - [`crawler`] - Page retrieval and the single-retry wrapper
//! - [`parser`] - HTML parsing and availability extraction
//! - [`models`] - Core data structures and types
//! - [`notifications`] - Message templates and the Telegram channel
//! - [`scheduler`] - Change detection state machine and periodic triggers
//! - [`bot`] - Inbound command dispatch and polling
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ticketwatch::config::Config;
//! use ticketwatch::crawler::TicketFetcher;
//! use ticketwatch::notifications::{Notifier, TelegramChannel};
//! use ticketwatch::scheduler::Monitor;
//! use ticketwatch::utils::retry::RetryConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let channel = Arc::new(TelegramChannel::new(&config.telegram)?);
//!     let notifier = Notifier::new(channel, config.telegram.chat_id);
//!     let fetcher = Arc::new(TicketFetcher::new(&config.target)?);
//!     let monitor = Monitor::new(fetcher, notifier, RetryConfig::default());
//!     monitor.run_check().await;
//!     Ok(())
//! }
//! ```

pub mod bot;
pub mod config;
pub mod crawler;
pub mod error;
pub mod models;
pub mod notifications;
pub mod parser;
pub mod scheduler;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::crawler::{fetch_with_retry, SnapshotSource, TicketFetcher};
    pub use crate::error::{Error, ErrorCategory, Result, TicketwatchErrorTrait};
    pub use crate::models::{AvailabilityStatus, EventKey, Snapshot};
    pub use crate::notifications::{Channel, Notifier, TelegramChannel};
    pub use crate::scheduler::{CycleOutcome, Monitor, PeriodicTrigger};
}

// Direct re-exports for convenience
pub use models::{AvailabilityStatus, EventKey, Snapshot};
