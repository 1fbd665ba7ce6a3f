//! Operator notifications
//!
//! ```text
//!   Monitor / UpdatePoller
//!            │
//!            ▼
//!   ┌──────────────────┐   messages::*   ┌─────────────────┐
//!   │     Notifier     │ ──────────────▶ │ dyn Channel     │ ──▶ Telegram
//!   │ (chat id, clock) │                 │ (send_text)     │
//!   └──────────────────┘                 └─────────────────┘
//! ```
//!
//! The notifier renders one template per message kind and hands it to the
//! channel. It never retries; a [`DeliveryError`] goes back to the caller,
//! which decides whether to log it or surface it.

pub mod channels;
pub mod messages;

use chrono::Utc;
use std::sync::Arc;

use crate::error::{Error, TicketwatchErrorTrait};
use crate::models::{AvailabilityStatus, EventKey, Snapshot};

// Re-exports
pub use channels::telegram::TelegramChannel;
pub use channels::{Channel, DeliveryError, DeliveryResult};
pub use messages::ScheduleSummary;

/// Sends formatted messages to the single operator chat
#[derive(Clone)]
pub struct Notifier {
    channel: Arc<dyn Channel>,
    chat_id: i64,
}

impl Notifier {
    pub fn new(channel: Arc<dyn Channel>, chat_id: i64) -> Self {
        Self { channel, chat_id }
    }

    /// Chat every message is sent to
    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    async fn deliver(&self, kind: &'static str, text: String) -> DeliveryResult<()> {
        tracing::debug!(kind = kind, channel = self.channel.name(), "Sending notification");
        self.channel.send_text(self.chat_id, &text).await
    }

    /// Tickets for `key` went on sale
    pub async fn status_change(
        &self,
        key: EventKey,
        status: &AvailabilityStatus,
    ) -> DeliveryResult<()> {
        self.deliver(
            "status_change",
            messages::status_change(key, status, Utc::now()),
        )
        .await
    }

    /// Periodic operational ping
    pub async fn heartbeat(&self) -> DeliveryResult<()> {
        self.deliver("heartbeat", messages::heartbeat(Utc::now())).await
    }

    /// A check cycle failed
    pub async fn check_error(&self, error: &Error) -> DeliveryResult<()> {
        let text = messages::check_error(&error.to_string(), error.category(), Utc::now());
        self.deliver("error", text).await
    }

    /// Answer to an on-demand status request
    pub async fn manual_status(&self, snapshot: &Snapshot, source_url: &str) -> DeliveryResult<()> {
        self.deliver(
            "manual_status",
            messages::manual_status(snapshot, source_url, Utc::now()),
        )
        .await
    }

    /// Answer to an on-demand status request whose fetch failed
    pub async fn manual_status_failed(&self, error: &str) -> DeliveryResult<()> {
        self.deliver(
            "manual_status",
            messages::manual_status_failed(error, Utc::now()),
        )
        .await
    }

    /// Service is up
    pub async fn startup(&self, schedule: ScheduleSummary) -> DeliveryResult<()> {
        self.deliver("startup", messages::startup(schedule, Utc::now())).await
    }

    /// Command overview
    pub async fn help(&self) -> DeliveryResult<()> {
        self.deliver("help", messages::help()).await
    }
}
