//! Long-polling loop for inbound commands

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::bot::{dispatch, Action};
use crate::notifications::channels::telegram::{TelegramChannel, Update};
use crate::notifications::{DeliveryResult, Notifier};
use crate::scheduler::Monitor;

/// Pause after a failed poll before trying again
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Source of inbound updates
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Wait up to `timeout_secs` for updates with id >= `offset`
    async fn poll(&self, offset: Option<i64>, timeout_secs: u64) -> DeliveryResult<Vec<Update>>;
}

#[async_trait]
impl UpdateSource for TelegramChannel {
    async fn poll(&self, offset: Option<i64>, timeout_secs: u64) -> DeliveryResult<Vec<Update>> {
        self.get_updates(offset, timeout_secs).await
    }
}

/// Reads commands from the chat and answers them
pub struct UpdatePoller {
    updates: Arc<dyn UpdateSource>,
    monitor: Arc<Monitor>,
    notifier: Notifier,
    poll_timeout_secs: u64,
    offset: Option<i64>,
}

impl UpdatePoller {
    pub fn new(
        updates: Arc<dyn UpdateSource>,
        monitor: Arc<Monitor>,
        notifier: Notifier,
        poll_timeout_secs: u64,
    ) -> Self {
        Self {
            updates,
            monitor,
            notifier,
            poll_timeout_secs,
            offset: None,
        }
    }

    /// Poll until `shutdown` flips to `true`
    ///
    /// A pending long poll is abandoned on shutdown; a command already being
    /// answered is finished first.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(chat_id = self.notifier.chat_id(), "Command listener started");

        while !*shutdown.borrow() {
            let polled = tokio::select! {
                polled = self.updates.poll(self.offset, self.poll_timeout_secs) => polled,
                _ = shutdown.changed() => break,
            };

            match polled {
                Ok(updates) => {
                    for update in &updates {
                        self.offset = Some(update.update_id + 1);
                        self.handle_update(update).await;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to poll for updates");
                    tokio::select! {
                        _ = tokio::time::sleep(ERROR_BACKOFF) => {}
                        _ = shutdown.changed() => break,
                    }
                }
            }
        }

        tracing::info!("Command listener stopped");
    }

    /// Answer a single update
    pub async fn handle_update(&self, update: &Update) -> Action {
        let Some(message) = &update.message else {
            return Action::Ignore;
        };
        let text = message.text.as_deref().unwrap_or_default();
        let action = dispatch(self.notifier.chat_id(), message.chat.id, text);

        let result = match action {
            Action::Ignore => {
                tracing::debug!(sender = message.chat.id, "Ignoring message");
                return action;
            }
            Action::Status => {
                tracing::info!("Status requested");
                self.monitor.manual_status().await
            }
            Action::Help => self.notifier.help().await,
        };

        if let Err(e) = result {
            tracing::warn!(action = ?action, error = %e, "Failed to answer command");
        }

        action
    }
}
