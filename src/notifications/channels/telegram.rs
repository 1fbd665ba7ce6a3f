//! Telegram Bot API channel
//!
//! Outbound messages go through `sendMessage`; inbound commands are read
//! with `getUpdates` long polling. The bot token is part of every request
//! URL, so transport errors are stripped of their URL before they can reach
//! a log line.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Channel, DeliveryError, DeliveryResult};
use crate::config::TelegramConfig;

/// Generic Bot API response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

/// Incoming update from `getUpdates`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

/// Message part of an update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

/// Chat a message was sent in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Telegram channel
///
/// # Example
///
/// ```rust,ignore
/// use ticketwatch::notifications::channels::telegram::TelegramChannel;
///
/// let channel = TelegramChannel::new(&config.telegram)?;
/// channel.send_text(config.telegram.chat_id, "hello").await?;
/// ```
pub struct TelegramChannel {
    client: Client,
    /// `{api_base}/bot{token}`, never logged
    endpoint: String,
    request_timeout: Duration,
}

impl TelegramChannel {
    /// Create a new Telegram channel
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::InvalidConfig` for an empty token or a
    /// non-http(s) API base URL
    pub fn new(config: &TelegramConfig) -> DeliveryResult<Self> {
        if config.bot_token.trim().is_empty() {
            return Err(DeliveryError::InvalidConfig(
                "Bot token cannot be empty".to_string(),
            ));
        }

        let api_base = config.api_base_url.trim_end_matches('/');
        if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
            return Err(DeliveryError::InvalidConfig(
                "API base URL must start with http:// or https://".to_string(),
            ));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| DeliveryError::InvalidConfig(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{api_base}/bot{}", config.bot_token),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.endpoint)
    }

    /// Call a Bot API method and unwrap the response envelope
    async fn call<T>(
        &self,
        method: &str,
        payload: &serde_json::Value,
        timeout: Duration,
    ) -> DeliveryResult<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DeliveryError::Http(e.without_url()))?;

        let parsed: ApiResponse<T> = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(DeliveryError::Api {
                    status: status.as_u16(),
                    description: body.chars().take(200).collect(),
                });
            }
            Err(e) => return Err(DeliveryError::Serialization(e)),
        };

        if !status.is_success() || !parsed.ok {
            return Err(DeliveryError::Api {
                status: status.as_u16(),
                description: parsed
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }

        Ok(parsed.result)
    }

    /// Long-poll for new updates starting at `offset`
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError` on transport failures or API rejection
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> DeliveryResult<Vec<Update>> {
        let payload = serde_json::json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });

        // The HTTP timeout has to outlast the server-side long poll
        let timeout = self.request_timeout + Duration::from_secs(timeout_secs);

        let updates: Option<Vec<Update>> = self.call("getUpdates", &payload, timeout).await?;
        Ok(updates.unwrap_or_default())
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> DeliveryResult<()> {
        let payload = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });

        let _: Option<serde_json::Value> = self
            .call("sendMessage", &payload, self.request_timeout)
            .await?;

        tracing::debug!(chat_id = chat_id, "Telegram message delivered");
        Ok(())
    }
}
