//! Configuration management for the ticket watcher
//!
//! Non-secret settings come from built-in defaults or an optional TOML file.
//! The bot token and the operator chat id are only ever read from the
//! environment, and both are required.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::crawler::headers::DEFAULT_USER_AGENT;
use crate::notifications::ScheduleSummary;

/// Environment variable holding the bot token
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable holding the allow-listed chat id
pub const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Default ticket page
pub const DEFAULT_TARGET_URL: &str = "https://fckairat.com/tickets/";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chat transport configuration
    pub telegram: TelegramConfig,

    /// Ticket page configuration
    pub target: TargetConfig,

    /// Check and heartbeat timing
    pub schedule: ScheduleConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot credential, environment only
    #[serde(skip)]
    pub bot_token: String,

    /// The only chat that receives messages and may issue commands
    #[serde(skip)]
    pub chat_id: i64,

    /// Bot API base URL
    pub api_base_url: String,

    /// Timeout for a single API request in seconds
    pub request_timeout_secs: u64,
}

/// Ticket page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Page listing the matches
    pub url: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// User agent string
    pub user_agent: String,
}

/// Timing of the periodic triggers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between availability checks
    pub check_interval_secs: u64,

    /// Seconds between heartbeat messages
    pub heartbeat_interval_secs: u64,

    /// Pause before the single retry of a failed fetch
    pub retry_delay_secs: u64,

    /// Long-poll timeout for inbound commands
    pub poll_timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: 0,
            api_base_url: String::from("https://api.telegram.org"),
            request_timeout_secs: 10,
        }
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: String::from(DEFAULT_TARGET_URL),
            request_timeout_secs: 10,
            user_agent: String::from(DEFAULT_USER_AGENT),
        }
    }
}

impl TargetConfig {
    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 120,
            heartbeat_interval_secs: 3 * 60 * 60,
            retry_delay_secs: 2,
            poll_timeout_secs: 30,
        }
    }
}

impl ScheduleConfig {
    #[must_use]
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    /// Figures quoted in the startup message
    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            check_interval_secs: self.check_interval_secs,
            heartbeat_interval_secs: self.heartbeat_interval_secs,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Load an optional TOML file, then apply environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        base.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Apply variables from `lookup` and validate the result
    ///
    /// Every missing required variable is named in the error, not just the first.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = get(ENV_BOT_TOKEN);
        let chat_id = get(ENV_CHAT_ID);

        let missing: Vec<&str> = [(ENV_BOT_TOKEN, &bot_token), (ENV_CHAT_ID, &chat_id)]
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }

        self.telegram.bot_token = bot_token.unwrap_or_default();
        let chat_id = chat_id.unwrap_or_default();
        self.telegram.chat_id = chat_id
            .parse::<i64>()
            .with_context(|| format!("{ENV_CHAT_ID} must be a numeric chat id, got '{chat_id}'"))?;

        if let Some(url) = get("TICKETWATCH_TARGET_URL") {
            self.target.url = url;
        }

        if let Some(user_agent) = get("TICKETWATCH_USER_AGENT") {
            self.target.user_agent = user_agent;
        }

        let parse_secs = |key: &str| get(key).and_then(|v| v.parse::<u64>().ok());

        if let Some(secs) = parse_secs("TICKETWATCH_REQUEST_TIMEOUT") {
            self.target.request_timeout_secs = secs;
        }

        if let Some(secs) = parse_secs("TICKETWATCH_CHECK_INTERVAL") {
            self.schedule.check_interval_secs = secs;
        }

        if let Some(secs) = parse_secs("TICKETWATCH_HEARTBEAT_INTERVAL") {
            self.schedule.heartbeat_interval_secs = secs;
        }

        if let Some(secs) = parse_secs("TICKETWATCH_RETRY_DELAY") {
            self.schedule.retry_delay_secs = secs;
        }

        if let Some(api_base_url) = get("TELEGRAM_API_BASE_URL") {
            self.telegram.api_base_url = api_base_url;
        }

        if let Some(level) = get("TICKETWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(format) = get("TICKETWATCH_LOG_FORMAT") {
            self.logging.format = format;
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.is_empty() {
            anyhow::bail!("{ENV_BOT_TOKEN} must not be empty");
        }

        let url = Url::parse(&self.target.url)
            .with_context(|| format!("Invalid target URL: {}", self.target.url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("Target URL must use http or https");
        }

        if self.target.request_timeout_secs == 0 || self.telegram.request_timeout_secs == 0 {
            anyhow::bail!("request timeouts must be greater than 0");
        }

        if !(60..=3600).contains(&self.schedule.check_interval_secs) {
            anyhow::bail!("check_interval_secs must be between 60 and 3600");
        }

        if self.schedule.heartbeat_interval_secs == 0 {
            anyhow::bail!("heartbeat_interval_secs must be greater than 0");
        }

        if self.schedule.retry_delay_secs >= self.schedule.check_interval_secs {
            anyhow::bail!("retry_delay_secs must be shorter than the check interval");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.schedule.check_interval_secs, 120);
        assert_eq!(config.schedule.heartbeat_interval_secs, 10_800);
        assert_eq!(config.schedule.retry_delay(), Duration::from_secs(2));
        assert_eq!(config.target.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_required_variables() {
        let config = Config::default()
            .with_env_overrides(lookup(&[(ENV_BOT_TOKEN, "123:abc"), (ENV_CHAT_ID, "-100500")]))
            .unwrap();

        assert_eq!(config.telegram.bot_token, "123:abc");
        assert_eq!(config.telegram.chat_id, -100500);
    }

    #[test]
    fn test_all_missing_variables_reported() {
        let err = Config::default()
            .with_env_overrides(lookup(&[]))
            .unwrap_err()
            .to_string();

        assert!(err.contains(ENV_BOT_TOKEN));
        assert!(err.contains(ENV_CHAT_ID));
    }

    #[test]
    fn test_blank_variable_counts_as_missing() {
        let err = Config::default()
            .with_env_overrides(lookup(&[(ENV_BOT_TOKEN, "  "), (ENV_CHAT_ID, "1")]))
            .unwrap_err()
            .to_string();

        assert!(err.contains(ENV_BOT_TOKEN));
        assert!(!err.contains(ENV_CHAT_ID));
    }

    #[test]
    fn test_non_numeric_chat_id() {
        let result = Config::default()
            .with_env_overrides(lookup(&[(ENV_BOT_TOKEN, "t"), (ENV_CHAT_ID, "@operator")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_optional_overrides() {
        let config = Config::default()
            .with_env_overrides(lookup(&[
                (ENV_BOT_TOKEN, "t"),
                (ENV_CHAT_ID, "1"),
                ("TICKETWATCH_CHECK_INTERVAL", "300"),
                ("TICKETWATCH_TARGET_URL", "https://tickets.example.kz/list"),
                ("TICKETWATCH_RETRY_DELAY", "not-a-number"),
            ]))
            .unwrap();

        assert_eq!(config.schedule.check_interval_secs, 300);
        assert_eq!(config.target.url, "https://tickets.example.kz/list");
        assert_eq!(config.schedule.retry_delay_secs, 2);
    }

    #[test]
    fn test_check_interval_bounds() {
        let mut config = Config::default();
        config.telegram.bot_token = "t".to_string();
        assert!(config.validate().is_ok());

        config.schedule.check_interval_secs = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = Config::default();
        config.telegram.bot_token = "123:secret".to_string();
        let debug = format!("{config:?}");

        assert!(!debug.contains("123:secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_token_never_serialized() {
        let mut config = Config::default();
        config.telegram.bot_token = "123:secret".to_string();
        let toml = toml::to_string(&config).unwrap();
        assert!(!toml.contains("123:secret"));
    }
}
