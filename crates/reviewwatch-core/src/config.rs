//! Configuration management for ReviewWatch
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `REVIEWWATCH__<SECTION>__<KEY>` environment variables. Credentials are kept
//! out of the file config and read straight from the environment.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, MissingCredentials, Result};

/// Default review API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Default Telegram Bot API base URL
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";

/// Environment variable holding the review API token
pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
/// Environment variable holding the Telegram bot token
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the recipient chat id
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Review API configuration
    pub api: ApiConfig,

    /// Telegram configuration
    pub telegram: TelegramConfig,

    /// Poll loop configuration
    pub poller: PollerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = config::Config::try_from(&Config::default())
            .map_err(|e| Error::config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: Config = builder
            .add_source(config::Environment::with_prefix("REVIEWWATCH").separator("__"))
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| Error::config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the poller cannot work with
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [("api.endpoint", &self.api.endpoint), ("telegram.api_url", &self.telegram.api_url)] {
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::config(format!("{name} must be an http(s) URL, got {url}")));
            }
        }

        for (name, value) in [
            ("api.request_timeout", self.api.request_timeout),
            ("telegram.request_timeout", self.telegram.request_timeout),
            ("poller.interval", self.poller.interval),
        ] {
            if value.is_zero() {
                return Err(Error::config(format!("{name} must be greater than zero")));
            }
        }

        Ok(())
    }
}

/// Review API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Status endpoint URL
    pub endpoint: Url,
    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Telegram configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API base URL
    pub api_url: Url,
    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_TELEGRAM_API).expect("default Telegram URL is valid"),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Poll loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Pause between two cycles
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// Forget the last reported failure after a successful cycle
    pub reset_error_on_success: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(600),
            reset_error_on_success: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Raw credentials as found in the environment
#[derive(Clone, Default)]
pub struct Credentials {
    /// Review API OAuth token
    pub practicum_token: Option<String>,
    /// Telegram bot token
    pub telegram_token: Option<String>,
    /// Recipient chat id
    pub telegram_chat_id: Option<String>,
}

impl Credentials {
    /// Read credentials from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary lookup function
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            practicum_token: lookup(PRACTICUM_TOKEN),
            telegram_token: lookup(TELEGRAM_TOKEN),
            telegram_chat_id: lookup(TELEGRAM_CHAT_ID),
        }
    }

    /// Fail with one line per missing or empty credential
    pub fn check(&self) -> Result<()> {
        let required = [
            (&self.practicum_token, PRACTICUM_TOKEN, "токен API сервиса Практикум.Домашка"),
            (&self.telegram_token, TELEGRAM_TOKEN, "токен телеграм бота"),
            (&self.telegram_chat_id, TELEGRAM_CHAT_ID, "id телеграм чата"),
        ];

        let lines: Vec<String> = required
            .into_iter()
            .filter(|(value, _, _)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(_, name, description)| format!("Отсутствует {name}: {description}"))
            .collect();

        if lines.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingCredentials(MissingCredentials { lines }))
        }
    }

    /// Check and unwrap into credentials that are known to be present
    pub fn require(self) -> Result<Secrets> {
        self.check()?;
        Ok(Secrets {
            practicum_token: self.practicum_token.unwrap_or_default(),
            telegram_token: self.telegram_token.unwrap_or_default(),
            telegram_chat_id: self.telegram_chat_id.unwrap_or_default(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &self.practicum_token.as_ref().map(|_| "<redacted>"))
            .field("telegram_token", &self.telegram_token.as_ref().map(|_| "<redacted>"))
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

/// Verified, non-empty credentials
#[derive(Clone)]
pub struct Secrets {
    /// Review API OAuth token
    pub practicum_token: String,
    /// Telegram bot token
    pub telegram_token: String,
    /// Recipient chat id
    pub telegram_chat_id: String,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}
