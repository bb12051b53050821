//! Message delivery to the configured chat

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::config::TelegramConfig;
use crate::error::{Error, Result};

/// Transport able to deliver a text message to a chat
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver `text` to `chat_id`
    async fn send_message(&self, chat_id: &str, text: &str) -> std::result::Result<(), DeliveryError>;
}

/// Delivery errors, never propagated past [`Notifier`]
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// Transport failure or undecodable response
    #[error("HTTP error: {0}")]
    Http(String),

    /// Telegram rejected the message
    #[error("Telegram API error {code}: {description}")]
    Api {
        /// `error_code` from the response, or the HTTP status
        code: i64,
        /// `description` from the response
        description: String,
    },
}

/// Telegram Bot API transport
pub struct TelegramMessenger {
    client: Client,
    send_url: Url,
}

impl TelegramMessenger {
    /// Create a new Telegram transport
    pub fn new(config: &TelegramConfig, bot_token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {e}")))?;

        let base = config.api_url.as_str().trim_end_matches('/');
        let send_url = Url::parse(&format!("{base}/bot{bot_token}/sendMessage"))
            .map_err(|e| Error::config(format!("invalid Telegram API URL: {e}")))?;

        Ok(Self { client, send_url })
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_message(&self, chat_id: &str, text: &str) -> std::result::Result<(), DeliveryError> {
        let payload = SendMessage { chat_id, text };

        // The request URL embeds the bot token, keep it out of error messages
        let response = self
            .client
            .post(self.send_url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Http(e.without_url().to_string()))?;

        let status = response.status();
        let body: TelegramResponse = response
            .json()
            .await
            .map_err(|e| DeliveryError::Http(format!("Telegram returned {status}: {}", e.without_url())))?;

        if !status.is_success() || !body.ok {
            return Err(DeliveryError::Api {
                code: body.error_code.unwrap_or_else(|| i64::from(status.as_u16())),
                description: body.description.unwrap_or_default(),
            });
        }

        Ok(())
    }
}

/// Delivers messages to one recipient, swallowing delivery failures
pub struct Notifier<M> {
    messenger: M,
    chat_id: String,
}

impl<M: Messenger> Notifier<M> {
    /// Create a notifier for `chat_id`
    pub fn new(messenger: M, chat_id: impl Into<String>) -> Self {
        Self {
            messenger,
            chat_id: chat_id.into(),
        }
    }

    /// Send `message`; returns whether it was delivered
    pub async fn notify(&self, message: &str) -> bool {
        match self.messenger.send_message(&self.chat_id, message).await {
            Ok(()) => {
                debug!(chat_id = %self.chat_id, text = message, "Message delivered");
                true
            }
            Err(e) => {
                error!(chat_id = %self.chat_id, error = %e, "Failed to deliver Telegram message");
                false
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}
