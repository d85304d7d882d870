//! Telegram Bot API transport.
//!
//! Talks to `sendMessage` directly over reqwest; one fixed chat per instance.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{ChatTransport, NotifierError};

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Delivers text to a single Telegram chat.
#[derive(Debug, Clone)]
pub struct TelegramTransport {
    api_url: String,
    token: String,
    chat_id: String,
    client: Client,
}

impl TelegramTransport {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotifierError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_url, token, chat_id))
    }

    /// Use a preconfigured HTTP client (proxies, TLS settings, ...).
    pub fn with_client(
        client: Client,
        api_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        let api_url = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
            client,
        }
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.token)
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn deliver(&self, text: &str) -> Result<(), NotifierError> {
        let response = self
            .client
            .post(self.send_message_url())
            .json(&SendMessageRequest {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            // The URL embeds the bot token; keep it out of error strings.
            .map_err(|e| NotifierError::Request(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NotifierError::Request(e.without_url()))?;

        let reply: Option<ApiReply> = serde_json::from_str(&body).ok();
        match reply {
            Some(ApiReply { ok: true, .. }) if status.is_success() => Ok(()),
            Some(ApiReply { description, .. }) => Err(NotifierError::Api {
                status: status.as_u16(),
                description: description.unwrap_or_else(|| "no description".to_string()),
            }),
            None => Err(NotifierError::Api {
                status: status.as_u16(),
                description: "unreadable reply body".to_string(),
            }),
        }
    }
}
