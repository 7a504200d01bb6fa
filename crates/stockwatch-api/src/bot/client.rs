// Bot API HTTP client
//
// Wraps `reqwest::Client` with token-scoped URL construction and envelope
// unwrapping. The token is part of every request path, so URLs are never
// logged.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::bot::models::{
    BotResponse, ChatId, EditMessageTextRequest, GetUpdatesRequest, SendMessageRequest,
    SentMessage, Update,
};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Default public Bot API host.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Raw HTTP client for the Telegram Bot API.
pub struct BotClient {
    http: reqwest::Client,
    base_url: Url,
    token: SecretString,
}

impl BotClient {
    /// Create a new bot client from a `TransportConfig`.
    ///
    /// `base_url` is the API host root (normally [`DEFAULT_API_BASE`]).
    pub fn new(base_url: Url, token: SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Create a bot client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, token: SecretString) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    /// Send a plain-text message to `chat_id`.
    ///
    /// `POST /bot{token}/sendMessage`
    pub async fn send_message(&self, chat_id: &ChatId, text: &str) -> Result<SentMessage, Error> {
        debug!(%chat_id, len = text.len(), "sending message");
        self.call(
            "sendMessage",
            &SendMessageRequest { chat_id, text },
        )
        .await
    }

    /// Replace the text of a message previously sent by the bot.
    ///
    /// `POST /bot{token}/editMessageText`
    pub async fn edit_message_text(
        &self,
        chat_id: &ChatId,
        message_id: i64,
        text: &str,
    ) -> Result<(), Error> {
        debug!(%chat_id, message_id, "editing message");
        let _: serde_json::Value = self
            .call(
                "editMessageText",
                &EditMessageTextRequest {
                    chat_id,
                    message_id,
                    text,
                },
            )
            .await?;
        Ok(())
    }

    /// Long-poll for new message updates.
    ///
    /// `POST /bot{token}/getUpdates`. `timeout_secs` is the server-side
    /// long-poll window and must stay below the transport timeout.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, Error> {
        trace!(?offset, timeout_secs, "polling for updates");
        self.call(
            "getUpdates",
            &GetUpdatesRequest {
                offset,
                timeout: timeout_secs,
                allowed_updates: &["message"],
            },
        )
        .await
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn method_url(&self, method: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/bot{}/{method}", self.token.expose_secret());
        Ok(Url::parse(&full)?)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.method_url(method)?;
        // Strip the URL from transport errors so the token never reaches a log line.
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Transport(e.without_url()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Transport(e.without_url()))?;

        let envelope: BotResponse<T> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(Error::BotApi {
                    code: status.as_u16(),
                    description: body.chars().take(200).collect(),
                });
            }
            Err(e) => return Err(Error::deserialization(&e, &body)),
        };

        if !envelope.ok {
            return Err(Error::BotApi {
                code: envelope.error_code.unwrap_or_else(|| status.as_u16()),
                description: envelope
                    .description
                    .unwrap_or_else(|| format!("{method} failed")),
            });
        }

        envelope.result.ok_or_else(|| Error::Deserialization {
            message: format!("{method}: envelope has no result"),
            body,
        })
    }
}
