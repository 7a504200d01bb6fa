// ── Core error types ──
//
// Errors surfaced by stockwatch-core. Transport-layer failures from
// stockwatch-api are translated into these variants; none of them ever
// reach the chat, only the log stream.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("Invalid catalog: {message}")]
    Catalog { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Remote errors ────────────────────────────────────────────────
    #[error("Bot API rejected the request ({code}): {description}")]
    Bot { code: u16, description: String },

    #[error("Unexpected response: {message}")]
    Decode { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if the next cycle may reasonably succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionFailed { .. } | Self::Timeout => true,
            Self::Bot { code, .. } => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}

/// A snapshot that does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot has no 'stores' object")]
    MissingStores,

    #[error("'{path}' is not an object")]
    NotAnObject { path: String },

    #[error("'{path}' is missing")]
    MissingField { path: String },

    #[error("'{path}' is not a boolean")]
    NotABoolean { path: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<stockwatch_api::Error> for CoreError {
    fn from(err: stockwatch_api::Error) -> Self {
        match err {
            stockwatch_api::Error::Transport(e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else {
                    // Bot API URLs embed the token; report host only.
                    let url = e
                        .url()
                        .and_then(|u| u.host_str().map(ToOwned::to_owned))
                        .unwrap_or_else(|| "<unknown>".into());
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.without_url().to_string(),
                    }
                }
            }
            stockwatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            stockwatch_api::Error::InvalidProxy { proxy, reason } => CoreError::Config {
                message: format!("Invalid proxy '{proxy}': {reason}"),
            },
            stockwatch_api::Error::ClientBuild(reason) => CoreError::Internal(reason),
            stockwatch_api::Error::BotApi { code, description } => {
                CoreError::Bot { code, description }
            }
            stockwatch_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { message }
            }
        }
    }
}
