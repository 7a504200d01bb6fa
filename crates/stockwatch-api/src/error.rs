use thiserror::Error;

/// Top-level error type for the `stockwatch-api` crate.
///
/// Covers both HTTP surfaces: the inventory endpoint and the Bot API.
/// `stockwatch-core` maps these into its own error type.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured proxy could not be used.
    #[error("Invalid proxy '{proxy}': {reason}")]
    InvalidProxy { proxy: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Bot API ─────────────────────────────────────────────────────
    /// The Bot API answered with `{"ok": false, ...}`.
    #[error("Bot API error ({code}): {description}")]
    BotApi { code: u16, description: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on the
    /// next cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::BotApi { code, .. } => *code == 429 || *code >= 500,
            _ => false,
        }
    }

    /// Returns `true` when an edit was rejected because the new text is
    /// identical to the current one.
    pub fn is_not_modified(&self) -> bool {
        match self {
            Self::BotApi { code: 400, description } => {
                description.contains("message is not modified")
            }
            _ => false,
        }
    }

    pub(crate) fn deserialization(err: &serde_json::Error, body: &str) -> Self {
        let preview: String = body.chars().take(200).collect();
        Self::Deserialization {
            message: format!("{err} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    }
}
