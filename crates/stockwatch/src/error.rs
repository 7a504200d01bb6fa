//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use stockwatch_config::ConfigError;
use stockwatch_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach {url}")]
    #[diagnostic(
        code(stockwatch::connection_failed),
        help("Check the network, the 'url' setting and the 'proxy' setting.\nCause: {reason}")
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(code(stockwatch::timeout), help("Increase 'timeout_secs' in the config."))]
    Timeout,

    // ── Bot API ──────────────────────────────────────────────────────
    #[error("No bot token configured")]
    #[diagnostic(
        code(stockwatch::no_token),
        help(
            "Set STOCKWATCH_TOKEN, point 'token_env' at a variable,\n\
             or run: stockwatch config set-token"
        )
    )]
    NoToken,

    #[error("Bot API rejected the request ({code}): {description}")]
    #[diagnostic(
        code(stockwatch::bot_api),
        help("Check the bot token, 'chat_id' and 'message_id'.")
    )]
    BotRejected { code: u16, description: String },

    // ── Upstream data ────────────────────────────────────────────────
    #[error("Unexpected inventory response: {message}")]
    #[diagnostic(code(stockwatch::decode))]
    Decode { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Missing required setting '{field}'")]
    #[diagnostic(
        code(stockwatch::missing_setting),
        help("Add '{field}' to the config file or set STOCKWATCH_{env}.")
    )]
    Missing { field: String, env: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(stockwatch::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(stockwatch::no_config), help("Run: stockwatch config path"))]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(stockwatch::config))]
    Config(Box<figment::Error>),

    // ── Other ────────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    #[diagnostic(code(stockwatch::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NoToken | Self::BotRejected { code: 401, .. } => exit_code::AUTH,
            Self::Missing { .. } | Self::Validation { .. } | Self::NoConfig { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Timeout => Self::Timeout,
            CoreError::Bot { code, description } => Self::BotRejected { code, description },
            CoreError::Decode { message } => Self::Decode { message },
            CoreError::Catalog { message } => Self::Validation {
                field: "catalog".into(),
                reason: message,
            },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoToken => Self::NoToken,
            ConfigError::Missing { field } => Self::Missing {
                env: field.to_uppercase(),
                field,
            },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::ModelsFile { path, reason } => Self::Validation {
                field: "models_file".into(),
                reason: format!("{}: {reason}", path.display()),
            },
            ConfigError::NotFound { path } => Self::NoConfig {
                path: path.display().to_string(),
            },
            ConfigError::Figment(e) => Self::Config(e),
            ConfigError::Serialization(e) => Self::Internal(e.to_string()),
            ConfigError::Io(e) => Self::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_setting_names_env_var() {
        let err = CliError::from(ConfigError::Missing {
            field: "chat_id".into(),
        });
        assert!(matches!(err, CliError::Missing { ref env, .. } if env == "CHAT_ID"));
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }

    #[test]
    fn unauthorized_bot_maps_to_auth_exit() {
        let err = CliError::from(CoreError::Bot {
            code: 401,
            description: "Unauthorized".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);

        let err = CliError::from(CoreError::Bot {
            code: 400,
            description: "Bad Request: chat not found".into(),
        });
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn connection_errors_map_to_connection_exit() {
        let err = CliError::from(CoreError::ConnectionFailed {
            url: "inventory.example.com".into(),
            reason: "connection refused".into(),
        });
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }
}
