//! Configuration for the stockwatch binary.
//!
//! TOML file + `STOCKWATCH_` environment layering, bot token resolution
//! (env var + keyring + plaintext), and translation to
//! `stockwatch_core::WatchConfig`. The core never reads files itself.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use indexmap::IndexMap;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockwatch_core::{
    BotConfig, Catalog, ChatId, Location, NotifyScope, Sku, SourceConfig, Tier, WatchConfig,
};

/// Keyring service name for the stored bot token.
pub const KEYRING_SERVICE: &str = "stockwatch";
/// Keyring user name for the stored bot token.
pub const KEYRING_TOKEN_USER: &str = "bot-token";

const REDACTED: &str = "<redacted>";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("missing required setting '{field}'")]
    Missing { field: String },

    #[error("no bot token configured")]
    NoToken,

    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read models file {}: {reason}", path.display())]
    ModelsFile { path: PathBuf, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Inventory document URL.
    pub url: Option<String>,

    /// Proxy for inventory requests (`http://`, `socks5://`).
    pub proxy: Option<String>,

    /// Proxy for Bot API requests. Bot traffic is direct when unset.
    pub bot_proxy: Option<String>,

    /// Bot token in plaintext. Prefer the keyring or `token_env`.
    pub token: Option<String>,

    /// Environment variable name containing the bot token.
    pub token_env: Option<String>,

    /// Look the token up in the system keyring.
    #[serde(default = "default_true")]
    pub keyring: bool,

    /// Channel receiving notifications, numeric id or `@username`.
    pub chat_id: Option<ChatId>,

    /// Message in `chat_id` that is edited into the status board.
    pub message_id: Option<i64>,

    /// Reply to `/start` and `/help`.
    #[serde(default = "default_start_text")]
    pub start_text: String,

    /// `standard`, `premium` or `both` (legacy `0`, `1`, `2` accepted).
    #[serde(default)]
    pub notify_scope: NotifyScope,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Bot API host root.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Tracked stores, in board order.
    #[serde(default = "default_locations")]
    pub locations: Vec<LocationEntry>,

    /// Tracked SKUs, in board order.
    #[serde(default)]
    pub catalog: CatalogSection,

    /// JSON file `{ "pro": { id: name }, "pro_max": { id: name } }`, used
    /// instead of `[catalog]` when set.
    pub models_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            proxy: None,
            bot_proxy: None,
            token: None,
            token_env: None,
            keyring: true,
            chat_id: None,
            message_id: None,
            start_text: default_start_text(),
            notify_scope: NotifyScope::default(),
            poll_interval_secs: default_poll_interval(),
            timeout_secs: default_timeout(),
            api_base: default_api_base(),
            locations: default_locations(),
            catalog: CatalogSection::default(),
            models_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocationEntry {
    /// Store code (e.g. `R597`).
    pub id: String,
    /// Display name; defaults to the store code.
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SkuEntry {
    pub id: String,
    /// `"<group> - <variant>"`.
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogSection {
    #[serde(default)]
    pub standard: Vec<SkuEntry>,
    #[serde(default)]
    pub premium: Vec<SkuEntry>,
}

impl CatalogSection {
    pub fn is_empty(&self) -> bool {
        self.standard.is_empty() && self.premium.is_empty()
    }
}

/// On-disk shape of `models_file`. Key order is the board order.
#[derive(Debug, Deserialize)]
struct ModelsFile {
    #[serde(default)]
    pro: IndexMap<String, String>,
    #[serde(default)]
    pro_max: IndexMap<String, String>,
}

fn default_true() -> bool {
    true
}
fn default_start_text() -> String {
    "Stock availability alerts. Watch this channel for restocks.".into()
}
fn default_poll_interval() -> u64 {
    8
}
fn default_timeout() -> u64 {
    30
}
fn default_api_base() -> String {
    "https://api.telegram.org".into()
}

fn default_locations() -> Vec<LocationEntry> {
    [
        ("R597", "Dubai - Dubai Mall"),
        ("R596", "Dubai - Mall of the Emirates"),
        ("R595", "Abu Dhabi - Yas Mall"),
        ("R706", "Abu Dhabi - Al Maryah Island"),
    ]
    .into_iter()
    .map(|(id, name)| LocationEntry {
        id: id.into(),
        name: Some(name.into()),
    })
    .collect()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "stockwatch", "stockwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("stockwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from defaults, file and environment.
///
/// An explicit `path` must exist; the default path is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(p) if !p.exists() => {
            return Err(ConfigError::NotFound {
                path: p.to_path_buf(),
            });
        }
        Some(p) => p.to_path_buf(),
        None => config_path(),
    };

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("STOCKWATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Translation to core types ───────────────────────────────────────

impl Config {
    /// Build the ordered catalog from `models_file` or the `[catalog]` tables.
    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        let locations = self
            .locations
            .iter()
            .map(|l| Location::new(&l.id, l.name.clone().unwrap_or_else(|| l.id.clone())))
            .collect();

        let skus: Vec<Sku> = if let Some(ref path) = self.models_file {
            if !self.catalog.is_empty() {
                return Err(ConfigError::Validation {
                    field: "models_file".into(),
                    reason: "set either models_file or [catalog], not both".into(),
                });
            }
            let models = read_models_file(path)?;
            tier_skus(Tier::Standard, models.pro)
                .chain(tier_skus(Tier::Premium, models.pro_max))
                .collect()
        } else {
            let entries = |tier, list: &[SkuEntry]| {
                list.iter()
                    .map(move |e| Sku::new(&e.id, tier, &e.name))
                    .collect::<Vec<_>>()
            };
            let mut skus = entries(Tier::Standard, &self.catalog.standard);
            skus.extend(entries(Tier::Premium, &self.catalog.premium));
            skus
        };

        Catalog::new(locations, skus).map_err(|e| ConfigError::Validation {
            field: "catalog".into(),
            reason: e.to_string(),
        })
    }

    /// Inventory endpoint settings.
    pub fn source_config(&self) -> Result<SourceConfig, ConfigError> {
        let raw = self.url.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "url".into(),
        })?;
        let url = parse_url("url", raw)?;

        if let Some(ref proxy) = self.proxy {
            parse_url("proxy", proxy)?;
        }

        Ok(SourceConfig {
            url,
            proxy: self.proxy.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }

    /// Everything the running service needs, including the resolved token.
    pub fn to_watch_config(&self) -> Result<WatchConfig, ConfigError> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Validation {
                field: "poll_interval_secs".into(),
                reason: "must be at least 1".into(),
            });
        }

        let source = self.source_config()?;
        let catalog = Arc::new(self.catalog()?);
        if let Some(ref proxy) = self.bot_proxy {
            parse_url("bot_proxy", proxy)?;
        }
        let chat_id = self.chat_id.clone().ok_or_else(|| ConfigError::Missing {
            field: "chat_id".into(),
        })?;
        let board_message_id = self.message_id.ok_or_else(|| ConfigError::Missing {
            field: "message_id".into(),
        })?;

        Ok(WatchConfig {
            source,
            bot: BotConfig {
                api_base: parse_url("api_base", &self.api_base)?,
                proxy: self.bot_proxy.clone(),
                token: resolve_token(self)?,
                chat_id,
                board_message_id,
                welcome_text: self.start_text.clone(),
            },
            catalog,
            notify_scope: self.notify_scope,
            poll_interval: Duration::from_secs(self.poll_interval_secs),
        })
    }

    /// A copy safe to print: the plaintext token is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.token.is_some() {
            copy.token = Some(REDACTED.into());
        }
        copy
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn tier_skus(tier: Tier, models: IndexMap<String, String>) -> impl Iterator<Item = Sku> {
    models
        .into_iter()
        .map(move |(id, name)| Sku::new(id, tier, name))
}

fn read_models_file(path: &Path) -> Result<ModelsFile, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ModelsFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| ConfigError::ModelsFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn parse_url(field: &str, raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the bot token: `token_env` variable, then the system keyring,
/// then the plaintext `token` (which `STOCKWATCH_TOKEN` also sets).
pub fn resolve_token(config: &Config) -> Result<SecretString, ConfigError> {
    // 1. Named env var
    if let Some(ref env_name) = config.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if config.keyring {
        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_TOKEN_USER) {
            if let Ok(secret) = entry.get_password() {
                return Ok(SecretString::from(secret));
            }
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = config.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoToken)
}

/// Store the bot token in the system keyring.
pub fn store_token(token: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_TOKEN_USER)
        .and_then(|entry| entry.set_password(token))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}
