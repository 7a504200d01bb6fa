// ── Runtime watcher configuration ──
//
// These types describe *what* to watch and *where* to report it. They carry
// credential data but never touch disk; stockwatch-config builds them from
// TOML and the environment.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use stockwatch_api::{ChatId, TransportConfig};

use crate::model::{Catalog, NotifyScope};

/// Where snapshots come from.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Inventory document URL.
    pub url: Url,
    /// Optional proxy for inventory requests.
    pub proxy: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl SourceConfig {
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            proxy: self.proxy.clone(),
        }
    }
}

/// Where notifications go.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot API host root.
    pub api_base: Url,
    /// Proxy for Bot API calls only. The inventory proxy is not shared.
    pub proxy: Option<String>,
    pub token: SecretString,
    /// Channel receiving the change digest and holding the board.
    pub chat_id: ChatId,
    /// Existing message in `chat_id` that is edited into the status board.
    pub board_message_id: i64,
    /// Reply to `/start` and `/help`.
    pub welcome_text: String,
}

/// Everything a running watcher needs.
///
/// Built by the binary, passed to [`Service`](crate::Service).
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub source: SourceConfig,
    pub bot: BotConfig,
    pub catalog: Arc<Catalog>,
    pub notify_scope: NotifyScope,
    /// Delay between poll cycles, also used after failures.
    pub poll_interval: Duration,
}
