// ── Service assembly ──
//
// Wires the HTTP clients into the poll loop and the command listener and
// runs both on the current runtime until cancelled.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use stockwatch_api::{BotClient, InventoryClient, TransportConfig};

use crate::board;
use crate::config::{BotConfig, SourceConfig, WatchConfig};
use crate::diff::{DiffEngine, Reconciliation};
use crate::error::CoreError;
use crate::listener::{CommandListener, LONG_POLL_SECS};
use crate::model::{Catalog, ChangeToken, NotifyScope};
use crate::poll::{PollLoop, PollSettings, PollStats};
use crate::sink::TelegramSink;
use crate::source::{FetchOutcome, SnapshotSource};
use crate::store::AvailabilityState;

/// Extra transport headroom on top of the `getUpdates` long-poll window.
const LONG_POLL_HEADROOM_SECS: u64 = 10;

/// A configured watcher: poll loop plus command listener.
pub struct Service {
    poll: PollLoop<InventoryClient, TelegramSink>,
    listener: CommandListener,
}

impl Service {
    /// Build the HTTP clients. Does not contact either endpoint.
    pub fn new(config: WatchConfig) -> Result<Self, CoreError> {
        let inventory =
            InventoryClient::new(config.source.url.clone(), &config.source.transport())?;

        let bot = Arc::new(BotClient::new(
            config.bot.api_base.clone(),
            config.bot.token.clone(),
            &bot_transport(&config.source, &config.bot),
        )?);

        let sink = TelegramSink::new(Arc::clone(&bot), config.bot.chat_id.clone());
        let poll = PollLoop::new(
            inventory,
            sink,
            Arc::clone(&config.catalog),
            &PollSettings {
                scope: config.notify_scope,
                interval: config.poll_interval,
                board_message_id: config.bot.board_message_id,
            },
        );
        let listener = CommandListener::new(bot, config.bot.welcome_text, config.poll_interval);

        Ok(Self { poll, listener })
    }

    /// Run both tasks until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) -> Result<PollStats, CoreError> {
        info!("starting stockwatch service");

        let listener = tokio::spawn(self.listener.run(cancel.child_token()));
        let stats = self.poll.run(cancel.clone()).await;

        // The poll loop only returns once cancelled; take the listener down too.
        cancel.cancel();
        if let Err(e) = listener.await {
            warn!(error = %e, "command listener task ended abnormally");
        }

        Ok(stats)
    }
}

/// Bot API transport: the bot's own proxy setting and a timeout that
/// outlasts the `getUpdates` long-poll window.
fn bot_transport(source: &SourceConfig, bot: &BotConfig) -> TransportConfig {
    let min_timeout = Duration::from_secs(LONG_POLL_SECS + LONG_POLL_HEADROOM_SECS);
    if source.timeout < min_timeout {
        debug!(?min_timeout, "raising bot transport timeout above long-poll window");
    }
    TransportConfig {
        timeout: source.timeout.max(min_timeout),
        proxy: bot.proxy.clone(),
    }
}

/// Result of a one-off [`probe`].
#[derive(Debug, Clone)]
pub struct Probe {
    pub token: ChangeToken,
    /// Changes relative to the cold-start state.
    pub reconciliation: Reconciliation,
    pub board: String,
}

/// Fetch one snapshot and render it against a cold-start state, without
/// sending anything.
pub async fn probe(
    source: &SourceConfig,
    catalog: Arc<Catalog>,
    scope: NotifyScope,
) -> Result<Probe, CoreError> {
    let client = InventoryClient::new(source.url.clone(), &source.transport())?;
    probe_with(&client, catalog, scope).await
}

/// [`probe`] against an arbitrary source.
pub async fn probe_with<S: SnapshotSource>(
    source: &S,
    catalog: Arc<Catalog>,
    scope: NotifyScope,
) -> Result<Probe, CoreError> {
    let snapshot = match source.fetch().await {
        FetchOutcome::Fetched(snapshot) => snapshot,
        FetchOutcome::Empty => {
            return Err(CoreError::Decode {
                message: "inventory endpoint returned no document".into(),
            });
        }
        FetchOutcome::Failed(e) => return Err(e),
    };

    let engine = DiffEngine::new(Arc::clone(&catalog), scope);
    let mut state = AvailabilityState::new(&catalog);
    engine
        .transitions(&snapshot, &state)
        .map_err(|e| CoreError::Decode {
            message: e.to_string(),
        })?;
    let reconciliation = engine.reconcile(&snapshot, &mut state);

    Ok(Probe {
        token: snapshot.token().clone(),
        reconciliation,
        board: board::render(&catalog, &state, Utc::now()),
    })
}
