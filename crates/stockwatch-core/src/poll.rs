// ── Poll loop ──
//
// Fetch, diff, notify, refresh the board, sleep, forever. Each cycle is
// isolated: nothing a cycle encounters stops the next one from running.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::board;
use crate::diff::{DiffEngine, Reconciliation};
use crate::model::{Catalog, ChangeToken, NotifyScope};
use crate::sink::NotificationSink;
use crate::source::{FetchOutcome, SnapshotSource};
use crate::store::AvailabilityState;

/// Default delay between cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(8);

/// Poll loop state. Both states wait the same fixed interval; the split
/// only drives logging of failure and recovery edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Polling,
    ErrorBackoff,
}

impl PollState {
    pub fn delay(self, interval: Duration) -> Duration {
        match self {
            Self::Polling | Self::ErrorBackoff => interval,
        }
    }
}

/// What a single cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The endpoint answered without a document.
    NoData,
    /// The fetch failed; see the log for the cause.
    FetchFailed,
    /// Same change token as the last processed snapshot; no diff work done.
    Unchanged,
    Reconciled(Reconciliation),
}

/// Running counters, mostly for tests and the shutdown summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub cycles: u64,
    pub fetch_failures: u64,
    pub reconciliations: u64,
    pub notifications_sent: u64,
    pub board_updates: u64,
    pub sink_failures: u64,
}

/// Static poll loop settings.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub scope: NotifyScope,
    pub interval: Duration,
    /// Message that holds the status board.
    pub board_message_id: i64,
}

/// The poll loop. Sole owner of the [`AvailabilityState`].
pub struct PollLoop<S, N> {
    source: S,
    sink: N,
    engine: DiffEngine,
    state: AvailabilityState,
    interval: Duration,
    board_message_id: i64,
    last_token: Option<ChangeToken>,
    poll_state: PollState,
    stats: PollStats,
}

impl<S: SnapshotSource, N: NotificationSink> PollLoop<S, N> {
    /// Create a loop starting from the cold-start state for `catalog`.
    pub fn new(source: S, sink: N, catalog: Arc<Catalog>, settings: &PollSettings) -> Self {
        let state = AvailabilityState::new(&catalog);
        Self {
            source,
            sink,
            engine: DiffEngine::new(catalog, settings.scope),
            state,
            interval: settings.interval,
            board_message_id: settings.board_message_id,
            last_token: None,
            poll_state: PollState::Polling,
            stats: PollStats::default(),
        }
    }

    pub fn state(&self) -> &AvailabilityState {
        &self.state
    }

    pub fn poll_state(&self) -> PollState {
        self.poll_state
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        self.engine.catalog()
    }

    /// Run one fetch/diff/notify cycle.
    ///
    /// The change-digest message is always sent before the board edit.
    /// Sink failures are logged and do not stop the cycle.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.stats.cycles += 1;

        let snapshot = match self.source.fetch().await {
            FetchOutcome::Fetched(snapshot) => snapshot,
            FetchOutcome::Empty => {
                self.enter_backoff();
                debug!("no snapshot this cycle");
                return CycleOutcome::NoData;
            }
            FetchOutcome::Failed(e) => {
                self.stats.fetch_failures += 1;
                self.enter_backoff();
                warn!(error = %e, transient = e.is_transient(), "snapshot fetch failed");
                return CycleOutcome::FetchFailed;
            }
        };

        if self.poll_state == PollState::ErrorBackoff {
            info!("snapshot source recovered");
            self.poll_state = PollState::Polling;
        }

        let token = snapshot.token();
        if self.last_token.as_ref() == Some(token) {
            debug!(%token, "snapshot unchanged");
            return CycleOutcome::Unchanged;
        }

        let result = self.engine.reconcile(&snapshot, &mut self.state);
        self.stats.reconciliations += 1;

        if let Some(message) = result.message() {
            match self.sink.send_message(&message).await {
                Ok(()) => {
                    self.stats.notifications_sent += 1;
                    info!(events = result.lines.len(), "availability change announced");
                }
                Err(e) => {
                    self.stats.sink_failures += 1;
                    warn!(error = %e, "failed to send availability notification");
                }
            }
        }

        if result.changed {
            let text = board::render(self.engine.catalog(), &self.state, Utc::now());
            match self.sink.edit_message(self.board_message_id, &text).await {
                Ok(()) => {
                    self.stats.board_updates += 1;
                    debug!(
                        available = self.state.available_count(),
                        total = self.state.len(),
                        "status board updated"
                    );
                }
                Err(e) => {
                    self.stats.sink_failures += 1;
                    warn!(error = %e, message_id = self.board_message_id, "failed to update status board");
                }
            }
        }

        self.last_token = Some(snapshot.token().clone());
        CycleOutcome::Reconciled(result)
    }

    /// Cycle until `cancel` fires. Cancellation is only observed between
    /// cycles; a cycle in flight always completes.
    pub async fn run(mut self, cancel: CancellationToken) -> PollStats {
        info!(
            catalog = %self.engine.catalog(),
            scope = %self.engine.scope(),
            interval_secs = self.interval.as_secs(),
            "poll loop started"
        );

        loop {
            self.run_cycle().await;

            let delay = self.poll_state.delay(self.interval);
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(delay) => {}
            }
        }

        info!(cycles = self.stats.cycles, "poll loop stopped");
        self.stats
    }

    fn enter_backoff(&mut self) {
        self.poll_state = PollState::ErrorBackoff;
    }
}
