// stockwatch-core: Availability tracking between stockwatch-api and the binary.

pub mod board;
pub mod config;
pub mod diff;
pub mod error;
pub mod listener;
pub mod model;
pub mod poll;
pub mod service;
pub mod sink;
pub mod source;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{BotConfig, SourceConfig, WatchConfig};
pub use diff::{DiffEngine, Reconciliation, Transition};
pub use error::{CoreError, SnapshotError};
pub use listener::{BotCommand, CommandListener};
pub use poll::{CycleOutcome, PollLoop, PollSettings, PollState, PollStats};
pub use service::{Probe, Service, probe, probe_with};
pub use sink::{NotificationSink, TelegramSink};
pub use source::{FetchOutcome, SnapshotSource};
pub use store::AvailabilityState;

pub use model::{Catalog, ChangeToken, Location, LocationIx, NotifyScope, Sku, SkuIx, Snapshot, Tier};

pub use stockwatch_api::ChatId;
