// ── Domain model ──
//
// The closed world the watcher tracks: which stores, which SKUs, which of
// those count as notification-worthy, and the snapshot shape compared
// against them every cycle.

mod catalog;
mod scope;
mod snapshot;

pub use catalog::{Catalog, Location, LocationIx, Sku, SkuIx, Tier};
pub use scope::NotifyScope;
pub use snapshot::{ChangeToken, Snapshot};
