// ── Status board ──
//
// One row per SKU, one glyph per location, then the refresh time. The
// board message is edited in place, so row order must never change
// between renders.

use std::fmt::Write as _;

use chrono::{DateTime, TimeDelta, Utc};

use crate::model::Catalog;
use crate::store::AvailabilityState;

pub const AVAILABLE_GLYPH: &str = "🟢";
pub const UNAVAILABLE_GLYPH: &str = "🔴";

/// Board timestamps are civil time at UTC+4 (Gulf Standard Time).
const BOARD_UTC_OFFSET_HOURS: i64 = 4;

/// Render the status board for `state` as of `now`.
pub fn render(catalog: &Catalog, state: &AvailabilityState, now: DateTime<Utc>) -> String {
    let mut board = String::new();

    for (sku_ix, sku) in catalog.skus() {
        for (location_ix, _) in catalog.locations() {
            board.push_str(if state.get(location_ix, sku_ix) {
                AVAILABLE_GLYPH
            } else {
                UNAVAILABLE_GLYPH
            });
        }
        let _ = writeln!(board, " -> {}", sku.short_label());
    }

    let local = now.naive_utc() + TimeDelta::hours(BOARD_UTC_OFFSET_HOURS);
    let _ = writeln!(
        board,
        "\nLast update time: {} (GMT+{BOARD_UTC_OFFSET_HOURS})",
        local.format("%d.%m %H:%M")
    );
    board
}
