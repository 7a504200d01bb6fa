// ── Availability store ──
//
// Last known availability per (location, SKU), owned by the poll loop.

mod availability;

pub use availability::AvailabilityState;
