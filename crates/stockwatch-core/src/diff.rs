// ── Diff engine ──
//
// Compares a snapshot with the last known state. Validation and detection
// run first without touching the state, so a malformed snapshot leaves it
// exactly as it was.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error};

use crate::error::SnapshotError;
use crate::model::{Catalog, LocationIx, NotifyScope, SkuIx, Snapshot};
use crate::store::AvailabilityState;

/// A single (location, SKU) flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub location: LocationIx,
    pub sku: SkuIx,
    /// The new value.
    pub available: bool,
}

/// Result of reconciling one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// `"<location name>: <sku name>"` for every in-scope SKU that became available.
    pub lines: Vec<String>,
    /// Whether any pair changed, including silent transitions.
    pub changed: bool,
}

impl Reconciliation {
    /// The notification text, one line per event.
    pub fn message(&self) -> Option<String> {
        (!self.lines.is_empty()).then(|| self.lines.join("\n"))
    }
}

pub struct DiffEngine {
    catalog: Arc<Catalog>,
    scope: NotifyScope,
}

impl DiffEngine {
    pub fn new(catalog: Arc<Catalog>, scope: NotifyScope) -> Self {
        Self { catalog, scope }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn scope(&self) -> NotifyScope {
        self.scope
    }

    /// Every pair whose snapshot flag differs from `state`, in location
    /// order then SKU order. Locations and SKUs missing from the snapshot
    /// are skipped; entries for unknown ids are ignored.
    pub fn transitions(
        &self,
        snapshot: &Snapshot,
        state: &AvailabilityState,
    ) -> Result<Vec<Transition>, SnapshotError> {
        let stores = snapshot
            .stores()
            .as_object()
            .ok_or(SnapshotError::MissingStores)?;

        let mut transitions = Vec::new();
        for (location, loc) in self.catalog.locations() {
            let Some(section) = stores.get(&loc.id) else {
                continue;
            };
            let section = section.as_object().ok_or_else(|| SnapshotError::NotAnObject {
                path: format!("stores.{}", loc.id),
            })?;

            for (sku, item) in self.catalog.skus() {
                let Some(entry) = section.get(&item.id) else {
                    continue;
                };
                let available = unlocked_flag(entry, &loc.id, &item.id)?;
                if available != state.get(location, sku) {
                    transitions.push(Transition {
                        location,
                        sku,
                        available,
                    });
                }
            }
        }
        Ok(transitions)
    }

    /// Apply `snapshot` to `state` and collect the notification lines.
    ///
    /// Transitions to unavailable, and to available outside the scope,
    /// update the state without producing a line. A malformed snapshot is
    /// logged and yields an empty, unchanged result.
    pub fn reconcile(&self, snapshot: &Snapshot, state: &mut AvailabilityState) -> Reconciliation {
        let transitions = match self.transitions(snapshot, state) {
            Ok(transitions) => transitions,
            Err(e) => {
                error!(error = %e, "malformed snapshot, skipping cycle");
                return Reconciliation::default();
            }
        };

        let mut result = Reconciliation::default();
        for t in &transitions {
            let sku = self.catalog.sku(t.sku);
            if t.available && self.scope.includes(sku.tier) {
                let location = self.catalog.location(t.location);
                result.lines.push(format!("{}: {}", location.name, sku.name));
            }
            state.set(t.location, t.sku, t.available);
            result.changed = true;
        }

        debug!(
            transitions = transitions.len(),
            notify = result.lines.len(),
            "reconciled snapshot"
        );
        result
    }
}

fn unlocked_flag(entry: &Value, location: &str, sku: &str) -> Result<bool, SnapshotError> {
    let path = format!("stores.{location}.{sku}");
    let entry = entry
        .as_object()
        .ok_or_else(|| SnapshotError::NotAnObject { path: path.clone() })?;

    let path = format!("{path}.availability");
    let availability = entry
        .get("availability")
        .ok_or_else(|| SnapshotError::MissingField { path: path.clone() })?
        .as_object()
        .ok_or_else(|| SnapshotError::NotAnObject { path: path.clone() })?;

    let path = format!("{path}.unlocked");
    availability
        .get("unlocked")
        .ok_or_else(|| SnapshotError::MissingField { path: path.clone() })?
        .as_bool()
        .ok_or(SnapshotError::NotABoolean { path })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::Location;

    fn flag(available: bool) -> Value {
        json!({ "availability": { "unlocked": available } })
    }

    fn single_sku_catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::from_tiers(
                vec![Location::new("L1", "Store One"), Location::new("L2", "Store Two")],
                [("A", "Group1 - Pro")],
                Vec::<(&str, &str)>::new(),
            )
            .unwrap(),
        )
    }

    fn two_tier_catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::from_tiers(
                vec![Location::new("L1", "Store One"), Location::new("L2", "Store Two")],
                [("S1", "Phone - 128GB Black"), ("S2", "Phone - 256GB Blue")],
                [("P1", "Phone Max - 256GB Black")],
            )
            .unwrap(),
        )
    }

    fn snapshot(token: u64, stores: Value) -> Snapshot {
        Snapshot::from_value(&json!({ "updated": token, "stores": stores })).unwrap()
    }

    #[test]
    fn silent_transition_to_unavailable() {
        let catalog = single_sku_catalog();
        let engine = DiffEngine::new(Arc::clone(&catalog), NotifyScope::Both);
        let mut state = AvailabilityState::new(&catalog);

        let result = engine.reconcile(
            &snapshot(1, json!({ "L1": { "A": flag(false) }, "L2": { "A": flag(true) } })),
            &mut state,
        );

        assert_eq!(result.lines, Vec::<String>::new());
        assert!(result.changed);
        let l1 = catalog.location_ix("L1").unwrap();
        let a = catalog.sku_ix("A").unwrap();
        assert!(!state.get(l1, a));
    }

    #[test]
    fn announces_return_to_available() {
        let catalog = single_sku_catalog();
        let engine = DiffEngine::new(Arc::clone(&catalog), NotifyScope::Both);
        let mut state = AvailabilityState::new(&catalog);

        engine.reconcile(
            &snapshot(1, json!({ "L1": { "A": flag(false) }, "L2": { "A": flag(true) } })),
            &mut state,
        );
        let result = engine.reconcile(
            &snapshot(2, json!({ "L1": { "A": flag(true) }, "L2": { "A": flag(true) } })),
            &mut state,
        );

        assert_eq!(result.lines, vec!["Store One: Group1 - Pro".to_owned()]);
        assert!(result.changed);
        assert_eq!(result.message().as_deref(), Some("Store One: Group1 - Pro"));
    }

    #[test]
    fn identical_snapshot_is_idempotent() {
        let catalog = two_tier_catalog();
        let engine = DiffEngine::new(Arc::clone(&catalog), NotifyScope::Both);
        let mut state = AvailabilityState::new(&catalog);
        let snap = snapshot(
            1,
            json!({
                "L1": { "S1": flag(false), "P1": flag(false) },
                "L2": { "S2": flag(false) }
            }),
        );

        let first = engine.reconcile(&snap, &mut state);
        let after_first = state.clone();
        let second = engine.reconcile(&snap, &mut state);

        assert!(first.changed);
        assert_eq!(second, Reconciliation::default());
        assert_eq!(state, after_first);
    }

    #[test]
    fn out_of_scope_tier_updates_silently() {
        let catalog = two_tier_catalog();
        let engine = DiffEngine::new(Arc::clone(&catalog), NotifyScope::StandardOnly);
        let mut state = AvailabilityState::new(&catalog);
        let l1 = catalog.location_ix("L1").unwrap();
        let p1 = catalog.sku_ix("P1").unwrap();
        let s1 = catalog.sku_ix("S1").unwrap();

        engine.reconcile(
            &snapshot(1, json!({ "L1": { "S1": flag(false), "P1": flag(false) } })),
            &mut state,
        );
        let result = engine.reconcile(
            &snapshot(2, json!({ "L1": { "S1": flag(true), "P1": flag(true) } })),
            &mut state,
        );

        assert_eq!(result.lines, vec!["Store One: Phone - 128GB Black".to_owned()]);
        assert!(result.changed);
        assert!(state.get(l1, p1));
        assert!(state.get(l1, s1));
    }

    #[test]
    fn premium_scope_only_announces_premium() {
        let catalog = two_tier_catalog();
        let engine = DiffEngine::new(Arc::clone(&catalog), NotifyScope::PremiumOnly);
        let mut state = AvailabilityState::new(&catalog);

        engine.reconcile(
            &snapshot(1, json!({ "L2": { "S2": flag(false), "P1": flag(false) } })),
            &mut state,
        );
        let result = engine.reconcile(
            &snapshot(2, json!({ "L2": { "S2": flag(true), "P1": flag(true) } })),
            &mut state,
        );

        assert_eq!(result.lines, vec!["Store Two: Phone Max - 256GB Black".to_owned()]);
    }

    #[test]
    fn unavailable_never_announced_in_any_scope() {
        for scope in [
            NotifyScope::StandardOnly,
            NotifyScope::PremiumOnly,
            NotifyScope::Both,
        ] {
            let catalog = two_tier_catalog();
            let engine = DiffEngine::new(Arc::clone(&catalog), scope);
            let mut state = AvailabilityState::new(&catalog);

            let result = engine.reconcile(
                &snapshot(
                    1,
                    json!({
                        "L1": { "S1": flag(false), "S2": flag(false), "P1": flag(false) },
                        "L2": { "S1": flag(false), "S2": flag(false), "P1": flag(false) }
                    }),
                ),
                &mut state,
            );

            assert!(result.lines.is_empty(), "scope {scope}");
            assert!(result.changed);
            assert_eq!(state.available_count(), 0);
        }
    }

    #[test]
    fn lines_follow_location_then_sku_order() {
        let catalog = two_tier_catalog();
        let engine = DiffEngine::new(Arc::clone(&catalog), NotifyScope::Both);
        let mut state = AvailabilityState::new(&catalog);
        let all_off = json!({
            "L1": { "S1": flag(false), "S2": flag(false), "P1": flag(false) },
            "L2": { "S1": flag(false), "S2": flag(false), "P1": flag(false) }
        });
        engine.reconcile(&snapshot(1, all_off), &mut state);

        // Keys deliberately out of catalog order.
        let result = engine.reconcile(
            &snapshot(
                2,
                json!({
                    "L2": { "P1": flag(true), "S1": flag(true) },
                    "L1": { "S2": flag(true), "P1": flag(true) }
                }),
            ),
            &mut state,
        );

        assert_eq!(
            result.lines,
            vec![
                "Store One: Phone - 256GB Blue".to_owned(),
                "Store One: Phone Max - 256GB Black".to_owned(),
                "Store Two: Phone - 128GB Black".to_owned(),
                "Store Two: Phone Max - 256GB Black".to_owned(),
            ]
        );
    }

    #[test]
    fn absent_and_unknown_entries_are_ignored() {
        let catalog = two_tier_catalog();
        let engine = DiffEngine::new(Arc::clone(&catalog), NotifyScope::Both);
        let mut state = AvailabilityState::new(&catalog);

        let result = engine.reconcile(
            &snapshot(
                1,
                json!({
                    "R999": { "S1": flag(false) },
                    "L1": { "UNKNOWN": flag(false) }
                }),
            ),
            &mut state,
        );

        assert_eq!(result, Reconciliation::default());
        assert_eq!(state.available_count(), state.len());
    }

    #[test]
    fn malformed_snapshot_leaves_state_untouched() {
        let catalog = two_tier_catalog();
        let engine = DiffEngine::new(Arc::clone(&catalog), NotifyScope::Both);
        let mut state = AvailabilityState::new(&catalog);

        // L1 is valid and would flip; L2 is broken, so nothing may apply.
        let snap = snapshot(
            1,
            json!({
                "L1": { "S1": flag(false) },
                "L2": { "S1": { "availability": { "unlocked": "yes" } } }
            }),
        );

        assert_eq!(
            engine.transitions(&snap, &state),
            Err(SnapshotError::NotABoolean {
                path: "stores.L2.S1.availability.unlocked".into()
            })
        );
        let result = engine.reconcile(&snap, &mut state);

        assert_eq!(result, Reconciliation::default());
        assert_eq!(state.available_count(), state.len());
    }

    #[test]
    fn malformed_shapes_are_reported() {
        let catalog = two_tier_catalog();
        let engine = DiffEngine::new(Arc::clone(&catalog), NotifyScope::Both);
        let state = AvailabilityState::new(&catalog);

        let missing_stores = Snapshot::from_value(&json!({ "updated": 1 })).unwrap();
        assert_eq!(
            engine.transitions(&missing_stores, &state),
            Err(SnapshotError::MissingStores)
        );

        let bad_section = snapshot(1, json!({ "L1": [1, 2, 3] }));
        assert_eq!(
            engine.transitions(&bad_section, &state),
            Err(SnapshotError::NotAnObject {
                path: "stores.L1".into()
            })
        );

        let no_flag = snapshot(1, json!({ "L1": { "S1": { "availability": {} } } }));
        assert_eq!(
            engine.transitions(&no_flag, &state),
            Err(SnapshotError::MissingField {
                path: "stores.L1.S1.availability.unlocked".into()
            })
        );
    }

    #[test]
    fn entry_count_is_stable_across_cycles() {
        let catalog = two_tier_catalog();
        let engine = DiffEngine::new(Arc::clone(&catalog), NotifyScope::Both);
        let mut state = AvailabilityState::new(&catalog);
        let expected = catalog.location_count() * catalog.sku_count();

        for (token, value) in (0u64..).zip([false, true, false, true]) {
            engine.reconcile(
                &snapshot(
                    token,
                    json!({ "L1": { "S1": flag(value), "X": flag(value) }, "L3": {} }),
                ),
                &mut state,
            );
            assert_eq!(state.len(), expected);
        }
    }
}
