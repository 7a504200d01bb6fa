use crate::model::{Catalog, LocationIx, SkuIx};

/// Last known "unlocked" flag for every (location, SKU) pair of a catalog.
///
/// Dense row-major storage: one row per location, one column per SKU. The
/// entry count is fixed at construction and never changes. Every entry
/// starts as `true`, so items that are already unavailable at startup are
/// recorded silently instead of being announced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityState {
    sku_count: usize,
    cells: Vec<bool>,
}

impl AvailabilityState {
    /// Cold-start state for `catalog`: everything available.
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            sku_count: catalog.sku_count(),
            cells: vec![true; catalog.location_count() * catalog.sku_count()],
        }
    }

    /// Panics if the indices come from a different, larger catalog.
    pub fn get(&self, location: LocationIx, sku: SkuIx) -> bool {
        self.cells[self.offset(location, sku)]
    }

    pub fn set(&mut self, location: LocationIx, sku: SkuIx, available: bool) {
        let offset = self.offset(location, sku);
        self.cells[offset] = available;
    }

    /// Number of tracked pairs (locations x SKUs).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of pairs currently available.
    pub fn available_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    fn offset(&self, location: LocationIx, sku: SkuIx) -> usize {
        assert!(
            sku.0 < self.sku_count,
            "SKU index {} outside catalog of {} SKUs",
            sku.0,
            self.sku_count
        );
        location.0 * self.sku_count + sku.0
    }
}
