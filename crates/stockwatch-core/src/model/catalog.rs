// ── Store and SKU catalog ──
//
// Explicitly ordered: board rows follow SKU order, glyphs follow location
// order, and change lines follow location-then-SKU order.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::CoreError;

/// Separator between the group and variant halves of a SKU display name.
const NAME_SEPARATOR: &str = " - ";

/// One of the two disjoint catalog tiers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Tier {
    Standard,
    Premium,
}

/// A tracked retail location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Store code as used by the inventory endpoint (e.g. `R597`).
    pub id: String,
    pub name: String,
}

impl Location {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A tracked product model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sku {
    /// Part number as used by the inventory endpoint.
    pub id: String,
    pub tier: Tier,
    /// Display name, `"<group> - <variant>"`.
    pub name: String,
}

impl Sku {
    pub fn new(id: impl Into<String>, tier: Tier, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tier,
            name: name.into(),
        }
    }

    /// The part of the display name before `" - "`, or the whole name.
    pub fn group(&self) -> &str {
        self.name
            .split(NAME_SEPARATOR)
            .next()
            .unwrap_or(&self.name)
    }

    /// The part of the display name after the first `" - "`, up to the next one.
    pub fn variant(&self) -> Option<&str> {
        self.name.split(NAME_SEPARATOR).nth(1)
    }

    /// Compact board label: group plus the initials of each variant word.
    ///
    /// `"iPhone 15 Pro - 256GB Natural Titanium"` becomes
    /// `"iPhone 15 Pro - 2 N T"`. Names without a variant are used as-is.
    pub fn short_label(&self) -> String {
        let Some(variant) = self.variant() else {
            return self.name.clone();
        };
        let initials: Vec<char> = variant
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .collect();
        let mut label = format!("{}{NAME_SEPARATOR}", self.group());
        for (i, initial) in initials.into_iter().enumerate() {
            if i > 0 {
                label.push(' ');
            }
            label.push(initial);
        }
        label
    }
}

/// Position of a location within its [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationIx(pub(crate) usize);

/// Position of a SKU within its [`Catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SkuIx(pub(crate) usize);

/// The fixed set of locations and SKUs a watcher tracks.
///
/// Built once at startup and shared read-only. Indices handed out by the
/// catalog are the only way to address an [`AvailabilityState`](crate::AvailabilityState).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    locations: Vec<Location>,
    skus: Vec<Sku>,
}

impl Catalog {
    /// Build a catalog from an ordered location list and an ordered SKU list.
    ///
    /// Rejects empty lists and duplicate ids.
    pub fn new(locations: Vec<Location>, skus: Vec<Sku>) -> Result<Self, CoreError> {
        if locations.is_empty() {
            return Err(CoreError::Catalog {
                message: "at least one location is required".into(),
            });
        }
        if skus.is_empty() {
            return Err(CoreError::Catalog {
                message: "at least one SKU is required".into(),
            });
        }

        let mut seen = HashSet::new();
        for location in &locations {
            if !seen.insert(location.id.as_str()) {
                return Err(CoreError::Catalog {
                    message: format!("duplicate location id '{}'", location.id),
                });
            }
        }

        seen.clear();
        for sku in &skus {
            if !seen.insert(sku.id.as_str()) {
                return Err(CoreError::Catalog {
                    message: format!("duplicate SKU id '{}'", sku.id),
                });
            }
        }

        Ok(Self { locations, skus })
    }

    /// Build a catalog from the two tiers: all standard SKUs first, then all
    /// premium SKUs, each in the given order.
    pub fn from_tiers<I, N>(
        locations: Vec<Location>,
        standard: impl IntoIterator<Item = (I, N)>,
        premium: impl IntoIterator<Item = (I, N)>,
    ) -> Result<Self, CoreError>
    where
        I: Into<String>,
        N: Into<String>,
    {
        let skus = standard
            .into_iter()
            .map(|(id, name)| Sku::new(id, Tier::Standard, name))
            .chain(
                premium
                    .into_iter()
                    .map(|(id, name)| Sku::new(id, Tier::Premium, name)),
            )
            .collect();
        Self::new(locations, skus)
    }

    pub fn locations(&self) -> impl ExactSizeIterator<Item = (LocationIx, &Location)> {
        self.locations
            .iter()
            .enumerate()
            .map(|(i, l)| (LocationIx(i), l))
    }

    pub fn skus(&self) -> impl ExactSizeIterator<Item = (SkuIx, &Sku)> {
        self.skus.iter().enumerate().map(|(i, s)| (SkuIx(i), s))
    }

    pub fn location(&self, ix: LocationIx) -> &Location {
        &self.locations[ix.0]
    }

    pub fn sku(&self, ix: SkuIx) -> &Sku {
        &self.skus[ix.0]
    }

    pub fn location_ix(&self, id: &str) -> Option<LocationIx> {
        self.locations.iter().position(|l| l.id == id).map(LocationIx)
    }

    pub fn sku_ix(&self, id: &str) -> Option<SkuIx> {
        self.skus.iter().position(|s| s.id == id).map(SkuIx)
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn sku_count(&self) -> usize {
        self.skus.len()
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} locations x {} SKUs",
            self.location_count(),
            self.sku_count()
        )
    }
}
