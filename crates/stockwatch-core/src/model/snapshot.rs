// ── Availability snapshot ──
//
// One fetched document per cycle. Store sections stay as raw JSON until
// the diff engine validates them against the catalog.

use std::fmt;

use serde_json::Value;

use stockwatch_api::InventoryDocument;

use crate::error::SnapshotError;

/// Opaque `updated` value; equal tokens mean an unchanged document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeToken(Value);

impl ChangeToken {
    pub fn new(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for ChangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// A fetched document. The change token is mandatory; a document without
/// one is rejected before any diff work.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    token: ChangeToken,
    stores: Value,
}

impl Snapshot {
    /// Split a whole document (`{ "updated": .., "stores": .. }`) into a
    /// snapshot. A missing `stores` becomes `null` and is left for the diff
    /// engine to reject.
    pub fn from_value(document: &Value) -> Result<Self, SnapshotError> {
        Ok(Self {
            token: required_token(document.get("updated").cloned())?,
            stores: document.get("stores").cloned().unwrap_or(Value::Null),
        })
    }

    pub fn token(&self) -> &ChangeToken {
        &self.token
    }

    pub fn stores(&self) -> &Value {
        &self.stores
    }
}

impl TryFrom<InventoryDocument> for Snapshot {
    type Error = SnapshotError;

    fn try_from(doc: InventoryDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            token: required_token(doc.updated)?,
            stores: doc.stores,
        })
    }
}

fn required_token(updated: Option<Value>) -> Result<ChangeToken, SnapshotError> {
    updated
        .filter(|v| !v.is_null())
        .map(ChangeToken)
        .ok_or_else(|| SnapshotError::MissingField {
            path: "updated".into(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn from_value_splits_document() {
        let snapshot = Snapshot::from_value(&json!({
            "updated": "2024-06-15T10:30:00Z",
            "stores": { "R597": {} }
        }))
        .unwrap();
        assert_eq!(snapshot.token().to_string(), "2024-06-15T10:30:00Z");
        assert!(snapshot.stores().get("R597").is_some());
    }

    #[test]
    fn missing_stores_is_null() {
        let snapshot = Snapshot::from_value(&json!({ "updated": 3 })).unwrap();
        assert_eq!(snapshot.stores(), &Value::Null);
    }

    #[test]
    fn missing_or_null_token_is_rejected() {
        let expected = Err(SnapshotError::MissingField {
            path: "updated".into(),
        });
        assert_eq!(Snapshot::from_value(&json!({ "stores": {} })), expected);
        assert_eq!(
            Snapshot::from_value(&json!({ "updated": null, "stores": {} })),
            expected
        );

        let doc = InventoryDocument {
            updated: None,
            stores: json!({}),
        };
        assert_eq!(Snapshot::try_from(doc), expected);
    }

    #[test]
    fn from_inventory_document() {
        let doc = InventoryDocument {
            updated: Some(json!(17)),
            stores: json!({}),
        };
        let snapshot = Snapshot::try_from(doc).unwrap();
        assert_eq!(snapshot.token(), &ChangeToken::new(json!(17)));
    }
}
