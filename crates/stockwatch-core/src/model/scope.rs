// ── Notification scope ──

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use super::Tier;

/// Which tier's "became available" events produce chat notifications.
///
/// Only affects notifications; the status board always shows both tiers.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NotifyScope {
    StandardOnly,
    PremiumOnly,
    #[default]
    Both,
}

impl NotifyScope {
    pub fn includes(self, tier: Tier) -> bool {
        match (self, tier) {
            (Self::Both, _)
            | (Self::StandardOnly, Tier::Standard)
            | (Self::PremiumOnly, Tier::Premium) => true,
            (Self::StandardOnly, Tier::Premium) | (Self::PremiumOnly, Tier::Standard) => false,
        }
    }

    /// Legacy numeric selector: `0` standard, `1` premium, anything else both.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::StandardOnly,
            1 => Self::PremiumOnly,
            _ => Self::Both,
        }
    }
}

/// Accepts the snake_case names, the bare tier names (`standard`,
/// `premium`), or the legacy numeric codes.
impl<'de> Deserialize<'de> for NotifyScope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Code(i64),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Code(code) => Ok(Self::from_code(code)),
            Repr::Name(name) => match name.parse::<Tier>() {
                Ok(Tier::Standard) => Ok(Self::StandardOnly),
                Ok(Tier::Premium) => Ok(Self::PremiumOnly),
                Err(_) => name.parse().map_err(|_| {
                    serde::de::Error::custom(format!(
                        "unknown notify scope '{name}', expected standard, premium or both"
                    ))
                }),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn includes_matches_tier() {
        assert!(NotifyScope::StandardOnly.includes(Tier::Standard));
        assert!(!NotifyScope::StandardOnly.includes(Tier::Premium));
        assert!(NotifyScope::PremiumOnly.includes(Tier::Premium));
        assert!(!NotifyScope::PremiumOnly.includes(Tier::Standard));
        assert!(NotifyScope::Both.includes(Tier::Standard));
        assert!(NotifyScope::Both.includes(Tier::Premium));
    }

    #[test]
    fn deserializes_names_and_codes() {
        let cases = [
            (serde_json::json!("standard"), NotifyScope::StandardOnly),
            (serde_json::json!("premium_only"), NotifyScope::PremiumOnly),
            (serde_json::json!("Both"), NotifyScope::Both),
            (serde_json::json!(0), NotifyScope::StandardOnly),
            (serde_json::json!(1), NotifyScope::PremiumOnly),
            (serde_json::json!(2), NotifyScope::Both),
        ];
        for (value, expected) in cases {
            let scope: NotifyScope = serde_json::from_value(value.clone()).unwrap();
            assert_eq!(scope, expected, "input {value}");
        }
    }

    #[test]
    fn rejects_unknown_name() {
        let result = serde_json::from_value::<NotifyScope>(serde_json::json!("everything"));
        assert!(result.is_err());
    }
}
