//! Per-product override values.

use serde::{Deserialize, Serialize};

/// Product-level values that supersede shop settings.
///
/// Decoded from the product's `delivery.*` metafields and cached by the app.
/// Every field is three-state: absent means "fall back to the shop setting",
/// which for `enabled` is distinct from an explicit `false` (feature turned
/// off for the product).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOverride {
    /// Whether the date picker is enabled for this product at all.
    pub enabled: Option<bool>,
    /// Local hour of day (0-23) replacing the shop cutoff time.
    pub cutoff_hours: Option<u8>,
    /// Replacement for the shop's max-days-ahead window.
    pub max_days_ahead: Option<u32>,
    /// Replacement for the shop's daily capacity.
    pub daily_capacity: Option<u32>,
}

impl ProductOverride {
    /// True when the override explicitly disables the feature.
    ///
    /// An absent `enabled` falls back to the shop default (enabled), so only
    /// `Some(false)` disables.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.enabled == Some(false)
    }

    /// True when no field is set at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn absent_enabled_is_not_disabled() {
        assert!(!ProductOverride::default().is_disabled());
        assert!(
            !ProductOverride {
                enabled: Some(true),
                ..ProductOverride::default()
            }
            .is_disabled()
        );
        assert!(
            ProductOverride {
                enabled: Some(false),
                ..ProductOverride::default()
            }
            .is_disabled()
        );
    }

    #[test]
    fn serde_distinguishes_absent_from_false() {
        let absent: ProductOverride = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.enabled, None);

        let off: ProductOverride = serde_json::from_str(r#"{"enabled":false}"#).unwrap();
        assert_eq!(off.enabled, Some(false));
    }
}
