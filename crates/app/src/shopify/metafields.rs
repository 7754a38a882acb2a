//! Product metafield decoding.
//!
//! Delivery overrides live on the product as metafields under the
//! `delivery` namespace with keys `enabled`, `cutoff_hours`,
//! `max_days_ahead`, and `daily_capacity`. The products/update webhook
//! carries the product's metafields; this module decodes them into a typed
//! [`ProductOverride`], keeping "not set" distinct from an explicit `false`.

use serde::Deserialize;

use delivery_date_pro_core::ProductOverride;

/// Metafield namespace owning the delivery keys.
pub const DELIVERY_NAMESPACE: &str = "delivery";

/// A metafield as it appears in a product webhook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Metafield {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// Decode the `delivery.*` metafields into a typed override.
///
/// Unknown keys and unparseable values decode to "not set" rather than
/// failing the whole payload; a product with a garbled `cutoff_hours` still
/// syncs its other overrides.
#[must_use]
pub fn decode_delivery_metafields(metafields: &[Metafield]) -> ProductOverride {
    let find = |key: &str| -> Option<&str> {
        metafields
            .iter()
            .find(|m| {
                m.namespace.as_deref() == Some(DELIVERY_NAMESPACE) && m.key.as_deref() == Some(key)
            })
            .and_then(|m| m.value.as_deref())
    };

    ProductOverride {
        enabled: find("enabled").map(|v| v == "true"),
        cutoff_hours: find("cutoff_hours").and_then(|v| v.parse().ok()),
        max_days_ahead: find("max_days_ahead").and_then(|v| v.parse().ok()),
        daily_capacity: find("daily_capacity").and_then(|v| v.parse().ok()),
    }
}
