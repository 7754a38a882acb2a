//! App proxy request authentication.
//!
//! Shopify forwards storefront requests to `/apps/delivery/*` with a
//! `signature` query parameter: an HMAC-SHA256 (hex) over the remaining
//! query parameters sorted by key and concatenated as `key=value` with no
//! separator between pairs. This differs from OAuth callbacks, which join
//! pairs with `&`.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use delivery_date_pro_core::ShopDomain;

type HmacSha256 = Hmac<Sha256>;

/// Verify the `signature` parameter of an app proxy request.
///
/// `params` are the decoded query parameters as received. Returns `false`
/// when the signature is absent, malformed, or does not match.
#[must_use]
pub fn verify_proxy_signature(params: &[(String, String)], secret: &SecretString) -> bool {
    let Some(provided) = params
        .iter()
        .find(|(k, _)| k == "signature")
        .map(|(_, v)| v.as_str())
    else {
        return false;
    };
    let Ok(provided) = hex::decode(provided) else {
        return false;
    };

    let mut pairs: Vec<&(String, String)> =
        params.iter().filter(|(k, _)| k != "signature").collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let message: String = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("");

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.expose_secret().as_bytes()) else {
        return false;
    };
    mac.update(message.as_bytes());
    mac.verify_slice(&provided).is_ok()
}

/// Extract and normalize the shop domain from proxy query parameters.
#[must_use]
pub fn shop_from_proxy_query(params: &[(String, String)]) -> Option<ShopDomain> {
    params
        .iter()
        .find(|(k, _)| k == "shop")
        .map(|(_, v)| ShopDomain::normalize(v))
}
