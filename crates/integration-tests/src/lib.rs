//! Integration tests for Delivery Date Pro.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! ddp-cli migrate
//!
//! # Start the app
//! cargo run -p delivery-date-pro-app
//!
//! # Run integration tests
//! cargo test -p delivery-date-pro-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `APP_BASE_URL` - Base URL of the running app (default:
//!   `http://localhost:3000`)
//! - `SHOPIFY_API_SECRET` - Must match the app's secret so signed proxy
//!   requests verify
//! - `ADMIN_API_TOKEN` - Must match the app's admin bearer token

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Base URL for the app (configurable via environment).
#[must_use]
pub fn app_base_url() -> String {
    std::env::var("APP_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// The proxy signing secret tests share with the app under test.
#[must_use]
pub fn api_secret() -> String {
    std::env::var("SHOPIFY_API_SECRET").unwrap_or_else(|_| "integration-test-secret".to_owned())
}

/// The admin bearer token tests share with the app under test.
#[must_use]
pub fn admin_token() -> String {
    std::env::var("ADMIN_API_TOKEN").unwrap_or_else(|_| "integration-test-token".to_owned())
}

/// Sign query parameters the way Shopify's app proxy does: sorted
/// `key=value` pairs concatenated without separators, HMAC-SHA256 hex.
///
/// # Panics
///
/// Panics if the HMAC key is rejected, which cannot happen for SHA-256.
#[must_use]
pub fn proxy_signature(params: &[(&str, &str)], secret: &str) -> String {
    let mut pairs: Vec<_> = params.to_vec();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    let message: String = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("");

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Build a signed proxy URL for the given path and parameters.
#[must_use]
pub fn signed_proxy_url(path: &str, params: &[(&str, &str)]) -> String {
    let signature = proxy_signature(params, &api_secret());
    let query: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .chain(std::iter::once(format!("signature={signature}")))
        .collect();
    format!("{}{}?{}", app_base_url(), path, query.join("&"))
}
