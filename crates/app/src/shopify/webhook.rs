//! Webhook request authentication.
//!
//! Shopify signs webhook deliveries with `X-Shopify-Hmac-Sha256`: a
//! base64-encoded HMAC-SHA256 over the raw request body. Topic and shop
//! arrive in `X-Shopify-Topic` and `X-Shopify-Shop-Domain` headers.

use axum::http::HeaderMap;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use delivery_date_pro_core::ShopDomain;

type HmacSha256 = Hmac<Sha256>;

const HMAC_HEADER: &str = "x-shopify-hmac-sha256";
const TOPIC_HEADER: &str = "x-shopify-topic";
const SHOP_HEADER: &str = "x-shopify-shop-domain";

/// An authenticated webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookContext {
    /// Normalized topic, e.g. `orders/create`.
    pub topic: String,
    /// The delivering shop.
    pub shop: ShopDomain,
}

/// Verify a webhook delivery and extract its topic and shop.
///
/// Returns `None` when the HMAC is absent or wrong, or when the topic/shop
/// headers are missing. Topics are lowercased and `_` is normalized to `/`
/// so both `ORDERS_CREATE` and `orders/create` forms compare equal.
#[must_use]
pub fn verify_webhook(
    headers: &HeaderMap,
    body: &[u8],
    secret: &SecretString,
) -> Option<WebhookContext> {
    let provided = headers.get(HMAC_HEADER)?.to_str().ok()?;
    let provided = BASE64.decode(provided).ok()?;

    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes()).ok()?;
    mac.update(body);
    mac.verify_slice(&provided).ok()?;

    let topic = headers
        .get(TOPIC_HEADER)?
        .to_str()
        .ok()?
        .to_lowercase()
        .replace('_', "/");
    let shop = ShopDomain::normalize(headers.get(SHOP_HEADER)?.to_str().ok()?);

    Some(WebhookContext { topic, shop })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn signed_headers(body: &[u8], secret: &str, topic: &str) -> HeaderMap {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        let digest = BASE64.encode(mac.finalize().into_bytes());

        let mut headers = HeaderMap::new();
        headers.insert(HMAC_HEADER, HeaderValue::from_str(&digest).unwrap());
        headers.insert(TOPIC_HEADER, HeaderValue::from_str(topic).unwrap());
        headers.insert(
            SHOP_HEADER,
            HeaderValue::from_static("example.myshopify.com"),
        );
        headers
    }

    #[test]
    fn accepts_a_correctly_signed_delivery() {
        let secret = SecretString::from("hush");
        let body = br#"{"id":1}"#;
        let ctx = verify_webhook(&signed_headers(body, "hush", "orders/create"), body, &secret)
            .unwrap();
        assert_eq!(ctx.topic, "orders/create");
        assert_eq!(ctx.shop.as_str(), "example.myshopify.com");
    }

    #[test]
    fn normalizes_underscore_topics() {
        let secret = SecretString::from("hush");
        let body = b"{}";
        let ctx = verify_webhook(
            &signed_headers(body, "hush", "ORDERS_CREATE"),
            body,
            &secret,
        )
        .unwrap();
        assert_eq!(ctx.topic, "orders/create");
    }

    #[test]
    fn rejects_a_tampered_body() {
        let secret = SecretString::from("hush");
        let headers = signed_headers(br#"{"id":1}"#, "hush", "orders/create");
        assert!(verify_webhook(&headers, br#"{"id":2}"#, &secret).is_none());
    }

    #[test]
    fn rejects_wrong_secret() {
        let secret = SecretString::from("hush");
        let body = b"{}";
        let headers = signed_headers(body, "different", "orders/create");
        assert!(verify_webhook(&headers, body, &secret).is_none());
    }

    #[test]
    fn rejects_missing_hmac_header() {
        let secret = SecretString::from("hush");
        let mut headers = signed_headers(b"{}", "hush", "orders/create");
        headers.remove(HMAC_HEADER);
        assert!(verify_webhook(&headers, b"{}", &secret).is_none());
    }
}
