//! HTTP route handlers for the delivery app.
//!
//! # Route Structure
//!
//! ```text
//! # App proxy (signature-authenticated; Shopify forwards storefront calls)
//! GET  /apps/delivery/available-dates   - Availability window for a product
//! POST /apps/delivery/validate-date     - Re-check a selected date
//! GET  /apps/delivery/add-ons           - Active order add-ons
//!
//! # Direct API (shop named in the body)
//! POST /api/validate-date               - Re-check a selected date
//!
//! # Webhooks (HMAC-authenticated)
//! POST /webhooks/orders/create          - Count + tag the delivery date
//! POST /webhooks/products/update        - Sync override metafields
//! POST /webhooks/app/uninstalled        - Purge the shop's data
//!
//! # Admin JSON API (bearer-token-authenticated)
//! GET  /admin/{shop}/settings           - Effective settings
//! PUT  /admin/{shop}/settings           - Partial settings update
//! GET  /admin/{shop}/blackouts          - List blackout entries
//! POST /admin/{shop}/blackouts          - Add a blackout entry
//! DELETE /admin/{shop}/blackouts/{id}   - Remove a blackout entry
//! GET  /admin/{shop}/add-ons            - List all add-ons
//! POST /admin/{shop}/add-ons            - Create an add-on
//! PUT  /admin/{shop}/add-ons/{id}       - Update an add-on
//! DELETE /admin/{shop}/add-ons/{id}     - Delete an add-on
//! ```

pub mod admin;
pub mod api;
pub mod proxy;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Compose every route group.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(proxy::router())
        .merge(api::router())
        .merge(webhooks::router())
        .nest("/admin", admin::router())
}
