//! Webhook handlers.
//!
//! Every handler verifies the delivery HMAC against the raw body before
//! parsing it. Mismatched topics are acknowledged without action so Shopify
//! does not retry them.

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};

use delivery_date_pro_core::{DeliveryDate, ProductId};

use crate::db::OverrideRepository;
use crate::error::{AppError, Result};
use crate::services::DeliveryService;
use crate::shopify::{WebhookContext, decode_delivery_metafields, verify_webhook};
use crate::state::AppState;

/// Line-item property the widget writes the selected date into.
const DELIVERY_DATE_PROPERTY: &str = "Delivery Date";

/// Build the webhook router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/webhooks/orders/create", post(orders_create))
        .route("/webhooks/products/update", post(products_update))
        .route("/webhooks/app/uninstalled", post(app_uninstalled))
}

/// Verify the delivery HMAC and extract topic + shop.
fn authenticate(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<WebhookContext> {
    verify_webhook(headers, body, &state.config().shopify.api_secret)
        .ok_or_else(|| AppError::Unauthorized("invalid webhook hmac".to_owned()))
}

// =============================================================================
// orders/create
// =============================================================================

#[derive(Debug, serde::Deserialize)]
struct OrderPayload {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    admin_graphql_api_id: Option<String>,
    #[serde(default)]
    tags: Option<String>,
    #[serde(default)]
    line_items: Vec<LineItem>,
}

#[derive(Debug, serde::Deserialize)]
struct LineItem {
    #[serde(default)]
    properties: Vec<LineItemProperty>,
}

#[derive(Debug, serde::Deserialize)]
struct LineItemProperty {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

/// The first well-formed delivery date among the order's line items.
fn extract_delivery_date(order: &OrderPayload) -> Option<DeliveryDate> {
    for item in &order.line_items {
        for prop in &item.properties {
            if prop.name.as_deref() != Some(DELIVERY_DATE_PROPERTY) {
                continue;
            }
            let Some(value) = prop.value.as_deref().map(str::trim) else {
                continue;
            };
            match DeliveryDate::parse(value) {
                Ok(date) => return Some(date),
                Err(e) => {
                    tracing::warn!(value, error = %e, "Unparseable delivery date property");
                }
            }
        }
    }
    None
}

impl OrderPayload {
    fn graphql_id(&self) -> Option<String> {
        self.admin_graphql_api_id.clone().or_else(|| {
            self.id.map(|id| format!("gid://shopify/Order/{id}"))
        })
    }

    /// Existing tags merged with the delivery tags, order-preserving.
    fn merged_tags(&self, date: DeliveryDate) -> Vec<String> {
        let mut tags: Vec<String> = self
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .collect();
        for tag in [format!("Delivery-{date}"), "Delivery-Date-Selected".to_owned()] {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }
}

/// POST /webhooks/orders/create
///
/// Counts the order against its delivery date's capacity and tags the order
/// so it can be found in the Shopify admin. Tagging failures are logged but
/// never fail the webhook; the count is what capacity correctness rests on.
async fn orders_create(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    let ctx = authenticate(&state, &headers, &body)?;
    if ctx.topic != "orders/create" {
        return Ok(StatusCode::OK);
    }

    let order: OrderPayload = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("invalid order payload: {e}")))?;

    let Some(date) = extract_delivery_date(&order) else {
        return Ok(StatusCode::OK);
    };

    DeliveryService::new(&state).record_order(&ctx.shop, date).await?;

    if state.admin_api().is_configured() {
        if let Some(order_gid) = order.graphql_id() {
            let tags = order.merged_tags(date);
            if let Err(e) = state
                .admin_api()
                .update_order_tags(&ctx.shop, &order_gid, &tags)
                .await
            {
                tracing::error!(error = %e, order = %order_gid, "Order tag update failed");
            }
        }
    }

    Ok(StatusCode::OK)
}

// =============================================================================
// products/update
// =============================================================================

#[derive(Debug, serde::Deserialize)]
struct ProductPayload {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    admin_graphql_api_id: Option<String>,
    #[serde(default)]
    metafields: Vec<crate::shopify::Metafield>,
}

impl ProductPayload {
    fn product_id(&self) -> Option<ProductId> {
        self.admin_graphql_api_id
            .as_deref()
            .map(ProductId::new)
            .or_else(|| self.id.map(|id| ProductId::new(&id.to_string())))
    }
}

/// POST /webhooks/products/update
///
/// Syncs the product's `delivery.*` metafields into the override row and
/// refreshes the cache entry so the next proxy request sees them.
async fn products_update(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    let ctx = authenticate(&state, &headers, &body)?;
    if ctx.topic != "products/update" {
        return Ok(StatusCode::OK);
    }

    let product: ProductPayload = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("invalid product payload: {e}")))?;

    let Some(product_id) = product.product_id() else {
        return Ok(StatusCode::OK);
    };
    if product.metafields.is_empty() {
        return Ok(StatusCode::OK);
    }

    let overrides = decode_delivery_metafields(&product.metafields);
    OverrideRepository::new(state.pool())
        .upsert(&ctx.shop, &product_id, overrides)
        .await?;
    state
        .override_cache()
        .insert((ctx.shop.clone(), product_id), Some(overrides))
        .await;

    Ok(StatusCode::OK)
}

// =============================================================================
// app/uninstalled
// =============================================================================

/// POST /webhooks/app/uninstalled
async fn app_uninstalled(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    let ctx = authenticate(&state, &headers, &body)?;
    if ctx.topic != "app/uninstalled" {
        return Ok(StatusCode::OK);
    }

    DeliveryService::new(&state).purge_shop(&ctx.shop).await?;
    tracing::info!(shop = %ctx.shop, "Shop data purged after uninstall");
    Ok(StatusCode::OK)
}
