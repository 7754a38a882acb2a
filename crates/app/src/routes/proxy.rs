//! App proxy routes.
//!
//! Storefront widgets call these through Shopify's app proxy
//! (`https://{store}/apps/delivery/...`); Shopify forwards the request here
//! with a `signature` parameter every handler verifies before touching data.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use delivery_date_pro_core::{
    AvailabilityResult, DateValidation, DeliveryDate, ProductId, ShopDomain,
};

use crate::db::{AddOn, AddOnRepository};
use crate::error::{AppError, Result};
use crate::services::{DeliveryService, ProductAvailability};
use crate::shopify::{shop_from_proxy_query, verify_proxy_signature};
use crate::state::AppState;

/// Build the app proxy router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/apps/delivery/available-dates", get(available_dates))
        .route("/apps/delivery/validate-date", post(validate_date))
        .route("/apps/delivery/add-ons", get(add_ons))
}

/// Verify the proxy signature and extract the calling shop.
fn authenticate_proxy(state: &AppState, params: &[(String, String)]) -> Result<ShopDomain> {
    if !verify_proxy_signature(params, &state.config().shopify.api_secret) {
        return Err(AppError::Unauthorized(
            "invalid app proxy signature".to_owned(),
        ));
    }
    shop_from_proxy_query(params)
        .ok_or_else(|| AppError::BadRequest("missing shop parameter".to_owned()))
}

fn query_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

// =============================================================================
// Available dates
// =============================================================================

/// Availability payload, with an explanatory message when the picker is
/// disabled for the product.
#[derive(Debug, Serialize)]
struct AvailabilityResponse {
    #[serde(flatten)]
    result: AvailabilityResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// GET /apps/delivery/available-dates
async fn available_dates(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<AvailabilityResponse>> {
    let shop = authenticate_proxy(&state, &params)?;
    let product_id = query_param(&params, "product_id").map(ProductId::new);

    let availability = DeliveryService::new(&state)
        .availability(&shop, product_id.as_ref(), Utc::now())
        .await?;

    let response = match availability {
        ProductAvailability::Disabled => AvailabilityResponse {
            result: AvailabilityResult::default(),
            message: Some("Delivery date picker is disabled for this product.".to_owned()),
        },
        ProductAvailability::Ready(result) => AvailabilityResponse {
            result,
            message: None,
        },
    };
    Ok(Json(response))
}

// =============================================================================
// Validate date
// =============================================================================

/// A product ID as checkout payloads send it: a string or a bare number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProductIdParam {
    Text(String),
    Number(i64),
}

impl ProductIdParam {
    /// Normalize to a [`ProductId`].
    #[must_use]
    pub fn into_product_id(self) -> ProductId {
        match self {
            Self::Text(s) => ProductId::new(&s),
            Self::Number(n) => ProductId::new(&n.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateDateRequest {
    delivery_date: String,
    #[serde(default)]
    product_id: Option<ProductIdParam>,
}

/// POST /apps/delivery/validate-date
///
/// The storefront calls this before checkout to catch stale or tampered
/// selections. A malformed date is a bad request, distinct from a
/// `{valid:false}` business rejection.
async fn validate_date(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
    Json(body): Json<ValidateDateRequest>,
) -> Result<Json<DateValidation>> {
    let shop = authenticate_proxy(&state, &params)?;
    let candidate = DeliveryDate::parse(&body.delivery_date)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let product_id = body.product_id.map(ProductIdParam::into_product_id);

    let verdict = DeliveryService::new(&state)
        .validate(&shop, candidate, product_id.as_ref(), Utc::now())
        .await?;
    Ok(Json(verdict))
}

// =============================================================================
// Add-ons
// =============================================================================

/// The storefront's view of an add-on.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddOnPublic {
    id: Uuid,
    name: String,
    #[serde(with = "rust_decimal::serde::str")]
    price: Decimal,
    variant_id: String,
}

impl From<AddOn> for AddOnPublic {
    fn from(add_on: AddOn) -> Self {
        Self {
            id: add_on.id,
            name: add_on.name,
            price: add_on.price,
            variant_id: add_on.variant_id,
        }
    }
}

/// GET /apps/delivery/add-ons
async fn add_ons(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<AddOnPublic>>> {
    let shop = authenticate_proxy(&state, &params)?;
    let add_ons = AddOnRepository::new(state.pool()).list_active(&shop).await?;
    Ok(Json(add_ons.into_iter().map(AddOnPublic::from).collect()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn validate_request_accepts_string_or_numeric_product_id() {
        let req: ValidateDateRequest = serde_json::from_str(
            r#"{"deliveryDate":"2024-06-05","productId":"gid://shopify/Product/42"}"#,
        )
        .unwrap();
        assert_eq!(
            req.product_id.map(ProductIdParam::into_product_id),
            Some(ProductId::new("42"))
        );

        let req: ValidateDateRequest =
            serde_json::from_str(r#"{"deliveryDate":"2024-06-05","productId":42}"#).unwrap();
        assert_eq!(
            req.product_id.map(ProductIdParam::into_product_id),
            Some(ProductId::new("42"))
        );

        let req: ValidateDateRequest =
            serde_json::from_str(r#"{"deliveryDate":"2024-06-05"}"#).unwrap();
        assert!(req.product_id.is_none());
    }

    #[test]
    fn disabled_response_shape() {
        let response = AvailabilityResponse {
            result: AvailabilityResult::default(),
            message: Some("Delivery date picker is disabled for this product.".to_owned()),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["availableDates"], serde_json::json!([]));
        assert_eq!(json["nextValidDate"], serde_json::Value::Null);
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .contains("disabled for this product")
        );
    }
}
