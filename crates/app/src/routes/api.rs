//! Direct validation API.
//!
//! The theme extension calls this without the app proxy, naming the shop in
//! the body. It exists so cart-page scripts that cannot reach the proxy
//! still re-validate before checkout.

use axum::{Json, Router, extract::State, routing::post};
use chrono::Utc;
use serde::Deserialize;

use delivery_date_pro_core::{DateValidation, DeliveryDate, ShopDomain};

use super::proxy::ProductIdParam;
use crate::error::{AppError, Result};
use crate::services::DeliveryService;
use crate::state::AppState;

/// Build the direct API router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/validate-date", post(validate_date))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateDateRequest {
    shop: String,
    delivery_date: String,
    #[serde(default)]
    product_id: Option<ProductIdParam>,
}

/// POST /api/validate-date
async fn validate_date(
    State(state): State<AppState>,
    Json(body): Json<ValidateDateRequest>,
) -> Result<Json<DateValidation>> {
    let shop = ShopDomain::normalize(&body.shop);
    let candidate = DeliveryDate::parse(&body.delivery_date)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let product_id = body.product_id.map(ProductIdParam::into_product_id);

    let verdict = DeliveryService::new(&state)
        .validate(&shop, candidate, product_id.as_ref(), Utc::now())
        .await?;
    Ok(Json(verdict))
}
