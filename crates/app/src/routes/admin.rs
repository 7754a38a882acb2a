//! Admin JSON API.
//!
//! Backs the embedded admin UI: shop settings, blackout dates, and add-on
//! management. Every request must carry the configured bearer token; the
//! UI itself and its Shopify session handling live outside this service.

use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, State},
    http::{StatusCode, request::Parts},
    routing::{delete, get},
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use uuid::Uuid;

use delivery_date_pro_core::{BlackoutDate, ShopDomain, ShopSettings, ShopSettingsUpdate};

use crate::db::{
    AddOn, AddOnRepository, AddOnUpdate, BlackoutRepository, BlackoutRow, NewAddOn,
    SettingsRepository,
};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Build the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{shop}/settings",
            get(get_settings).put(update_settings),
        )
        .route(
            "/{shop}/blackouts",
            get(list_blackouts).post(add_blackout),
        )
        .route("/{shop}/blackouts/{id}", delete(remove_blackout))
        .route("/{shop}/add-ons", get(list_add_ons).post(create_add_on))
        .route(
            "/{shop}/add-ons/{id}",
            axum::routing::put(update_add_on).delete(delete_add_on),
        )
}

/// Extractor enforcing the admin bearer token.
///
/// Rejects with 401 unless the request carries
/// `Authorization: Bearer <ADMIN_API_TOKEN>`.
pub struct AdminAuth;

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::Unauthorized("missing admin token".to_owned()))?;

        if provided != state.config().admin_api_token.expose_secret() {
            return Err(AppError::Unauthorized("invalid admin token".to_owned()));
        }
        Ok(Self)
    }
}

// =============================================================================
// Settings
// =============================================================================

/// GET /admin/{shop}/settings
async fn get_settings(
    _auth: AdminAuth,
    State(state): State<AppState>,
    Path(shop): Path<String>,
) -> Result<Json<ShopSettings>> {
    let shop = ShopDomain::normalize(&shop);
    let settings = SettingsRepository::new(state.pool())
        .get_or_default(&shop)
        .await?;
    Ok(Json(settings))
}

/// PUT /admin/{shop}/settings
///
/// Partial update; absent fields keep their stored (or default) values.
/// Returns the effective settings after the write.
async fn update_settings(
    _auth: AdminAuth,
    State(state): State<AppState>,
    Path(shop): Path<String>,
    Json(update): Json<ShopSettingsUpdate>,
) -> Result<Json<ShopSettings>> {
    let shop = ShopDomain::normalize(&shop);
    let settings = SettingsRepository::new(state.pool())
        .upsert(&shop, update)
        .await?;
    Ok(Json(settings))
}

// =============================================================================
// Blackouts
// =============================================================================

/// GET /admin/{shop}/blackouts
async fn list_blackouts(
    _auth: AdminAuth,
    State(state): State<AppState>,
    Path(shop): Path<String>,
) -> Result<Json<Vec<BlackoutRow>>> {
    let shop = ShopDomain::normalize(&shop);
    let rows = BlackoutRepository::new(state.pool()).list(&shop).await?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AddBlackoutRequest {
    date: String,
    #[serde(default)]
    recurring: bool,
    #[serde(default)]
    label: Option<String>,
}

/// POST /admin/{shop}/blackouts
async fn add_blackout(
    _auth: AdminAuth,
    State(state): State<AppState>,
    Path(shop): Path<String>,
    Json(body): Json<AddBlackoutRequest>,
) -> Result<(StatusCode, Json<BlackoutRow>)> {
    let shop = ShopDomain::normalize(&shop);
    let date = BlackoutDate::parse(&body.date)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let row = BlackoutRepository::new(state.pool())
        .add(&shop, date, body.recurring, body.label.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /admin/{shop}/blackouts/{id}
async fn remove_blackout(
    _auth: AdminAuth,
    State(state): State<AppState>,
    Path((shop, id)): Path<(String, Uuid)>,
) -> Result<StatusCode> {
    let shop = ShopDomain::normalize(&shop);
    BlackoutRepository::new(state.pool()).remove(&shop, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Add-ons
// =============================================================================

/// GET /admin/{shop}/add-ons
async fn list_add_ons(
    _auth: AdminAuth,
    State(state): State<AppState>,
    Path(shop): Path<String>,
) -> Result<Json<Vec<AddOn>>> {
    let shop = ShopDomain::normalize(&shop);
    let rows = AddOnRepository::new(state.pool()).list_all(&shop).await?;
    Ok(Json(rows))
}

/// POST /admin/{shop}/add-ons
async fn create_add_on(
    _auth: AdminAuth,
    State(state): State<AppState>,
    Path(shop): Path<String>,
    Json(body): Json<NewAddOn>,
) -> Result<(StatusCode, Json<AddOn>)> {
    let shop = ShopDomain::normalize(&shop);
    let row = AddOnRepository::new(state.pool()).create(&shop, body).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /admin/{shop}/add-ons/{id}
async fn update_add_on(
    _auth: AdminAuth,
    State(state): State<AppState>,
    Path((shop, id)): Path<(String, Uuid)>,
    Json(body): Json<AddOnUpdate>,
) -> Result<Json<AddOn>> {
    let shop = ShopDomain::normalize(&shop);
    let row = AddOnRepository::new(state.pool())
        .update(&shop, id, body)
        .await?;
    Ok(Json(row))
}

/// DELETE /admin/{shop}/add-ons/{id}
async fn delete_add_on(
    _auth: AdminAuth,
    State(state): State<AppState>,
    Path((shop, id)): Path<(String, Uuid)>,
) -> Result<StatusCode> {
    let shop = ShopDomain::normalize(&shop);
    AddOnRepository::new(state.pool()).delete(&shop, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
