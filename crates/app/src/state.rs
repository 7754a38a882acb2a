//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use delivery_date_pro_core::{ProductId, ProductOverride, ShopDomain};

use crate::config::AppConfig;
use crate::shopify::AdminApiClient;

/// How long cached override rows stay fresh.
///
/// The products/update webhook invalidates eagerly, so the TTL only bounds
/// staleness when a webhook is missed.
const OVERRIDE_CACHE_TTL: Duration = Duration::from_secs(300);

/// Cached product overrides keyed by (shop, product).
///
/// `None` records that the product has no override row, so repeated proxy
/// requests for unconfigured products skip the database too.
pub type OverrideCache = Cache<(ShopDomain, ProductId), Option<ProductOverride>>;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the database pool,
/// configuration, the override cache, and the Admin API client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    override_cache: OverrideCache,
    admin_api: AdminApiClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        let override_cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(OVERRIDE_CACHE_TTL)
            .build();
        let admin_api = AdminApiClient::new(&config.shopify);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                override_cache,
                admin_api,
            }),
        }
    }

    /// Get a reference to the app configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the product override cache.
    #[must_use]
    pub fn override_cache(&self) -> &OverrideCache {
        &self.inner.override_cache
    }

    /// Get a reference to the Shopify Admin API client.
    #[must_use]
    pub fn admin_api(&self) -> &AdminApiClient {
        &self.inner.admin_api
    }
}
