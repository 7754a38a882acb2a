//! Shopify integration: request authentication and the Admin API client.

use thiserror::Error;

pub mod admin_api;
pub mod metafields;
pub mod proxy;
pub mod webhook;

pub use admin_api::AdminApiClient;
pub use metafields::{Metafield, decode_delivery_metafields};
pub use proxy::{shop_from_proxy_query, verify_proxy_signature};
pub use webhook::{WebhookContext, verify_webhook};

/// Error type for Shopify Admin API operations.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP transport failure.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with GraphQL-level errors.
    #[error("graphql error: {0}")]
    GraphQl(String),

    /// The mutation reported user errors.
    #[error("user errors: {0}")]
    UserErrors(String),

    /// No Admin API token is configured.
    #[error("admin token not configured")]
    NoToken,
}
