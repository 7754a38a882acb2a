//! Shopify Admin GraphQL API client.
//!
//! Used by the orders/create webhook to tag orders with their selected
//! delivery date. The documents involved are single small mutations, so
//! they are posted with `reqwest` directly rather than through a codegen
//! client.

use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use delivery_date_pro_core::ShopDomain;

use super::ShopifyError;
use crate::config::ShopifyConfig;

const ORDER_UPDATE_MUTATION: &str = r"
mutation orderUpdate($input: OrderInput!) {
  orderUpdate(input: $input) {
    order { id }
    userErrors { field message }
  }
}";

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<OrderUpdateData>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderUpdateData {
    order_update: Option<OrderUpdatePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderUpdatePayload {
    #[serde(default)]
    user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
struct UserError {
    message: String,
}

/// Shopify Admin GraphQL API client.
///
/// Tagging is optional: without a configured Admin API token the client is
/// inert and callers skip tagging, which keeps the webhook able to count
/// orders in a minimal deployment.
#[derive(Clone)]
pub struct AdminApiClient {
    client: reqwest::Client,
    api_version: String,
    token: Option<String>,
}

impl AdminApiClient {
    /// Create a new Admin API client from configuration.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created. This should never happen
    /// under normal circumstances as we use standard TLS configuration.
    #[must_use]
    pub fn new(config: &ShopifyConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_version: config.api_version.clone(),
            token: config
                .admin_token
                .as_ref()
                .map(|t| t.expose_secret().to_owned()),
        }
    }

    /// Whether a token is configured and calls can be made.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    /// Replace an order's tags.
    ///
    /// `order_gid` is the GraphQL order ID; `tags` is the full replacement
    /// set (Shopify's `orderUpdate` overwrites, so callers merge with the
    /// existing tags first).
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NoToken` without a configured token,
    /// `Request` on transport failure, and `GraphQl`/`UserErrors` when the
    /// API rejects the mutation.
    #[instrument(skip(self, tags), fields(order = %order_gid))]
    pub async fn update_order_tags(
        &self,
        shop: &ShopDomain,
        order_gid: &str,
        tags: &[String],
    ) -> Result<(), ShopifyError> {
        let token = self.token.as_ref().ok_or(ShopifyError::NoToken)?;
        let endpoint = format!(
            "https://{}/admin/api/{}/graphql.json",
            shop.as_str(),
            self.api_version
        );

        let response: GraphQlResponse = self
            .client
            .post(&endpoint)
            .header("X-Shopify-Access-Token", token)
            .json(&json!({
                "query": ORDER_UPDATE_MUTATION,
                "variables": { "input": { "id": order_gid, "tags": tags } },
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(ShopifyError::GraphQl(messages.join("; ")));
        }

        let user_errors = response
            .data
            .and_then(|d| d.order_update)
            .map(|p| p.user_errors)
            .unwrap_or_default();
        if !user_errors.is_empty() {
            let messages: Vec<String> = user_errors.into_iter().map(|e| e.message).collect();
            return Err(ShopifyError::UserErrors(messages.join("; ")));
        }

        Ok(())
    }
}
