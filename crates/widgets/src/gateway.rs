//! Order submission.
//!
//! The cart widget hands a finished order to an [`OrderGateway`]. The
//! production gateway posts JSON to the storefront's checkout endpoint; tests
//! substitute their own.

use std::future::Future;

use fraterno_core::OrderRequest;
use tracing::instrument;
use url::Url;

use crate::config::SiteConfig;
use crate::error::GatewayError;

/// Something that accepts checkout submissions.
pub trait OrderGateway {
    /// Submit one order.
    ///
    /// Resolves to the parsed JSON response body on a 2xx answer. The body's
    /// contents are not interpreted.
    fn submit(
        &self,
        order: &OrderRequest,
    ) -> impl Future<Output = Result<serde_json::Value, GatewayError>>;
}

/// Posts orders to the storefront over HTTP.
#[derive(Debug, Clone)]
pub struct HttpOrderGateway {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpOrderGateway {
    /// Create a gateway posting to the endpoint described by `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint URL is invalid or the HTTP client fails
    /// to build.
    pub fn new(config: &SiteConfig) -> Result<Self, GatewayError> {
        let endpoint = config.order_endpoint()?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, endpoint })
    }

    /// The URL orders are posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl OrderGateway for HttpOrderGateway {
    #[instrument(skip(self, order), fields(endpoint = %self.endpoint, items = order.cart.len()))]
    async fn submit(&self, order: &OrderRequest) -> Result<serde_json::Value, GatewayError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(order)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))
    }
}
