use crate::application::payload::PayloadBuilder;
use crate::domain::checkout::{Action, ApiResponse, Receipt};
use crate::domain::config::GatewayConfiguration;
use crate::domain::ports::CheckoutGateway;
use crate::domain::request::PreloadRequest;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// JSON-over-HTTPS client for the provider's request endpoint.
///
/// No timeout or retry is configured here; callers wrap calls in their own
/// timeout policy if they need one. Bodies are logged unredacted when the
/// matching `api_logging` toggle is on.
#[derive(Clone)]
pub struct HttpGatewayClient {
    client: reqwest::Client,
    config: Arc<GatewayConfiguration>,
    payload: PayloadBuilder,
}

impl HttpGatewayClient {
    pub fn new(config: Arc<GatewayConfiguration>) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: Arc<GatewayConfiguration>) -> Self {
        Self {
            client,
            payload: PayloadBuilder::new(config.clone()),
            config,
        }
    }

    /// Posts `body` for `action` and decodes the response envelope.
    ///
    /// Transport failures, HTTP error statuses and undecodable bodies all
    /// surface as gateway errors carrying the underlying cause.
    pub async fn request_action<B: Serialize + ?Sized>(
        &self,
        action: Action,
        body: &B,
    ) -> Result<ApiResponse> {
        let url = self.config.request_url();
        if self.config.api_logging.request {
            match serde_json::to_string(body) {
                Ok(json) => debug!(action = action.as_str(), %url, body = %json, "api request"),
                Err(e) => debug!(action = action.as_str(), error = %e, "api request not loggable"),
            }
        }

        let failed = |e: reqwest::Error| {
            PaymentError::transport(
                format!("Moneris checkout {} request failed. Message: {e}.", action.as_str()),
                e,
            )
        };
        let text = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(failed)?
            .text()
            .await
            .map_err(failed)?;

        if self.config.api_logging.response {
            debug!(action = action.as_str(), body = %text, "api response");
        }

        serde_json::from_str(&text).map_err(|e| {
            PaymentError::transport(
                format!(
                    "Moneris checkout {} response could not be decoded. Message: {e}.",
                    action.as_str()
                ),
                e,
            )
        })
    }
}

#[async_trait]
impl CheckoutGateway for HttpGatewayClient {
    async fn preload(&self, request: &PreloadRequest) -> Result<String> {
        let response = self.request_action(Action::Preload, request).await?.response;
        if !response.is_success() {
            return Err(PaymentError::gateway(format!(
                "Moneris checkout preload request failed. Error: {}",
                response.error_message()
            )));
        }
        response
            .ticket
            .filter(|ticket| !ticket.is_empty())
            .ok_or_else(|| {
                PaymentError::gateway("Moneris checkout preload response carried no ticket.")
            })
    }

    async fn receipt(&self, ticket: &str) -> Result<Receipt> {
        let request = self.payload.receipt(ticket);
        let response = self.request_action(Action::Receipt, &request).await?.response;
        if !response.is_success() {
            return Err(PaymentError::gateway(format!(
                "Moneris payment receipt request failed. Message: {}.",
                response.error_message()
            )));
        }

        let envelope = response.receipt.unwrap_or_default();
        if !envelope.is_approved() {
            return Err(PaymentError::HardDecline(
                "Moneris payment transaction declined.".to_string(),
            ));
        }
        envelope.cc.ok_or_else(|| {
            PaymentError::gateway("Moneris payment receipt carried no card receipt.")
        })
    }
}
