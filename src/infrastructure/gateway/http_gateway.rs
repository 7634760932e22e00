use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::gateway::{GatewayError, GatewayReceipt, GatewayStatus, PaymentGateway};

/// HTTP client for the payment gateway's deposit API
///
/// Endpoints:
/// - `POST {base}/deposits` create a deposit
/// - `GET  {base}/deposits/{external_id}` check status
/// - `POST {base}/deposits/{external_id}/cancel` cancel
///
/// Authenticated with an `X-Api-Key` header. Requests carry a fixed
/// timeout and there is no retry policy; the polling loop tries again
/// on its next pass.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct CreateDepositRequest {
    amount: Decimal,
}

#[derive(Debug, Deserialize)]
struct DepositStatusResponse {
    status: GatewayStatus,
}

impl HttpPaymentGateway {
    /// Creates a gateway client
    ///
    /// # Arguments
    /// * `base_url` - Gateway API root, without trailing slash
    /// * `api_key` - Value for the `X-Api-Key` header
    /// * `timeout_secs` - Fixed per-request timeout
    pub fn new(base_url: String, api_key: String, timeout_secs: u64) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_deposit(&self, amount: Decimal) -> Result<GatewayReceipt, GatewayError> {
        let response = self
            .client
            .post(self.url("/deposits"))
            .header("X-Api-Key", &self.api_key)
            .json(&CreateDepositRequest { amount })
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::BadResponse(format!(
                "create_deposit returned {}",
                response.status()
            )));
        }

        response
            .json::<GatewayReceipt>()
            .await
            .map_err(|e| GatewayError::BadResponse(e.to_string()))
    }

    async fn check_deposit(&self, external_id: &str) -> Result<GatewayStatus, GatewayError> {
        let response = self
            .client
            .get(self.url(&format!("/deposits/{}", external_id)))
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::BadResponse(format!(
                "check_deposit returned {}",
                response.status()
            )));
        }

        let body = response
            .json::<DepositStatusResponse>()
            .await
            .map_err(|e| GatewayError::BadResponse(e.to_string()))?;
        Ok(body.status)
    }

    async fn cancel_deposit(&self, external_id: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.url(&format!("/deposits/{}/cancel", external_id)))
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::BadResponse(format!(
                "cancel_deposit returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
