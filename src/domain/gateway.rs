use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the payment gateway integration
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway request failed: {0}")]
    Request(String),

    #[error("Gateway returned an unexpected response: {0}")]
    BadResponse(String),
}

/// Gateway-side view of a deposit's progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayStatus {
    Pending,
    Completed,
    Cancelled,
}

/// What the gateway hands back when a deposit is created
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayReceipt {
    /// Gateway-assigned id used for status checks and cancellation
    pub external_id: String,
    /// QR-code payment URL shown to the user
    pub pay_url: String,
}

/// Port for the external payment gateway
///
/// Defines the contract for the create/status/cancel deposit endpoints.
/// The HTTP implementation is a thin client with a fixed timeout and no
/// retry policy; a failed check simply leaves the deposit pending for
/// the next polling pass.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Register a deposit and obtain its external id and payment URL
    async fn create_deposit(&self, amount: Decimal) -> Result<GatewayReceipt, GatewayError>;

    /// Ask the gateway for the current state of a deposit
    async fn check_deposit(&self, external_id: &str) -> Result<GatewayStatus, GatewayError>;

    /// Cancel a deposit gateway-side
    async fn cancel_deposit(&self, external_id: &str) -> Result<(), GatewayError>;
}
