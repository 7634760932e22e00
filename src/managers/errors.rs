use crate::domain::gateway::GatewayError;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur in the storefront managers
///
/// Every failure is reported back to the transport as a value; nothing
/// here is fatal to the process.
#[derive(Debug, Error)]
pub enum ShopError {
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("Deposit not found: {0}")]
    DepositNotFound(Uuid),

    #[error("User is banned")]
    UserBanned,

    #[error("Product is unavailable: {0}")]
    ProductUnavailable(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Payment gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

pub type ShopResult<T> = Result<T, ShopError>;
