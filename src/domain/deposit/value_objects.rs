use serde::{Deserialize, Serialize};

/// How a deposit gets confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositMethod {
    /// Transfer confirmed by an admin reviewing an uploaded proof
    Manual,
    /// Gateway-mediated QR-code deposit polled for completion
    Auto,
}

impl std::fmt::Display for DepositMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepositMethod::Manual => write!(f, "manual"),
            DepositMethod::Auto => write!(f, "auto"),
        }
    }
}

/// Represents the lifecycle status of a deposit
///
/// # Status Transitions
/// ```text
/// Pending -> Completed
///     |----> Rejected
///     |----> Expired
///     +----> Cancelled
/// ```
///
/// All four outcomes are terminal; Pending is the only live state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositStatus {
    /// Deposit is awaiting confirmation
    Pending,
    /// Funds were credited to the user
    Completed,
    /// Admin rejected the uploaded proof
    Rejected,
    /// Deposit passed its expiry without confirmation
    Expired,
    /// User abandoned the deposit
    Cancelled,
}

impl DepositStatus {
    /// Checks if a transition from current status to next status is valid
    pub fn can_transition_to(&self, next: DepositStatus) -> bool {
        use DepositStatus::*;
        matches!(
            (self, next),
            (Pending, Completed) | (Pending, Rejected) | (Pending, Expired) | (Pending, Cancelled)
        )
    }

    /// True while the deposit can still change state
    pub fn is_pending(&self) -> bool {
        *self == DepositStatus::Pending
    }
}

impl std::fmt::Display for DepositStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepositStatus::Pending => write!(f, "pending"),
            DepositStatus::Completed => write!(f, "completed"),
            DepositStatus::Rejected => write!(f, "rejected"),
            DepositStatus::Expired => write!(f, "expired"),
            DepositStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}
