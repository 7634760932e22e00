use serde::{Deserialize, Serialize};

/// Represents the lifecycle status of an order
///
/// # Status Transitions
/// ```text
/// Pending -> Processing -> Completed
///     |           |
///     +-----------+-----> Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order is awaiting admin approval
    Pending,
    /// Order is approved and being fulfilled
    Processing,
    /// Order was delivered
    Completed,
    /// Order was cancelled or expired
    Cancelled,
}

impl OrderStatus {
    /// Checks if a transition from current status to next status is valid
    ///
    /// # Valid Transitions
    /// - Pending -> Processing
    /// - Pending -> Cancelled
    /// - Processing -> Completed
    /// - Processing -> Cancelled
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Pending, Cancelled)
                | (Processing, Completed)
                | (Processing, Cancelled)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Processing => write!(f, "processing"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Payment side of an order, tracked separately from delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Funds are reserved but the order is not yet approved
    Unpaid,
    /// Admin approved the order; the debit is final
    Paid,
    /// Funds were returned after cancellation
    Refunded,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Unpaid => write!(f, "unpaid"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Refunded => write!(f, "refunded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transition_pending_to_processing() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Processing));
    }

    #[test]
    fn valid_transition_pending_to_cancelled() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn valid_transition_processing_to_completed() {
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn valid_transition_processing_to_cancelled() {
        assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn invalid_transition_pending_to_completed() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn invalid_transition_completed_to_anything() {
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn invalid_transition_cancelled_to_anything() {
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Processing));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn status_display() {
        assert_eq!(OrderStatus::Pending.to_string(), "pending");
        assert_eq!(OrderStatus::Processing.to_string(), "processing");
        assert_eq!(OrderStatus::Completed.to_string(), "completed");
        assert_eq!(OrderStatus::Cancelled.to_string(), "cancelled");
        assert_eq!(PaymentStatus::Unpaid.to_string(), "unpaid");
        assert_eq!(PaymentStatus::Paid.to_string(), "paid");
        assert_eq!(PaymentStatus::Refunded.to_string(), "refunded");
    }
}
