use super::events::OrderEvent;
use super::value_objects::{OrderStatus, PaymentStatus};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order aggregate root
///
/// A purchase request linking a user to a product. Delivery status and
/// payment status move as a pair: approval marks the order paid, a
/// cancellation of a paid order marks it refunded.
///
/// # Invariants
/// - Amount must be positive
/// - Status transitions follow the defined rules
/// - A pending order expires after its TTL and is cancelled exactly once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: Uuid,
    user_id: Uuid,
    product_id: Uuid,
    status: OrderStatus,
    payment_status: PaymentStatus,
    amount: Decimal,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new pending, unpaid order
    ///
    /// # Arguments
    /// * `user_id` - The buyer
    /// * `product_id` - The purchased product
    /// * `amount` - The price charged (must be positive)
    /// * `ttl_minutes` - Minutes until an unapproved order expires
    pub fn new(
        user_id: Uuid,
        product_id: Uuid,
        amount: Decimal,
        ttl_minutes: i64,
    ) -> Result<(Self, Vec<OrderEvent>), String> {
        if amount <= Decimal::ZERO {
            return Err("Order amount must be positive".to_string());
        }

        let now = Utc::now();
        let order = Self {
            id: Uuid::new_v4(),
            user_id,
            product_id,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            amount,
            created_at: now,
            expires_at: now + Duration::minutes(ttl_minutes),
        };

        let events = vec![OrderEvent::Placed {
            order_id: order.id,
            user_id,
            product_id,
            amount,
        }];

        Ok((order, events))
    }

    /// Admin approval: Pending -> Processing, payment becomes Paid
    pub fn approve(&mut self) -> Result<OrderEvent, String> {
        let next = OrderStatus::Processing;
        if !self.status.can_transition_to(next) {
            return Err(format!("Cannot approve order in {} status", self.status));
        }

        self.status = next;
        self.payment_status = PaymentStatus::Paid;

        Ok(OrderEvent::Approved { order_id: self.id })
    }

    /// Delivery: Processing -> Completed
    pub fn complete(&mut self) -> Result<OrderEvent, String> {
        let next = OrderStatus::Completed;
        if !self.status.can_transition_to(next) {
            return Err(format!("Cannot complete order in {} status", self.status));
        }

        self.status = next;

        Ok(OrderEvent::Completed { order_id: self.id })
    }

    /// Cancellation from Pending or Processing
    ///
    /// Marks a paid order refunded. Crediting the funds back is the
    /// caller's responsibility; the aggregate only records the state.
    pub fn cancel(&mut self, reason: String) -> Result<OrderEvent, String> {
        let next = OrderStatus::Cancelled;
        if !self.status.can_transition_to(next) {
            return Err(format!("Cannot cancel order in {} status", self.status));
        }

        self.status = next;
        if self.payment_status == PaymentStatus::Paid {
            self.payment_status = PaymentStatus::Refunded;
        }

        Ok(OrderEvent::Cancelled {
            order_id: self.id,
            reason,
        })
    }

    /// True for a pending order whose TTL has elapsed
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == OrderStatus::Pending && now > self.expires_at
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn product_id(&self) -> Uuid {
        self.product_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}
