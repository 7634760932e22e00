use rust_decimal::Decimal;
use uuid::Uuid;

/// Domain events that occur within the Order aggregate
///
/// Used for logging and for notifying admins about orders that need
/// review.
#[derive(Debug, Clone)]
pub enum OrderEvent {
    /// Fired when a user places an order
    Placed {
        order_id: Uuid,
        user_id: Uuid,
        product_id: Uuid,
        amount: Decimal,
    },
    /// Fired when an admin approves a pending order
    Approved { order_id: Uuid },
    /// Fired when a processing order is delivered
    Completed { order_id: Uuid },
    /// Fired when an order is cancelled or expires
    Cancelled { order_id: Uuid, reason: String },
}

impl OrderEvent {
    /// Returns the order_id for this event
    pub fn order_id(&self) -> Uuid {
        match self {
            OrderEvent::Placed { order_id, .. } => *order_id,
            OrderEvent::Approved { order_id } => *order_id,
            OrderEvent::Completed { order_id } => *order_id,
            OrderEvent::Cancelled { order_id, .. } => *order_id,
        }
    }
}
