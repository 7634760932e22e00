use crate::domain::order::{Order, OrderStatus};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait for Order aggregate
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Save an order (insert or update)
    async fn save(&self, order: &Order) -> Result<(), String>;

    /// Find an order by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, String>;

    /// Find all orders placed by a user
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, String>;

    /// Find all orders in a given status
    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, String>;
}
