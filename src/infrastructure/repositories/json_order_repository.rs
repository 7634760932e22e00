use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::order::{Order, OrderStatus};
use crate::domain::repositories::OrderRepository;
use crate::infrastructure::store::JsonStore;

/// Flat-file implementation of OrderRepository
pub struct JsonOrderRepository {
    store: Arc<JsonStore<Order>>,
}

impl JsonOrderRepository {
    pub fn new(store: Arc<JsonStore<Order>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl OrderRepository for JsonOrderRepository {
    async fn save(&self, order: &Order) -> Result<(), String> {
        self.store
            .upsert(order.clone(), |o| o.id())
            .await
            .map_err(|e| format!("Failed to save order: {}", e))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, String> {
        let orders = self
            .store
            .load_all()
            .await
            .map_err(|e| format!("Failed to load orders: {}", e))?;
        Ok(orders.into_iter().find(|o| o.id() == id))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, String> {
        let orders = self
            .store
            .load_all()
            .await
            .map_err(|e| format!("Failed to load orders: {}", e))?;
        Ok(orders.into_iter().filter(|o| o.user_id() == user_id).collect())
    }

    async fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, String> {
        let orders = self
            .store
            .load_all()
            .await
            .map_err(|e| format!("Failed to load orders: {}", e))?;
        Ok(orders.into_iter().filter(|o| o.status() == status).collect())
    }
}
