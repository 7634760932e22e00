use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::errors::{ShopError, ShopResult};
use crate::domain::order::{Order, OrderStatus};
use crate::domain::repositories::{OrderRepository, ProductRepository, UserRepository};

/// Manager for the order lifecycle
///
/// Placement runs as sequential, unguarded steps over the flat files:
/// debit the balance, decrement the stock, create the order. No
/// transaction spans them; a crash between saves leaves the files as
/// they are.
pub struct OrderManager {
    orders: Arc<dyn OrderRepository>,
    users: Arc<dyn UserRepository>,
    products: Arc<dyn ProductRepository>,
    order_ttl_minutes: i64,
}

impl OrderManager {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        users: Arc<dyn UserRepository>,
        products: Arc<dyn ProductRepository>,
        order_ttl_minutes: i64,
    ) -> Self {
        Self {
            orders,
            users,
            products,
            order_ttl_minutes,
        }
    }

    /// Places an order: debit balance, take stock, create pending order
    pub async fn place(&self, user_id: Uuid, product_id: Uuid) -> ShopResult<Order> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(ShopError::Storage)?
            .ok_or(ShopError::UserNotFound(user_id))?;
        if !user.is_active() {
            return Err(ShopError::UserBanned);
        }

        let mut product = self
            .products
            .find_by_id(product_id)
            .await
            .map_err(ShopError::Storage)?
            .ok_or(ShopError::ProductNotFound(product_id))?;
        if !product.is_available() {
            return Err(ShopError::ProductUnavailable(product.name().to_string()));
        }

        user.debit(product.price())
            .map_err(ShopError::InvalidOperation)?;
        self.users.save(&user).await.map_err(ShopError::Storage)?;

        product.take_one().map_err(ShopError::InvalidOperation)?;
        self.products
            .save(&product)
            .await
            .map_err(ShopError::Storage)?;

        let (order, events) = Order::new(
            user_id,
            product_id,
            product.price(),
            self.order_ttl_minutes,
        )
        .map_err(ShopError::InvalidOperation)?;
        self.orders.save(&order).await.map_err(ShopError::Storage)?;

        for event in &events {
            tracing::info!(?event, "Order placed");
        }
        Ok(order)
    }

    /// Looks up an order by id
    pub async fn get(&self, order_id: Uuid) -> ShopResult<Order> {
        self.orders
            .find_by_id(order_id)
            .await
            .map_err(ShopError::Storage)?
            .ok_or(ShopError::OrderNotFound(order_id))
    }

    /// Admin approval: pending -> processing, payment becomes paid
    pub async fn approve(&self, order_id: Uuid) -> ShopResult<Order> {
        let mut order = self.get(order_id).await?;
        let event = order.approve().map_err(ShopError::InvalidOperation)?;
        self.orders.save(&order).await.map_err(ShopError::Storage)?;
        tracing::info!(?event, "Order approved");
        Ok(order)
    }

    /// Delivery: processing -> completed, returns the deliverable file ids
    pub async fn complete(&self, order_id: Uuid) -> ShopResult<Vec<String>> {
        let mut order = self.get(order_id).await?;
        let event = order.complete().map_err(ShopError::InvalidOperation)?;
        self.orders.save(&order).await.map_err(ShopError::Storage)?;
        tracing::info!(?event, "Order completed");

        // The product may have been deleted since; deliver what exists.
        let files = self
            .products
            .find_by_id(order.product_id())
            .await
            .map_err(ShopError::Storage)?
            .map(|p| p.files().to_vec())
            .unwrap_or_default();
        Ok(files)
    }

    /// Cancels an order, refunds the debit and returns the stock unit
    pub async fn cancel(&self, order_id: Uuid, reason: &str) -> ShopResult<Order> {
        let mut order = self.get(order_id).await?;
        let event = order
            .cancel(reason.to_string())
            .map_err(ShopError::InvalidOperation)?;
        self.orders.save(&order).await.map_err(ShopError::Storage)?;

        // Funds were debited at placement, so every cancellation pays
        // them back, whether or not the order had been approved.
        match self
            .users
            .find_by_id(order.user_id())
            .await
            .map_err(ShopError::Storage)?
        {
            Some(mut user) => {
                user.refund(order.amount())
                    .map_err(ShopError::InvalidOperation)?;
                self.users.save(&user).await.map_err(ShopError::Storage)?;
            }
            None => {
                tracing::warn!(order_id = %order_id, "Cancelled order for missing user, refund skipped");
            }
        }

        if let Some(mut product) = self
            .products
            .find_by_id(order.product_id())
            .await
            .map_err(ShopError::Storage)?
        {
            product.restock_one();
            self.products
                .save(&product)
                .await
                .map_err(ShopError::Storage)?;
        }

        tracing::info!(?event, "Order cancelled");
        Ok(order)
    }

    /// All orders a user has placed
    pub async fn list_for_user(&self, user_id: Uuid) -> ShopResult<Vec<Order>> {
        self.orders
            .find_by_user(user_id)
            .await
            .map_err(ShopError::Storage)
    }

    /// Orders awaiting admin review
    pub async fn list_pending(&self) -> ShopResult<Vec<Order>> {
        self.orders
            .find_by_status(OrderStatus::Pending)
            .await
            .map_err(ShopError::Storage)
    }

    /// Cancels every pending order past its expiry, exactly once each
    ///
    /// Returns how many orders the sweep retired.
    pub async fn expire_pending(&self) -> ShopResult<usize> {
        let now = Utc::now();
        let pending = self
            .orders
            .find_by_status(OrderStatus::Pending)
            .await
            .map_err(ShopError::Storage)?;

        let mut expired = 0;
        for order in pending {
            if !order.is_expired(now) {
                continue;
            }
            match self.cancel(order.id(), "expired").await {
                Ok(_) => expired += 1,
                // Log and keep sweeping; the order stays for the next pass.
                Err(e) => tracing::error!(order_id = %order.id(), error = %e, "Failed to expire order"),
            }
        }
        Ok(expired)
    }
}
