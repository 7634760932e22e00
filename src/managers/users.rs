use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::errors::{ShopError, ShopResult};
use super::{paginate, Page};
use crate::domain::repositories::UserRepository;
use crate::domain::user::User;

/// Manager for user accounts and balance arithmetic
pub struct UserManager {
    users: Arc<dyn UserRepository>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Returns the user behind a chat, registering them on first contact
    pub async fn get_or_register(&self, chat_id: i64) -> ShopResult<User> {
        if let Some(user) = self
            .users
            .find_by_chat_id(chat_id)
            .await
            .map_err(ShopError::Storage)?
        {
            return Ok(user);
        }

        let user = User::new(chat_id);
        self.users.save(&user).await.map_err(ShopError::Storage)?;
        tracing::info!(chat_id, user_id = %user.id(), "Registered new user");
        Ok(user)
    }

    /// Looks up a user by id
    pub async fn get(&self, user_id: Uuid) -> ShopResult<User> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(ShopError::Storage)?
            .ok_or(ShopError::UserNotFound(user_id))
    }

    /// Adds funds to a user's balance
    pub async fn credit(&self, user_id: Uuid, amount: Decimal) -> ShopResult<User> {
        let mut user = self.get(user_id).await?;
        user.credit(amount).map_err(ShopError::InvalidOperation)?;
        self.users.save(&user).await.map_err(ShopError::Storage)?;
        tracing::info!(user_id = %user_id, %amount, "Credited balance");
        Ok(user)
    }

    /// Removes funds from a user's balance
    ///
    /// Fails on insufficient funds or a non-positive amount, leaving
    /// the balance untouched.
    pub async fn debit(&self, user_id: Uuid, amount: Decimal) -> ShopResult<User> {
        let mut user = self.get(user_id).await?;
        user.debit(amount).map_err(ShopError::InvalidOperation)?;
        self.users.save(&user).await.map_err(ShopError::Storage)?;
        tracing::info!(user_id = %user_id, %amount, "Debited balance");
        Ok(user)
    }

    /// Blocks a user from the storefront
    pub async fn ban(&self, user_id: Uuid) -> ShopResult<User> {
        let mut user = self.get(user_id).await?;
        user.ban();
        self.users.save(&user).await.map_err(ShopError::Storage)?;
        tracing::warn!(user_id = %user_id, "Banned user");
        Ok(user)
    }

    /// Lifts a user's ban
    pub async fn unban(&self, user_id: Uuid) -> ShopResult<User> {
        let mut user = self.get(user_id).await?;
        user.unban();
        self.users.save(&user).await.map_err(ShopError::Storage)?;
        tracing::info!(user_id = %user_id, "Unbanned user");
        Ok(user)
    }

    /// Admin listing of all users, one page at a time
    pub async fn list_page(&self, page: usize, per_page: usize) -> ShopResult<Page<User>> {
        let users = self.users.find_all().await.map_err(ShopError::Storage)?;
        Ok(paginate(users, page, per_page))
    }
}
