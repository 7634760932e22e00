use crate::domain::user::User;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait for User aggregate
///
/// Defines the contract for persisting and retrieving users.
/// Implementations should handle storage-specific details.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Save a user (insert or update)
    async fn save(&self, user: &User) -> Result<(), String>;

    /// Find a user by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, String>;

    /// Find a user by the chat id of their conversation
    async fn find_by_chat_id(&self, chat_id: i64) -> Result<Option<User>, String>;

    /// List all users
    async fn find_all(&self) -> Result<Vec<User>, String>;
}
