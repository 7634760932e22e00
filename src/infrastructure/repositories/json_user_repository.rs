use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::repositories::UserRepository;
use crate::domain::user::User;
use crate::infrastructure::store::JsonStore;

/// Flat-file implementation of UserRepository
///
/// Lookups are linear scans over the collection held in the store's
/// cache; no referential integrity is enforced across files.
pub struct JsonUserRepository {
    store: Arc<JsonStore<User>>,
}

impl JsonUserRepository {
    pub fn new(store: Arc<JsonStore<User>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for JsonUserRepository {
    async fn save(&self, user: &User) -> Result<(), String> {
        self.store
            .upsert(user.clone(), |u| u.id())
            .await
            .map_err(|e| format!("Failed to save user: {}", e))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, String> {
        let users = self
            .store
            .load_all()
            .await
            .map_err(|e| format!("Failed to load users: {}", e))?;
        Ok(users.into_iter().find(|u| u.id() == id))
    }

    async fn find_by_chat_id(&self, chat_id: i64) -> Result<Option<User>, String> {
        let users = self
            .store
            .load_all()
            .await
            .map_err(|e| format!("Failed to load users: {}", e))?;
        Ok(users.into_iter().find(|u| u.chat_id() == chat_id))
    }

    async fn find_all(&self) -> Result<Vec<User>, String> {
        self.store
            .load_all()
            .await
            .map_err(|e| format!("Failed to load users: {}", e))
    }
}
