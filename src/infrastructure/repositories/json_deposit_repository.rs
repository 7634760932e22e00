use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::deposit::{Deposit, DepositStatus};
use crate::domain::repositories::DepositRepository;
use crate::infrastructure::store::JsonStore;

/// Flat-file implementation of DepositRepository
pub struct JsonDepositRepository {
    store: Arc<JsonStore<Deposit>>,
}

impl JsonDepositRepository {
    pub fn new(store: Arc<JsonStore<Deposit>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DepositRepository for JsonDepositRepository {
    async fn save(&self, deposit: &Deposit) -> Result<(), String> {
        self.store
            .upsert(deposit.clone(), |d| d.id())
            .await
            .map_err(|e| format!("Failed to save deposit: {}", e))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Deposit>, String> {
        let deposits = self
            .store
            .load_all()
            .await
            .map_err(|e| format!("Failed to load deposits: {}", e))?;
        Ok(deposits.into_iter().find(|d| d.id() == id))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Deposit>, String> {
        let deposits = self
            .store
            .load_all()
            .await
            .map_err(|e| format!("Failed to load deposits: {}", e))?;
        Ok(deposits
            .into_iter()
            .filter(|d| d.user_id() == user_id)
            .collect())
    }

    async fn find_by_status(&self, status: DepositStatus) -> Result<Vec<Deposit>, String> {
        let deposits = self
            .store
            .load_all()
            .await
            .map_err(|e| format!("Failed to load deposits: {}", e))?;
        Ok(deposits
            .into_iter()
            .filter(|d| d.status() == status)
            .collect())
    }
}
