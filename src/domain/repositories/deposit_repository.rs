use crate::domain::deposit::{Deposit, DepositStatus};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait for Deposit aggregate
#[async_trait]
pub trait DepositRepository: Send + Sync {
    /// Save a deposit (insert or update)
    async fn save(&self, deposit: &Deposit) -> Result<(), String>;

    /// Find a deposit by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Deposit>, String>;

    /// Find all deposits opened by a user
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Deposit>, String>;

    /// Find all deposits in a given status
    async fn find_by_status(&self, status: DepositStatus) -> Result<Vec<Deposit>, String>;
}
