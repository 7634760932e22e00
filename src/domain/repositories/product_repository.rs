use crate::domain::product::Product;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait for Product aggregate
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Save a product (insert or update)
    async fn save(&self, product: &Product) -> Result<(), String>;

    /// Find a product by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, String>;

    /// List all products, including disabled ones
    async fn find_all(&self) -> Result<Vec<Product>, String>;

    /// Delete a product by ID
    async fn delete(&self, id: Uuid) -> Result<(), String>;
}
