use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::product::Product;
use crate::domain::repositories::ProductRepository;
use crate::infrastructure::store::JsonStore;

/// Flat-file implementation of ProductRepository
pub struct JsonProductRepository {
    store: Arc<JsonStore<Product>>,
}

impl JsonProductRepository {
    pub fn new(store: Arc<JsonStore<Product>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProductRepository for JsonProductRepository {
    async fn save(&self, product: &Product) -> Result<(), String> {
        self.store
            .upsert(product.clone(), |p| p.id())
            .await
            .map_err(|e| format!("Failed to save product: {}", e))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, String> {
        let products = self
            .store
            .load_all()
            .await
            .map_err(|e| format!("Failed to load products: {}", e))?;
        Ok(products.into_iter().find(|p| p.id() == id))
    }

    async fn find_all(&self) -> Result<Vec<Product>, String> {
        self.store
            .load_all()
            .await
            .map_err(|e| format!("Failed to load products: {}", e))
    }

    async fn delete(&self, id: Uuid) -> Result<(), String> {
        self.store
            .remove(|p| p.id() == id)
            .await
            .map_err(|e| format!("Failed to delete product: {}", e))
    }
}
