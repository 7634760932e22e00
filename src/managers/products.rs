use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use super::errors::{ShopError, ShopResult};
use super::{paginate, Page};
use crate::domain::product::Product;
use crate::domain::repositories::ProductRepository;

/// Manager for the product catalog
pub struct ProductManager {
    products: Arc<dyn ProductRepository>,
}

impl ProductManager {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    /// Adds a product to the catalog
    pub async fn create(
        &self,
        name: String,
        price: Decimal,
        stock: Option<u32>,
    ) -> ShopResult<Product> {
        let product = Product::new(name, price, stock).map_err(ShopError::InvalidOperation)?;
        self.products
            .save(&product)
            .await
            .map_err(ShopError::Storage)?;
        tracing::info!(product_id = %product.id(), name = product.name(), "Created product");
        Ok(product)
    }

    /// Looks up a product by id
    pub async fn get(&self, product_id: Uuid) -> ShopResult<Product> {
        self.products
            .find_by_id(product_id)
            .await
            .map_err(ShopError::Storage)?
            .ok_or(ShopError::ProductNotFound(product_id))
    }

    /// One page of the purchasable catalog (enabled and in stock)
    pub async fn catalog_page(&self, page: usize, per_page: usize) -> ShopResult<Page<Product>> {
        let products = self
            .products
            .find_all()
            .await
            .map_err(ShopError::Storage)?;
        let available: Vec<Product> = products.into_iter().filter(|p| p.is_available()).collect();
        Ok(paginate(available, page, per_page))
    }

    /// Changes a product's price
    pub async fn set_price(&self, product_id: Uuid, price: Decimal) -> ShopResult<Product> {
        let mut product = self.get(product_id).await?;
        product.set_price(price).map_err(ShopError::InvalidOperation)?;
        self.products
            .save(&product)
            .await
            .map_err(ShopError::Storage)?;
        Ok(product)
    }

    /// Replaces a product's stock counter
    pub async fn set_stock(&self, product_id: Uuid, stock: Option<u32>) -> ShopResult<Product> {
        let mut product = self.get(product_id).await?;
        product.set_stock(stock);
        self.products
            .save(&product)
            .await
            .map_err(ShopError::Storage)?;
        Ok(product)
    }

    /// Attaches a deliverable file id to a product
    pub async fn add_file(&self, product_id: Uuid, file_id: String) -> ShopResult<Product> {
        let mut product = self.get(product_id).await?;
        product.add_file(file_id);
        self.products
            .save(&product)
            .await
            .map_err(ShopError::Storage)?;
        Ok(product)
    }

    /// Shows or hides a product in the catalog
    pub async fn set_enabled(&self, product_id: Uuid, enabled: bool) -> ShopResult<Product> {
        let mut product = self.get(product_id).await?;
        if enabled {
            product.enable();
        } else {
            product.disable();
        }
        self.products
            .save(&product)
            .await
            .map_err(ShopError::Storage)?;
        Ok(product)
    }

    /// Removes a product from the catalog entirely
    pub async fn delete(&self, product_id: Uuid) -> ShopResult<()> {
        // Existing orders keep the dangling product id; there is no
        // referential integrity across collection files.
        self.get(product_id).await?;
        self.products
            .delete(product_id)
            .await
            .map_err(ShopError::Storage)?;
        tracing::info!(product_id = %product_id, "Deleted product");
        Ok(())
    }
}
