use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product aggregate root
///
/// A digital product sold through the storefront. Deliverables are opaque
/// file ids handed to the buyer on completion.
///
/// # Invariants
/// - Name cannot be empty
/// - Price must be positive
/// - Stock (when limited) only decrements while available
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    id: Uuid,
    name: String,
    price: Decimal,
    /// `None` means unlimited stock
    stock: Option<u32>,
    files: Vec<String>,
    enabled: bool,
    created_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new enabled product
    ///
    /// # Business Rules Enforced
    /// - Name must not be empty
    /// - Price must be positive
    pub fn new(name: String, price: Decimal, stock: Option<u32>) -> Result<Self, String> {
        if name.trim().is_empty() {
            return Err("Product name cannot be empty".to_string());
        }
        if price <= Decimal::ZERO {
            return Err("Product price must be positive".to_string());
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            price,
            stock,
            files: Vec::new(),
            enabled: true,
            created_at: Utc::now(),
        })
    }

    /// True when the product can be purchased right now
    pub fn is_available(&self) -> bool {
        self.enabled && self.stock.map_or(true, |s| s > 0)
    }

    /// Consumes one unit of stock
    ///
    /// # Business Rules
    /// - Product must be enabled and in stock
    pub fn take_one(&mut self) -> Result<(), String> {
        if !self.enabled {
            return Err("Product is disabled".to_string());
        }
        match self.stock {
            Some(0) => Err("Product is out of stock".to_string()),
            Some(n) => {
                self.stock = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Returns one unit of stock after a cancelled order
    pub fn restock_one(&mut self) {
        if let Some(n) = self.stock {
            self.stock = Some(n + 1);
        }
    }

    /// Replaces the stock counter
    pub fn set_stock(&mut self, stock: Option<u32>) {
        self.stock = stock;
    }

    /// Replaces the price
    pub fn set_price(&mut self, price: Decimal) -> Result<(), String> {
        if price <= Decimal::ZERO {
            return Err("Product price must be positive".to_string());
        }
        self.price = price;
        Ok(())
    }

    /// Attaches a deliverable file id
    pub fn add_file(&mut self, file_id: String) {
        self.files.push(file_id);
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn stock(&self) -> Option<u32> {
        self.stock
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
