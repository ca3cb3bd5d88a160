//! Product catalog models.

use serde::{Deserialize, Serialize};

/// Shop category for a product.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProductCategory {
    /// Pet food
    Food,
    /// Toys
    Toy,
    /// Collars, leashes, bedding, etc.
    Accessory,
    /// Over-the-counter medication
    Medication,
    /// Everything else
    Other,
}

/// A sellable product with branch-local stock.
///
/// Stock lives on the product row keyed by branch: one row per
/// (branch, product code) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product ID
    pub id: String,
    /// Merchant-facing product code
    pub product_code: String,
    /// Display name
    pub name: String,
    /// Shop category
    pub category: ProductCategory,
    /// Unit price in currency units
    pub price: f64,
    /// Units on hand at this branch (never negative)
    pub stock: i64,
    /// Stock level at which the pharmacist is prompted to reorder
    pub reorder_level: i64,
    /// Branch this stock belongs to
    pub branch_id: String,
    /// Creation timestamp
    pub created_at: String,
}

impl Product {
    /// Create a new product with required fields.
    pub fn new(product_code: String, name: String, price: f64, branch_id: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            product_code,
            name,
            category: ProductCategory::Other,
            price,
            stock: 0,
            reorder_level: 0,
            branch_id,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Whether stock has fallen to or below the reorder level.
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.reorder_level
    }
}
