//! Cart and order models.

use serde::{Deserialize, Serialize};

/// A line in a customer's shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product being bought
    pub product_id: String,
    /// Requested quantity (always >= 1)
    pub quantity: u32,
}

/// An in-memory shopping cart.
///
/// Carts are per-session UI state; they are never persisted. Checkout
/// consumes the cart and clears it on success.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a quantity of a product, merging with an existing line.
    pub fn add_item(&mut self, product_id: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(line) => line.quantity += quantity,
            None => self.items.push(CartItem {
                product_id: product_id.to_string(),
                quantity,
            }),
        }
    }

    /// Set the quantity of an existing line; zero removes the line.
    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(line) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            line.quantity = quantity;
        }
    }

    /// Remove a line entirely.
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// Drop all lines.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cart lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    /// Created but not yet confirmed
    Pending,
    /// Confirmed at checkout
    Confirmed,
    /// Handed to delivery
    Shipped,
    /// Received by the customer
    Delivered,
    /// Cancelled
    Cancelled,
}

/// A single line item on a placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Unique line ID
    pub id: String,
    /// Product sold
    pub item_id: String,
    /// Product name at time of sale
    pub item_name: String,
    /// Quantity sold (always >= 1)
    pub quantity: u32,
    /// Unit price at time of sale
    pub unit_price: f64,
    /// Line total (quantity x unit price)
    pub total: f64,
}

impl OrderItem {
    /// Create a line item, computing its total.
    pub fn new(item_id: String, item_name: String, quantity: u32, unit_price: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            item_id,
            item_name,
            quantity,
            unit_price,
            total: unit_price * f64::from(quantity),
        }
    }
}

/// A placed order. Immutable once created apart from its status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Unique order ID
    pub id: String,
    /// Buying customer
    pub customer_id: String,
    /// Line items
    pub items: Vec<OrderItem>,
    /// Pre-tax, pre-discount sum of line totals
    pub subtotal: f64,
    /// Tax charged on the subtotal
    pub tax: f64,
    /// Loyalty discount applied
    pub loyalty_discount: f64,
    /// Points earned by this order
    pub loyalty_points_applied: i64,
    /// Amount charged
    pub total: f64,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Creation timestamp
    pub created_at: String,
}
