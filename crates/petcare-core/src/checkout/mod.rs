//! Order checkout.
//!
//! Pipeline: cart → pricing → one transaction (order + stock + loyalty)

mod pricing;
mod inventory;

pub use pricing::*;
pub use inventory::*;

use thiserror::Error;
use tracing::{debug, warn};

use crate::db::{self, Database, DbError};
use crate::models::{Cart, LoyaltyAccount, LoyaltyTier, Order, OrderItem, OrderStatus};

/// Checkout errors.
#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Missing required field: {0}")]
    Validation(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: i64,
    },
}

pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Confirmation returned to the UI after a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    /// The persisted order
    pub order: Order,
    /// Points this order earned
    pub points_earned: i64,
    /// The customer's tier after the order (possibly upgraded)
    pub tier: LoyaltyTier,
}

/// Checkout desk coordinating pricing, stock, and loyalty.
pub struct CheckoutDesk<'a> {
    db: &'a mut Database,
}

impl<'a> CheckoutDesk<'a> {
    /// Create a checkout desk.
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    /// Price a cart without side effects (the order-summary view).
    pub fn preview(&self, customer_id: &str, cart: &Cart) -> CheckoutResult<OrderTotals> {
        let items = self.resolve_items(cart)?;
        let account = self.db.get_loyalty_for_customer(customer_id)?;
        Ok(price_cart(&items, account.as_ref()))
    }

    /// Place an order from the cart.
    ///
    /// Prices against the customer's loyalty account as it stood before
    /// the order (no account, no discount), then persists the order,
    /// deducts stock, and accrues loyalty in a single transaction. The
    /// account is created lazily on a customer's first checkout. The cart
    /// is cleared only after the transaction commits.
    pub fn checkout(
        &mut self,
        customer_id: &str,
        branch_id: &str,
        cart: &mut Cart,
    ) -> CheckoutResult<CheckoutReceipt> {
        if customer_id.is_empty() {
            return Err(CheckoutError::Validation("customer is required"));
        }
        if cart.is_empty() {
            return Err(CheckoutError::Validation("cart is empty"));
        }

        let items = self.resolve_items(cart)?;
        let existing_account = self.db.get_loyalty_for_customer(customer_id)?;
        let totals = price_cart(&items, existing_account.as_ref());

        let order = Order {
            id: uuid::Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            items,
            subtotal: totals.subtotal,
            tax: totals.tax,
            loyalty_discount: totals.loyalty_discount,
            loyalty_points_applied: totals.points_earned,
            total: totals.total,
            status: OrderStatus::Confirmed,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        let requests: Vec<StockRequest> = cart
            .items()
            .iter()
            .map(|line| StockRequest {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
            })
            .collect();

        let mut account =
            existing_account.unwrap_or_else(|| LoyaltyAccount::new(customer_id.to_string()));
        account.record_spend(totals.total, totals.points_earned);

        let tx = self.db.transaction()?;
        db::insert_order(&tx, &order)?;
        reserve_in_tx(&tx, branch_id, &requests)?;
        db::save_loyalty_account(&tx, &account)?;
        tx.commit().map_err(DbError::from)?;

        cart.clear();
        debug!(order_id = %order.id, total = order.total, "checkout complete");

        // Best-effort reorder warning; a failed read here must not fail a
        // committed checkout.
        for item in &order.items {
            match db::get_product(self.db.conn(), &item.item_id) {
                Ok(Some(product)) if product.is_low_stock() => {
                    warn!(
                        product_code = %product.product_code,
                        stock = product.stock,
                        reorder_level = product.reorder_level,
                        "stock at or below reorder level"
                    );
                }
                Ok(_) => {}
                Err(e) => warn!(product_id = %item.item_id, error = %e, "reorder check skipped"),
            }
        }

        Ok(CheckoutReceipt {
            order,
            points_earned: totals.points_earned,
            tier: account.tier,
        })
    }

    /// Resolve cart lines into priced order items.
    fn resolve_items(&self, cart: &Cart) -> CheckoutResult<Vec<OrderItem>> {
        let mut items = Vec::with_capacity(cart.items().len());
        for line in cart.items() {
            let product = self
                .db
                .get_product(&line.product_id)?
                .ok_or_else(|| CheckoutError::NotFound(format!("Product {}", line.product_id)))?;
            items.push(OrderItem::new(
                product.id,
                product.name,
                line.quantity,
                product.price,
            ));
        }
        Ok(items)
    }
}
