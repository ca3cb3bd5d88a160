//! Transactional stock reservation.

use rusqlite::Connection;
use tracing::debug;

use crate::db::{self, Database, DbError};

use super::{CheckoutError, CheckoutResult};

/// One line of a stock reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRequest {
    /// Product to deduct
    pub product_id: String,
    /// Units to deduct
    pub quantity: u32,
}

/// Deduct stock for a confirmed sale, all lines or none.
///
/// Every line is validated against current stock before any deduction is
/// applied, and the whole operation runs inside one transaction: a failure
/// at any point rolls the database back to exactly its prior state. Stock
/// can therefore never go negative or be left partially deducted.
pub fn reserve_stock(
    db: &mut Database,
    branch_id: &str,
    items: &[StockRequest],
) -> CheckoutResult<()> {
    let tx = db.transaction()?;
    reserve_in_tx(&tx, branch_id, items)?;
    tx.commit().map_err(DbError::from)?;
    debug!(branch_id, lines = items.len(), "stock reserved");
    Ok(())
}

/// Reservation body, for composing into a larger transaction.
pub(crate) fn reserve_in_tx(
    conn: &Connection,
    branch_id: &str,
    items: &[StockRequest],
) -> CheckoutResult<()> {
    // Validate every line before touching any stock.
    for item in items {
        let available = db::stock_on_hand(conn, branch_id, &item.product_id)?.ok_or_else(|| {
            CheckoutError::NotFound(format!(
                "Product {} at branch {}",
                item.product_id, branch_id
            ))
        })?;
        if i64::from(item.quantity) > available {
            return Err(CheckoutError::InsufficientStock {
                product_id: item.product_id.clone(),
                requested: item.quantity,
                available,
            });
        }
    }

    for item in items {
        db::decrement_stock(conn, branch_id, &item.product_id, item.quantity)?;
    }
    Ok(())
}
