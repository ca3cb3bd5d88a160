//! Order database operations.

use rusqlite::{params, Connection, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Order, OrderItem, OrderStatus};

impl Database {
    /// Insert a new order.
    pub fn insert_order(&self, order: &Order) -> DbResult<()> {
        insert_order(&self.conn, order)
    }

    /// Get an order by ID.
    pub fn get_order(&self, id: &str) -> DbResult<Option<Order>> {
        self.conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?"),
                [id],
                OrderRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List a customer's orders, newest first.
    pub fn list_orders_for_customer(&self, customer_id: &str) -> DbResult<Vec<Order>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE customer_id = ? ORDER BY created_at DESC"
        ))?;

        let rows = stmt.query_map([customer_id], OrderRow::from_row)?;

        let mut orders = Vec::new();
        for row in rows {
            orders.push(row?.try_into()?);
        }
        Ok(orders)
    }
}

/// Insert a new order on any connection (plain or transaction).
pub(crate) fn insert_order(conn: &Connection, order: &Order) -> DbResult<()> {
    let items_json = serde_json::to_string(&order.items)?;

    conn.execute(
        r#"
        INSERT INTO orders (
            id, customer_id, items, subtotal, tax, loyalty_discount,
            loyalty_points_applied, total, status, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
        params![
            order.id,
            order.customer_id,
            items_json,
            order.subtotal,
            order.tax,
            order.loyalty_discount,
            order.loyalty_points_applied,
            order.total,
            status_to_string(&order.status),
            order.created_at,
        ],
    )?;
    Ok(())
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, customer_id, items, subtotal, tax, loyalty_discount,
           loyalty_points_applied, total, status, created_at
    FROM orders
"#;

/// Intermediate row struct for database mapping.
struct OrderRow {
    id: String,
    customer_id: String,
    items: String,
    subtotal: f64,
    tax: f64,
    loyalty_discount: f64,
    loyalty_points_applied: i64,
    total: f64,
    status: String,
    created_at: String,
}

impl OrderRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            customer_id: row.get(1)?,
            items: row.get(2)?,
            subtotal: row.get(3)?,
            tax: row.get(4)?,
            loyalty_discount: row.get(5)?,
            loyalty_points_applied: row.get(6)?,
            total: row.get(7)?,
            status: row.get(8)?,
            created_at: row.get(9)?,
        })
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = DbError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let items: Vec<OrderItem> = serde_json::from_str(&row.items)?;

        Ok(Order {
            id: row.id,
            customer_id: row.customer_id,
            items,
            subtotal: row.subtotal,
            tax: row.tax,
            loyalty_discount: row.loyalty_discount,
            loyalty_points_applied: row.loyalty_points_applied,
            total: row.total,
            status: string_to_status(&row.status)?,
            created_at: row.created_at,
        })
    }
}

fn status_to_string(status: &OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "pending",
        OrderStatus::Confirmed => "confirmed",
        OrderStatus::Shipped => "shipped",
        OrderStatus::Delivered => "delivered",
        OrderStatus::Cancelled => "cancelled",
    }
}

fn string_to_status(s: &str) -> Result<OrderStatus, DbError> {
    match s {
        "pending" => Ok(OrderStatus::Pending),
        "confirmed" => Ok(OrderStatus::Confirmed),
        "shipped" => Ok(OrderStatus::Shipped),
        "delivered" => Ok(OrderStatus::Delivered),
        "cancelled" => Ok(OrderStatus::Cancelled),
        _ => Err(DbError::Constraint(format!("Unknown order status: {}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_order(customer_id: &str) -> Order {
        let item = OrderItem::new("prod-1".into(), "Dry food 2kg".into(), 2, 250_000.0);
        Order {
            id: uuid::Uuid::new_v4().to_string(),
            customer_id: customer_id.into(),
            items: vec![item],
            subtotal: 500_000.0,
            tax: 50_000.0,
            loyalty_discount: 25_000.0,
            loyalty_points_applied: 10,
            total: 525_000.0,
            status: OrderStatus::Confirmed,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();

        let order = make_order("cust-1");
        db.insert_order(&order).unwrap();

        let retrieved = db.get_order(&order.id).unwrap().unwrap();
        assert_eq!(retrieved, order);
        assert_eq!(retrieved.items.len(), 1);
        assert_eq!(retrieved.items[0].item_name, "Dry food 2kg");
    }

    #[test]
    fn test_list_for_customer() {
        let db = setup_db();

        db.insert_order(&make_order("cust-1")).unwrap();
        db.insert_order(&make_order("cust-1")).unwrap();
        db.insert_order(&make_order("cust-2")).unwrap();

        let orders = db.list_orders_for_customer("cust-1").unwrap();
        assert_eq!(orders.len(), 2);
    }
}
