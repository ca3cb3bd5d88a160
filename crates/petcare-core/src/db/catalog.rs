//! Product and stock database operations.

use rusqlite::{params, Connection, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Product, ProductCategory};

impl Database {
    /// Add or update a product.
    pub fn upsert_product(&self, product: &Product) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO products (
                id, product_code, name, category, price, stock,
                reorder_level, branch_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                product_code = excluded.product_code,
                name = excluded.name,
                category = excluded.category,
                price = excluded.price,
                stock = excluded.stock,
                reorder_level = excluded.reorder_level,
                branch_id = excluded.branch_id
            "#,
            params![
                product.id,
                product.product_code,
                product.name,
                category_to_string(&product.category),
                product.price,
                product.stock,
                product.reorder_level,
                product.branch_id,
                product.created_at,
            ],
        )?;
        Ok(())
    }

    /// Get a product by ID.
    pub fn get_product(&self, id: &str) -> DbResult<Option<Product>> {
        get_product(&self.conn, id)
    }

    /// List products stocked at a branch.
    pub fn list_products_for_branch(&self, branch_id: &str) -> DbResult<Vec<Product>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE branch_id = ? ORDER BY name"
        ))?;
        let rows = stmt.query_map([branch_id], map_product_row)?;
        collect_products(rows)
    }

    /// List products at or below their reorder level at a branch.
    pub fn list_low_stock_products(&self, branch_id: &str) -> DbResult<Vec<Product>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE branch_id = ? AND stock <= reorder_level ORDER BY stock"
        ))?;
        let rows = stmt.query_map([branch_id], map_product_row)?;
        collect_products(rows)
    }
}

/// Get a product by ID on any connection (plain or transaction).
pub(crate) fn get_product(conn: &Connection, id: &str) -> DbResult<Option<Product>> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?"),
        [id],
        map_product_row,
    )
    .optional()
    .map_err(Into::into)
}

/// Units on hand for a product at a branch; `None` when the product is not
/// stocked there.
pub(crate) fn stock_on_hand(
    conn: &Connection,
    branch_id: &str,
    product_id: &str,
) -> DbResult<Option<i64>> {
    conn.query_row(
        "SELECT stock FROM products WHERE id = ? AND branch_id = ?",
        [product_id, branch_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}

/// Deduct units from a product's stock at a branch.
///
/// Returns `NotFound` when the product is not stocked at the branch. The
/// schema's CHECK constraint rejects a deduction that would go negative.
pub(crate) fn decrement_stock(
    conn: &Connection,
    branch_id: &str,
    product_id: &str,
    quantity: u32,
) -> DbResult<()> {
    let rows_affected = conn.execute(
        "UPDATE products SET stock = stock - ?1 WHERE id = ?2 AND branch_id = ?3",
        params![i64::from(quantity), product_id, branch_id],
    )?;
    if rows_affected == 0 {
        return Err(DbError::NotFound(format!(
            "Product {} at branch {}",
            product_id, branch_id
        )));
    }
    Ok(())
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, product_code, name, category, price, stock,
           reorder_level, branch_id, created_at
    FROM products
"#;

fn map_product_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    let category: String = row.get(3)?;
    Ok(Product {
        id: row.get(0)?,
        product_code: row.get(1)?,
        name: row.get(2)?,
        // Unknown categories degrade to Other rather than failing the read.
        category: string_to_category(&category).unwrap_or(ProductCategory::Other),
        price: row.get(4)?,
        stock: row.get(5)?,
        reorder_level: row.get(6)?,
        branch_id: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn collect_products(
    rows: rusqlite::MappedRows<'_, impl FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<Product>>,
) -> DbResult<Vec<Product>> {
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn category_to_string(category: &ProductCategory) -> &'static str {
    match category {
        ProductCategory::Food => "food",
        ProductCategory::Toy => "toy",
        ProductCategory::Accessory => "accessory",
        ProductCategory::Medication => "medication",
        ProductCategory::Other => "other",
    }
}

fn string_to_category(s: &str) -> Option<ProductCategory> {
    match s {
        "food" => Some(ProductCategory::Food),
        "toy" => Some(ProductCategory::Toy),
        "accessory" => Some(ProductCategory::Accessory),
        "medication" => Some(ProductCategory::Medication),
        "other" => Some(ProductCategory::Other),
        _ => None,
    }
}
