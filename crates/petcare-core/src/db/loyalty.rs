//! Loyalty account database operations.

use rusqlite::{params, Connection, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{LoyaltyAccount, LoyaltyTier};

impl Database {
    /// Get a customer's loyalty account, if one exists.
    pub fn get_loyalty_for_customer(&self, customer_id: &str) -> DbResult<Option<LoyaltyAccount>> {
        get_loyalty_for_customer(&self.conn, customer_id)
    }

    /// Insert or update a loyalty account (keyed by customer).
    pub fn save_loyalty_account(&self, account: &LoyaltyAccount) -> DbResult<()> {
        save_loyalty_account(&self.conn, account)
    }
}

/// Get a customer's loyalty account on any connection.
pub(crate) fn get_loyalty_for_customer(
    conn: &Connection,
    customer_id: &str,
) -> DbResult<Option<LoyaltyAccount>> {
    conn.query_row(
        r#"
        SELECT id, customer_id, points, tier, total_spent, created_at, updated_at
        FROM loyalty_accounts
        WHERE customer_id = ?
        "#,
        [customer_id],
        |row| {
            Ok(LoyaltyRow {
                id: row.get(0)?,
                customer_id: row.get(1)?,
                points: row.get(2)?,
                tier: row.get(3)?,
                total_spent: row.get(4)?,
                created_at: row.get(5)?,
                updated_at: row.get(6)?,
            })
        },
    )
    .optional()?
    .map(|row| row.try_into())
    .transpose()
}

/// Insert or update a loyalty account on any connection.
pub(crate) fn save_loyalty_account(conn: &Connection, account: &LoyaltyAccount) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO loyalty_accounts (
            id, customer_id, points, tier, total_spent, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(customer_id) DO UPDATE SET
            points = excluded.points,
            tier = excluded.tier,
            total_spent = excluded.total_spent,
            updated_at = excluded.updated_at
        "#,
        params![
            account.id,
            account.customer_id,
            account.points,
            tier_to_string(&account.tier),
            account.total_spent,
            account.created_at,
            account.updated_at,
        ],
    )?;
    Ok(())
}

/// Intermediate row struct for database mapping.
struct LoyaltyRow {
    id: String,
    customer_id: String,
    points: i64,
    tier: String,
    total_spent: f64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<LoyaltyRow> for LoyaltyAccount {
    type Error = DbError;

    fn try_from(row: LoyaltyRow) -> Result<Self, Self::Error> {
        Ok(LoyaltyAccount {
            id: row.id,
            customer_id: row.customer_id,
            points: row.points,
            tier: string_to_tier(&row.tier)?,
            total_spent: row.total_spent,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn tier_to_string(tier: &LoyaltyTier) -> &'static str {
    match tier {
        LoyaltyTier::Bronze => "bronze",
        LoyaltyTier::Silver => "silver",
        LoyaltyTier::Gold => "gold",
    }
}

fn string_to_tier(s: &str) -> Result<LoyaltyTier, DbError> {
    match s {
        "bronze" => Ok(LoyaltyTier::Bronze),
        "silver" => Ok(LoyaltyTier::Silver),
        "gold" => Ok(LoyaltyTier::Gold),
        _ => Err(DbError::Constraint(format!("Unknown loyalty tier: {}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_save_and_get() {
        let db = setup_db();

        let mut account = LoyaltyAccount::new("cust-1".into());
        account.points = 40;
        account.total_spent = 2_000_000.0;
        db.save_loyalty_account(&account).unwrap();

        let retrieved = db.get_loyalty_for_customer("cust-1").unwrap().unwrap();
        assert_eq!(retrieved, account);
    }

    #[test]
    fn test_missing_account() {
        let db = setup_db();
        assert!(db.get_loyalty_for_customer("cust-1").unwrap().is_none());
    }

    #[test]
    fn test_upsert_updates_by_customer() {
        let db = setup_db();

        let mut account = LoyaltyAccount::new("cust-1".into());
        db.save_loyalty_account(&account).unwrap();

        account.record_spend(6_000_000.0, 120);
        db.save_loyalty_account(&account).unwrap();

        let retrieved = db.get_loyalty_for_customer("cust-1").unwrap().unwrap();
        assert_eq!(retrieved.points, 120);
        assert_eq!(retrieved.tier, LoyaltyTier::Silver);

        // Still a single row for the customer.
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM loyalty_accounts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
