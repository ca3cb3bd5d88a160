//! Loyalty program models.

use serde::{Deserialize, Serialize};

/// Cumulative spend required to reach silver tier.
pub const SILVER_MIN_SPENT: f64 = 5_000_000.0;

/// Cumulative spend required to reach gold tier.
pub const GOLD_MIN_SPENT: f64 = 12_000_000.0;

/// Points earned per currency unit spent (1 point per 50,000).
pub const POINTS_PER_CURRENCY_UNIT: f64 = 1.0 / 50_000.0;

/// Loyalty tier, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoyaltyTier {
    /// Default tier for every account
    Bronze,
    /// Reached at [`SILVER_MIN_SPENT`]
    Silver,
    /// Reached at [`GOLD_MIN_SPENT`]
    Gold,
}

impl LoyaltyTier {
    /// Tier a cumulative spend amount qualifies for.
    pub fn for_total_spent(total_spent: f64) -> Self {
        if total_spent >= GOLD_MIN_SPENT {
            LoyaltyTier::Gold
        } else if total_spent >= SILVER_MIN_SPENT {
            LoyaltyTier::Silver
        } else {
            LoyaltyTier::Bronze
        }
    }

    /// Checkout discount rate granted by this tier.
    pub fn discount_rate(&self) -> f64 {
        match self {
            LoyaltyTier::Bronze => 0.05,
            LoyaltyTier::Silver => 0.10,
            LoyaltyTier::Gold => 0.15,
        }
    }
}

/// A customer's loyalty account.
///
/// One account per customer, created lazily on first checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoyaltyAccount {
    /// Unique account ID
    pub id: String,
    /// Owning customer ID
    pub customer_id: String,
    /// Accrued points
    pub points: i64,
    /// Current tier
    pub tier: LoyaltyTier,
    /// Cumulative post-discount spend
    pub total_spent: f64,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl LoyaltyAccount {
    /// Create a fresh bronze account for a customer.
    pub fn new(customer_id: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            customer_id,
            points: 0,
            tier: LoyaltyTier::Bronze,
            total_spent: 0.0,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Record a completed order against this account.
    ///
    /// Accrues points and spend, then re-evaluates the tier. The tier is a
    /// one-way ratchet: a recompute can raise it but never lower it.
    pub fn record_spend(&mut self, order_total: f64, points_earned: i64) {
        self.points += points_earned;
        self.total_spent += order_total;
        self.tier = self.tier.max(LoyaltyTier::for_total_spent(self.total_spent));
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}
