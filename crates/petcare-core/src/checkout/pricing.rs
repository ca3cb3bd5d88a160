//! Cart pricing: subtotal, tax, tier discount, points.

use serde::{Deserialize, Serialize};

use crate::models::{LoyaltyAccount, OrderItem, POINTS_PER_CURRENCY_UNIT};

/// Tax rate applied to the pre-discount subtotal.
pub const TAX_RATE: f64 = 0.10;

/// The priced breakdown of a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderTotals {
    /// Sum of line totals
    pub subtotal: f64,
    /// Tax on the subtotal
    pub tax: f64,
    /// Discount rate granted by the customer's tier (0 without an account)
    pub discount_rate: f64,
    /// Discount amount, computed on the subtotal
    pub loyalty_discount: f64,
    /// Amount to charge
    pub total: f64,
    /// Points the order will earn
    pub points_earned: i64,
}

/// Price a cart's resolved line items against an optional loyalty account.
///
/// Tax and discount are both computed on the subtotal, independently of
/// each other; the discount does not reduce the taxed base. Customers
/// without a loyalty account get no discount.
pub fn price_cart(items: &[OrderItem], account: Option<&LoyaltyAccount>) -> OrderTotals {
    let subtotal: f64 = items.iter().map(|item| item.total).sum();
    let tax = subtotal * TAX_RATE;

    let discount_rate = account.map(|a| a.tier.discount_rate()).unwrap_or(0.0);
    let loyalty_discount = subtotal * discount_rate;

    // Never charge below zero, even for inputs that should not occur.
    let total = (subtotal + tax - loyalty_discount).max(0.0);
    let points_earned = (total * POINTS_PER_CURRENCY_UNIT).floor() as i64;

    OrderTotals {
        subtotal,
        tax,
        discount_rate,
        loyalty_discount,
        total,
        points_earned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LoyaltyTier;

    fn make_items(unit_price: f64, quantity: u32) -> Vec<OrderItem> {
        vec![OrderItem::new(
            "prod-1".into(),
            "Dry food".into(),
            quantity,
            unit_price,
        )]
    }

    fn silver_account() -> LoyaltyAccount {
        let mut account = LoyaltyAccount::new("cust-1".into());
        account.tier = LoyaltyTier::Silver;
        account
    }

    #[test]
    fn test_silver_cart_breakdown() {
        // 1,000,000 subtotal at silver: 10% tax, 10% discount, 20 points.
        let totals = price_cart(&make_items(500_000.0, 2), Some(&silver_account()));

        assert_eq!(totals.subtotal, 1_000_000.0);
        assert!((totals.tax - 100_000.0).abs() < 1e-6);
        assert_eq!(totals.discount_rate, 0.10);
        assert!((totals.loyalty_discount - 100_000.0).abs() < 1e-6);
        assert_eq!(totals.total, 1_000_000.0);
        assert_eq!(totals.points_earned, 20);
    }

    #[test]
    fn test_no_account_no_discount() {
        let totals = price_cart(&make_items(100_000.0, 1), None);

        assert_eq!(totals.discount_rate, 0.0);
        assert_eq!(totals.loyalty_discount, 0.0);
        assert!((totals.total - 110_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_pricing_identity() {
        let totals = price_cart(&make_items(123_456.0, 3), Some(&silver_account()));
        assert_eq!(
            totals.total,
            totals.subtotal + totals.tax - totals.loyalty_discount
        );
    }

    #[test]
    fn test_empty_cart_is_free() {
        let totals = price_cart(&[], Some(&silver_account()));
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.total, 0.0);
        assert_eq!(totals.points_earned, 0);
    }

    #[test]
    fn test_points_floor() {
        // 49,999 earns nothing; 50,000 earns exactly one point. No account,
        // so totals stay at subtotal + tax.
        let totals = price_cart(&make_items(45_454.0, 1), None); // ~49,999.4 total
        assert_eq!(totals.points_earned, 0);

        let totals = price_cart(&make_items(50_000.0, 1), None); // 55,000 total
        assert_eq!(totals.points_earned, 1);
    }

    #[test]
    fn test_total_floors_at_zero() {
        // Normal inputs cannot go negative; a corrupted line item must
        // still never produce a negative charge.
        let mut item = OrderItem::new("prod-1".into(), "Refund line".into(), 1, 0.0);
        item.total = -100_000.0;
        let totals = price_cart(&[item], Some(&silver_account()));
        assert_eq!(totals.total, 0.0);
        assert_eq!(totals.points_earned, 0);
    }
}
