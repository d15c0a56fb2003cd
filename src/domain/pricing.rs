//! Pricing tiers (tarifas) and monthly fee calculation.
//!
//! A tier prices a package of N weekly workshops. A student's fee is the
//! tier matching their number of open enrollments; siblings after the
//! first one in a family group get a percentage off.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PricingTier {
    pub id: Uuid,
    pub name: String,
    /// Number of workshops covered by the monthly amount
    pub workshop_count: i32,
    /// Whole currency units per month
    pub monthly_amount: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewPricingTier {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    #[schema(example = "Dos talleres")]
    pub name: String,
    #[validate(range(min = 1, max = 20, message = "Workshop count must be between 1 and 20"))]
    pub workshop_count: i32,
    #[validate(range(min = 0, message = "Amount cannot be negative"))]
    pub monthly_amount: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct PricingTierChanges {
    #[validate(length(min = 1, max = 120, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 1, max = 20, message = "Workshop count must be between 1 and 20"))]
    pub workshop_count: Option<i32>,
    #[validate(range(min = 0, message = "Amount cannot be negative"))]
    pub monthly_amount: Option<i64>,
    pub active: Option<bool>,
}

/// Monthly fee owed by a student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FeeQuote {
    pub enrolled_workshops: u32,
    pub tier_id: Option<Uuid>,
    pub tier_name: Option<String>,
    pub base_amount: i64,
    pub discount_percent: u8,
    pub amount: i64,
}

/// Pick the active tier for `enrolled` workshops.
///
/// Exact match first; otherwise the largest package below `enrolled`;
/// otherwise the smallest package available.
pub fn select_tier(tiers: &[PricingTier], enrolled: u32) -> Option<&PricingTier> {
    if enrolled == 0 {
        return None;
    }
    let enrolled = i64::from(enrolled);
    let active = || tiers.iter().filter(|t| t.active);

    active()
        .find(|t| i64::from(t.workshop_count) == enrolled)
        .or_else(|| {
            active()
                .filter(|t| i64::from(t.workshop_count) < enrolled)
                .max_by_key(|t| t.workshop_count)
        })
        .or_else(|| active().min_by_key(|t| t.workshop_count))
}

/// Compute the monthly fee; `sibling` applies `sibling_discount_percent`.
pub fn quote_fee(
    tiers: &[PricingTier],
    enrolled: u32,
    sibling: bool,
    sibling_discount_percent: u8,
) -> FeeQuote {
    let Some(tier) = select_tier(tiers, enrolled) else {
        return FeeQuote {
            enrolled_workshops: enrolled,
            tier_id: None,
            tier_name: None,
            base_amount: 0,
            discount_percent: 0,
            amount: 0,
        };
    };

    let discount_percent = if sibling {
        sibling_discount_percent.min(100)
    } else {
        0
    };
    let base_amount = tier.monthly_amount;
    let amount = base_amount * i64::from(100 - discount_percent) / 100;

    FeeQuote {
        enrolled_workshops: enrolled,
        tier_id: Some(tier.id),
        tier_name: Some(tier.name.clone()),
        base_amount,
        discount_percent,
        amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(count: i32, amount: i64, active: bool) -> PricingTier {
        PricingTier {
            id: Uuid::new_v4(),
            name: format!("{} talleres", count),
            workshop_count: count,
            monthly_amount: amount,
            active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn tiers() -> Vec<PricingTier> {
        vec![
            tier(1, 30_000, true),
            tier(2, 52_000, true),
            tier(3, 70_000, true),
            tier(4, 80_000, false),
        ]
    }

    #[test]
    fn test_exact_tier() {
        let tiers = tiers();
        assert_eq!(select_tier(&tiers, 2).unwrap().monthly_amount, 52_000);
    }

    #[test]
    fn test_larger_packages_cap_at_biggest_active_tier() {
        let tiers = tiers();
        // the 4-workshop tier is inactive
        assert_eq!(select_tier(&tiers, 5).unwrap().workshop_count, 3);
    }

    #[test]
    fn test_falls_back_to_smallest_tier() {
        let tiers = vec![tier(2, 52_000, true)];
        assert_eq!(select_tier(&tiers, 1).unwrap().workshop_count, 2);
    }

    #[test]
    fn test_no_enrollments_no_fee() {
        let quote = quote_fee(&tiers(), 0, true, 10);
        assert_eq!(quote.amount, 0);
        assert!(quote.tier_id.is_none());
    }

    #[test]
    fn test_sibling_discount_rounds_down() {
        let tiers = vec![tier(1, 30_005, true)];
        let quote = quote_fee(&tiers, 1, true, 10);
        assert_eq!(quote.base_amount, 30_005);
        assert_eq!(quote.discount_percent, 10);
        assert_eq!(quote.amount, 27_004);

        let full = quote_fee(&tiers, 1, false, 10);
        assert_eq!(full.amount, 30_005);
    }
}
