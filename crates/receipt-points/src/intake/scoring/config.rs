use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROMOTION_RECEIPT_LIMIT: usize = 3;

/// Point weights and thresholds for the loyalty rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub retailer_char_points: u64,
    pub round_total_bonus: u64,
    pub quarter_multiple_bonus: u64,
    pub item_pair_bonus: u64,
    pub description_price_multiplier: Decimal,
    pub odd_day_bonus: u64,
    pub afternoon_bonus: u64,
    /// Exclusive bounds of the afternoon window.
    pub afternoon_window: (NaiveTime, NaiveTime),
    pub promotion_bonus: u64,
    pub promotion_receipt_limit: usize,
}

impl ScoringConfig {
    pub fn with_promotion_limit(mut self, limit: usize) -> Self {
        self.promotion_receipt_limit = limit;
        self
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            retailer_char_points: 1,
            round_total_bonus: 50,
            quarter_multiple_bonus: 25,
            item_pair_bonus: 5,
            description_price_multiplier: Decimal::new(2, 1),
            odd_day_bonus: 6,
            afternoon_bonus: 10,
            afternoon_window: (
                NaiveTime::MIN + chrono::Duration::hours(14),
                NaiveTime::MIN + chrono::Duration::hours(16),
            ),
            promotion_bonus: 300,
            promotion_receipt_limit: DEFAULT_PROMOTION_RECEIPT_LIMIT,
        }
    }
}
