mod config;
pub(crate) mod rules;

pub use config::{ScoringConfig, DEFAULT_PROMOTION_RECEIPT_LIMIT};

use serde::{Deserialize, Serialize};

use super::domain::ValidatedReceipt;
use super::error::IntakeError;

/// Stateless scorer that applies the rule constants to a validated receipt.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score `receipt` for a user who already owns `prior_receipts` stored receipts.
    pub fn score(
        &self,
        receipt: &ValidatedReceipt,
        prior_receipts: usize,
    ) -> Result<PointsBreakdown, IntakeError> {
        let (components, total) = rules::score_receipt(receipt, prior_receipts, &self.config)?;
        Ok(PointsBreakdown { total, components })
    }
}

/// Rule that contributed to a receipt's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    RetailerName,
    RoundTotal,
    QuarterMultiple,
    ItemPairs,
    ItemDescription,
    OddPurchaseDay,
    AfternoonPurchase,
    Promotion,
}

impl ScoringRule {
    pub fn label(&self) -> &'static str {
        match self {
            ScoringRule::RetailerName => "Retailer name",
            ScoringRule::RoundTotal => "Round dollar total",
            ScoringRule::QuarterMultiple => "Quarter multiple total",
            ScoringRule::ItemPairs => "Item pairs",
            ScoringRule::ItemDescription => "Item description",
            ScoringRule::OddPurchaseDay => "Odd purchase day",
            ScoringRule::AfternoonPurchase => "Afternoon purchase",
            ScoringRule::Promotion => "First receipts promotion",
        }
    }
}

/// Discrete contribution to a score, kept for audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub rule: ScoringRule,
    pub points: u64,
    pub notes: String,
}

/// Scoring output: the total and the rules that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsBreakdown {
    pub total: u64,
    pub components: Vec<ScoreComponent>,
}

impl PointsBreakdown {
    pub fn points_for(&self, rule: ScoringRule) -> u64 {
        self.components
            .iter()
            .filter(|component| component.rule == rule)
            .map(|component| component.points)
            .sum()
    }
}
