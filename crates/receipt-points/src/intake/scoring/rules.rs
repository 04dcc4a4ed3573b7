use std::str::FromStr;

use chrono::{Datelike, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::super::domain::ValidatedReceipt;
use super::super::error::IntakeError;
use super::config::ScoringConfig;
use super::{ScoreComponent, ScoringRule};

/// Running breakdown that refuses to overflow the point total.
struct Tally {
    components: Vec<ScoreComponent>,
    total: u64,
}

impl Tally {
    fn award(
        &mut self,
        rule: ScoringRule,
        points: Option<u64>,
        notes: String,
        field: &str,
    ) -> Result<(), IntakeError> {
        let overflow = || IntakeError::NumericParseFailed {
            field: field.to_string(),
        };
        let points = points.ok_or_else(overflow)?;
        if points == 0 {
            return Ok(());
        }
        self.total = self.total.checked_add(points).ok_or_else(overflow)?;
        self.components.push(ScoreComponent {
            rule,
            points,
            notes,
        });
        Ok(())
    }
}

pub(crate) fn score_receipt(
    receipt: &ValidatedReceipt,
    prior_receipts: usize,
    config: &ScoringConfig,
) -> Result<(Vec<ScoreComponent>, u64), IntakeError> {
    let payload = receipt.payload();
    let total = parse_amount(&payload.total, "total")?;

    let mut tally = Tally {
        components: Vec::new(),
        total: 0,
    };

    let alphanumeric = alphanumeric_count(&payload.retailer);
    tally.award(
        ScoringRule::RetailerName,
        (alphanumeric as u64).checked_mul(config.retailer_char_points),
        format!("{alphanumeric} alphanumeric character(s) in retailer name"),
        "retailer",
    )?;

    if is_round_amount(total) {
        tally.award(
            ScoringRule::RoundTotal,
            Some(config.round_total_bonus),
            format!("total {total} has no cents"),
            "total",
        )?;
    }

    if is_quarter_multiple(total) {
        tally.award(
            ScoringRule::QuarterMultiple,
            Some(config.quarter_multiple_bonus),
            format!("total {total} is a multiple of 0.25"),
            "total",
        )?;
    }

    let pairs = payload.items.len() / 2;
    tally.award(
        ScoringRule::ItemPairs,
        (pairs as u64).checked_mul(config.item_pair_bonus),
        format!("{pairs} pair(s) of items"),
        "items",
    )?;

    for (index, item) in payload.items.iter().enumerate() {
        let trimmed_len = item.short_description.trim().chars().count();
        if trimmed_len == 0 || trimmed_len % 3 != 0 {
            continue;
        }
        let field = format!("items[{index}].price");
        let price = parse_amount(&item.price, &field)?;
        tally.award(
            ScoringRule::ItemDescription,
            description_points(price, config.description_price_multiplier),
            format!(
                "'{}' trims to {trimmed_len} characters, price {price}",
                item.short_description.trim()
            ),
            &field,
        )?;
    }

    let day = receipt.purchase_date().day();
    if day % 2 == 1 {
        tally.award(
            ScoringRule::OddPurchaseDay,
            Some(config.odd_day_bonus),
            format!("purchased on day {day}"),
            "purchaseDate",
        )?;
    }

    let time = receipt.purchase_time();
    if within_window(time, config.afternoon_window) {
        tally.award(
            ScoringRule::AfternoonPurchase,
            Some(config.afternoon_bonus),
            format!("purchased at {}", time.format("%H:%M")),
            "purchaseTime",
        )?;
    }

    if prior_receipts < config.promotion_receipt_limit {
        tally.award(
            ScoringRule::Promotion,
            Some(config.promotion_bonus),
            format!(
                "receipt {} of the first {} for this user",
                prior_receipts.saturating_add(1),
                config.promotion_receipt_limit
            ),
            "promotion",
        )?;
    }

    Ok((tally.components, tally.total))
}

pub(crate) fn parse_amount(raw: &str, field: &str) -> Result<Decimal, IntakeError> {
    Decimal::from_str(raw).map_err(|_| IntakeError::NumericParseFailed {
        field: field.to_string(),
    })
}

pub(crate) fn alphanumeric_count(retailer: &str) -> usize {
    retailer.chars().filter(|c| c.is_alphanumeric()).count()
}

pub(crate) fn is_round_amount(total: Decimal) -> bool {
    total.fract().is_zero()
}

pub(crate) fn is_quarter_multiple(total: Decimal) -> bool {
    (total % Decimal::new(25, 2)).is_zero()
}

pub(crate) fn description_points(price: Decimal, multiplier: Decimal) -> Option<u64> {
    price.checked_mul(multiplier)?.ceil().to_u64()
}

pub(crate) fn within_window(time: NaiveTime, (start, end): (NaiveTime, NaiveTime)) -> bool {
    time > start && time < end
}
