use chrono::{NaiveDate, NaiveTime};

use super::domain::{Item, ReceiptPayload, ValidatedReceipt};
use super::error::{IntakeError, ValidationFailure};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Structural gate every receipt passes before it is scored.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceiptValidator;

impl ReceiptValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check shape and character sets, then parse the purchase moment.
    ///
    /// Shape violations surface as `ValidationFailed`; a well-shaped date or
    /// time that is not a real calendar value (`2022-02-30`, `24:10`) surfaces
    /// as `DateTimeParseFailed`.
    pub fn validate(&self, payload: ReceiptPayload) -> Result<ValidatedReceipt, IntakeError> {
        check_retailer(&payload.retailer)?;
        check_purchase_moment(&payload.purchase_date, "purchaseDate", is_date_shaped)
            .map_err(|failure| failure.unwrap_or(ValidationFailure::DateFormat))?;
        check_purchase_moment(&payload.purchase_time, "purchaseTime", is_time_shaped)
            .map_err(|failure| failure.unwrap_or(ValidationFailure::TimeFormat))?;
        check_amount(&payload.total, "total")?;

        if payload.items.is_empty() {
            return Err(ValidationFailure::NoItems.into());
        }
        for (index, item) in payload.items.iter().enumerate() {
            check_item(index, item)?;
        }

        let purchase_date = NaiveDate::parse_from_str(&payload.purchase_date, DATE_FORMAT)
            .map_err(|err| {
                IntakeError::DateTimeParseFailed(format!("'{}': {err}", payload.purchase_date))
            })?;
        let purchase_time = NaiveTime::parse_from_str(&payload.purchase_time, TIME_FORMAT)
            .map_err(|err| {
                IntakeError::DateTimeParseFailed(format!("'{}': {err}", payload.purchase_time))
            })?;

        Ok(ValidatedReceipt {
            payload,
            purchase_date,
            purchase_time,
        })
    }
}

fn check_retailer(retailer: &str) -> Result<(), ValidationFailure> {
    if retailer.is_empty() {
        return Err(ValidationFailure::missing("retailer"));
    }
    if !retailer.chars().all(is_retailer_char) {
        return Err(ValidationFailure::charset("retailer"));
    }
    Ok(())
}

fn check_item(index: usize, item: &Item) -> Result<(), ValidationFailure> {
    let description_field = format!("items[{index}].shortDescription");
    if item.short_description.is_empty() {
        return Err(ValidationFailure::missing(description_field));
    }
    if !item.short_description.chars().all(is_description_char) {
        return Err(ValidationFailure::charset(description_field));
    }
    check_amount(&item.price, &format!("items[{index}].price"))
}

fn check_amount(raw: &str, field: &str) -> Result<(), ValidationFailure> {
    if raw.is_empty() {
        return Err(ValidationFailure::missing(field));
    }
    if !is_two_decimal_amount(raw) {
        return Err(ValidationFailure::amount(field));
    }
    Ok(())
}

/// `Err(Some(_))` when the field is absent, `Err(None)` when it is misshapen.
fn check_purchase_moment(
    raw: &str,
    field: &str,
    shaped: fn(&str) -> bool,
) -> Result<(), Option<ValidationFailure>> {
    if raw.is_empty() {
        return Err(Some(ValidationFailure::missing(field)));
    }
    if !shaped(raw) {
        return Err(None);
    }
    Ok(())
}

fn is_retailer_char(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || c == '&' || c == '-'
}

fn is_description_char(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || c == '-'
}

/// `digits '.' digit digit`, ASCII only.
pub(crate) fn is_two_decimal_amount(raw: &str) -> bool {
    match raw.split_once('.') {
        Some((whole, fraction)) => {
            !whole.is_empty()
                && whole.bytes().all(|b| b.is_ascii_digit())
                && fraction.len() == 2
                && fraction.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

fn is_date_shaped(raw: &str) -> bool {
    digit_groups(raw, '-', &[4, 2, 2])
}

fn is_time_shaped(raw: &str) -> bool {
    digit_groups(raw, ':', &[2, 2])
}

fn digit_groups(raw: &str, separator: char, widths: &[usize]) -> bool {
    let groups: Vec<&str> = raw.split(separator).collect();
    groups.len() == widths.len()
        && groups
            .iter()
            .zip(widths)
            .all(|(group, width)| group.len() == *width && group.bytes().all(|b| b.is_ascii_digit()))
}
