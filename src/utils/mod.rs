//! Formatting helpers shared by reports and exports.

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::NaiveDate;

/// Wire pattern for dates in both directions (`MM/dd/yyyy`).
pub const SHORT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Fixed two-decimal rendering, rounding half away from zero.
pub fn format_price(price: &BigDecimal) -> String {
    price.with_scale_round(2, RoundingMode::HalfUp).to_string()
}

pub fn format_short_date(date: NaiveDate) -> String {
    date.format(SHORT_DATE_FORMAT).to_string()
}
