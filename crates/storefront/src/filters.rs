//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use keyzone_core::Price;
use rust_decimal::Decimal;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats an amount in the store currency.
///
/// Usage in templates: `{{ form.price|rupees }}` renders `Rs 12,500.00`.
/// Values that are not decimals render unchanged.
#[askama::filter_fn]
pub fn rupees(amount: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_rupees(&amount.to_string()))
}

fn format_rupees(text: &str) -> String {
    text.trim()
        .parse::<Decimal>()
        .map_or_else(|_| text.to_string(), |value| Price::lkr(value).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rupees_formats_decimals() {
        assert_eq!(format_rupees("12500"), "Rs 12,500.00");
        assert_eq!(format_rupees(" 99.5 "), "Rs 99.50");
    }

    #[test]
    fn test_rupees_passes_through_text() {
        assert_eq!(format_rupees("free"), "free");
    }
}
