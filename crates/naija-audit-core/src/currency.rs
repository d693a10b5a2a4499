//! Naira amount parsing and display.
//!
//! Trial balances arrive from spreadsheets and accounting exports, so amounts
//! are frequently strings such as `"₦1,250,000.50"` or `"(4,500)"`. Parsing
//! here is strict: anything that is not a plain signed decimal once currency
//! markers and grouping separators are removed is rejected.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::types::Money;

pub const NAIRA_SYMBOL: char = '₦';
pub const CURRENCY_CODE: &str = "NGN";

/// Minor-unit (kobo) precision of every accepted amount.
pub const KOBO_DP: u32 = 2;

/// Parse a Naira amount string.
///
/// Accepts an optional `₦` or `NGN` marker, comma/space/underscore grouping,
/// a leading minus sign, and accounting-style parentheses for negatives.
pub fn parse_naira(raw: &str) -> Option<Money> {
    let mut text = raw.trim();
    let mut negative = false;

    if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        negative = true;
        text = inner.trim();
    }

    let mut cleaned: String = text
        .chars()
        .filter(|&c| !matches!(c, ',' | '_' | NAIRA_SYMBOL) && !c.is_whitespace())
        .collect();

    if let Some(rest) = cleaned.strip_prefix('-') {
        negative = !negative;
        cleaned = rest.to_string();
    }

    let upper = cleaned.to_ascii_uppercase();
    let digits = upper.strip_prefix(CURRENCY_CODE).unwrap_or(&upper);
    if digits.is_empty() || digits.starts_with('-') || digits.starts_with('+') {
        return None;
    }

    let value = Decimal::from_str(digits).ok()?;
    Some(if negative { -value } else { value })
}

/// True when the amount carries no more than kobo precision.
pub fn has_kobo_precision(amount: Money) -> bool {
    amount.normalize().scale() <= KOBO_DP
}

/// Format an amount as `₦1,234,567.89` (negative amounts as `-₦…`).
pub fn format_naira(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(KOBO_DP, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{NAIRA_SYMBOL}{grouped}.{fraction}")
}
