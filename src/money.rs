//! Helpers for storing, rounding and displaying monetary amounts.

use std::str::FromStr;

use rusqlite::{Row, types::Type};
use rust_decimal::{Decimal, RoundingStrategy};

/// The number of decimal places kept for prices and fees.
pub const CENT_PLACES: u32 = 2;

/// Round `amount` to whole cents, rounding halves away from zero.
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Read a decimal stored as text from column `index` of `row`.
///
/// Amounts are stored as text so that they survive the round trip through
/// SQLite without picking up floating point error.
pub(crate) fn decimal_from_row(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let raw: String = row.get(index)?;

    Decimal::from_str(&raw).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
    })
}

/// Format `amount` as Indonesian Rupiah rounded to the nearest whole number,
/// e.g. "Rp 1.234.567".
///
/// Every digit is written out, however large the amount.
pub fn format_rupiah(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .abs()
        .trunc();

    let digits = group_thousands(&rounded.to_string());

    if amount.is_sign_negative() && !rounded.is_zero() {
        format!("-Rp {digits}")
    } else {
        format!("Rp {digits}")
    }
}

/// Insert a '.' between every group of three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    grouped
}
