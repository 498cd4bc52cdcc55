//! Common utility functions for estimate calculations.
//!
//! This module provides the rounding policy used at the display boundary and
//! the lenient parsers that turn raw form input into quantities and costs.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Largest unit cost accepted from user input or a catalogue.
pub const MAX_UNIT_COST: Decimal = dec!(1000000000);

/// Largest quantity a line can hold. Together with [`MAX_UNIT_COST`] this
/// keeps every line total and every sum of them well inside `Decimal` range.
pub const MAX_QUANTITY: u32 = 1_000_000;

/// Rounds a decimal value to whole cents using banker's rounding.
///
/// Values exactly halfway between two cents go to the even cent, so rounding
/// many figures does not drift upwards. Only apply this when presenting
/// amounts; accumulation always works on unrounded values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fee_core::calculations::common::round_to_cents;
///
/// assert_eq!(round_to_cents(dec!(27.181818)), dec!(27.18));
/// assert_eq!(round_to_cents(dec!(2.125)), dec!(2.12));
/// assert_eq!(round_to_cents(dec!(2.135)), dec!(2.14));
/// ```
pub fn round_to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Parses a unit cost typed into a form field.
///
/// Surrounding whitespace, a single leading `$` and `,` thousands separators
/// are ignored. Returns `None` for empty input, anything that is not a
/// number, negative amounts and amounts above [`MAX_UNIT_COST`].
///
/// Unlike [`parse_quantity`], trailing text is not ignored: `"12abc"` is
/// rejected rather than read as 12.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fee_core::calculations::common::parse_unit_cost;
///
/// assert_eq!(parse_unit_cost(" $1,250.50 "), Some(dec!(1250.50)));
/// assert_eq!(parse_unit_cost(""), None);
/// assert_eq!(parse_unit_cost("-5"), None);
/// assert_eq!(parse_unit_cost("2000000000"), None);
/// ```
pub fn parse_unit_cost(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let normalized = unsigned.trim().replace(',', "");
    if normalized.is_empty() {
        return None;
    }

    match Decimal::from_str(&normalized) {
        Ok(value) if value > MAX_UNIT_COST => {
            tracing::warn!(input = %input, %value, "unit cost above limit rejected");
            None
        }
        Ok(value) if value >= Decimal::ZERO => Some(value),
        Ok(value) => {
            tracing::warn!(input = %input, %value, "negative unit cost rejected");
            None
        }
        Err(e) => {
            tracing::warn!(input = %input, "invalid unit cost: {}", e);
            None
        }
    }
}

/// Coerces a requested quantity to a positive integer.
///
/// Zero and negative requests become 1; values beyond [`MAX_QUANTITY`]
/// are clamped to it.
pub fn coerce_quantity(requested: i64) -> u32 {
    if requested <= 0 {
        1
    } else {
        u32::try_from(requested)
            .unwrap_or(MAX_QUANTITY)
            .min(MAX_QUANTITY)
    }
}

/// Parses quantity text the way a numeric form field is read.
///
/// The leading integer is used and anything after it is ignored, so
/// `"3.7"` and `"2 copies"` read as 3 and 2. Input without a leading integer,
/// or with a non-positive one, yields 1.
///
/// # Examples
///
/// ```
/// use fee_core::calculations::common::parse_quantity;
///
/// assert_eq!(parse_quantity("4"), 4);
/// assert_eq!(parse_quantity("3.7"), 3);
/// assert_eq!(parse_quantity("abc"), 1);
/// assert_eq!(parse_quantity("-2"), 1);
/// ```
pub fn parse_quantity(input: &str) -> u32 {
    let trimmed = input.trim();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 || negative {
        return 1;
    }

    let value = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    coerce_quantity(value)
}
