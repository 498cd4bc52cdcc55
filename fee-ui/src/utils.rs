use fee_core::calculations::common::round_to_cents;
use rust_decimal::Decimal;

/// Formats an amount as Australian dollars with thousands separators and
/// two decimal places, e.g. `$1,234.56`. Rounds half to even.
pub fn money(value: Decimal) -> String {
    let mut cents = round_to_cents(value.abs());
    cents.rescale(2);
    let negative = value.is_sign_negative() && !cents.is_zero();

    let text = cents.to_string();
    let (int_part, dec_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut with_commas = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Interprets an answer to a yes/no prompt. Anything other than an explicit
/// yes counts as no.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
