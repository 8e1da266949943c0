use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount of Vietnamese đồng the way the `vi-VN` locale does:
/// whole đồng, `.` as thousands separator, `₫` after a non-breaking space.
///
/// `format_vnd(dec!(1060000))` → `"1.060.000 ₫"`
pub fn format_vnd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}\u{a0}₫", sign, grouped)
}
