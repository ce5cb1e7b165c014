// Rounding and display helpers shared by the P&L, hedge and risk endpoints

use rust_decimal::{Decimal, RoundingStrategy};

/// Round a decimal to a specific number of decimal places (half away from zero)
pub fn round_decimal(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Round an f64 to a specific number of decimal places
pub fn round_f64(value: f64, decimals: i32) -> f64 {
    let multiplier = 10_f64.powi(decimals);
    (value * multiplier).round() / multiplier
}

/// Format a decimal as a rupee string with comma-grouped thousands, e.g. `₹36,309.88`.
/// The sign is dropped; callers prepend one where needed.
pub fn format_currency(value: Decimal, decimals: u32) -> String {
    let rounded = round_decimal(value.abs(), decimals);
    let text = format!("{:.*}", decimals as usize, rounded);
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(fraction) => format!("₹{}.{}", grouped, fraction),
        None => format!("₹{}", grouped),
    }
}

/// `+` for zero and above, `-` below.
pub fn sign_symbol(value: Decimal) -> &'static str {
    if value >= Decimal::ZERO {
        "+"
    } else {
        "-"
    }
}

/// Percentage with an explicit sign and two decimals, e.g. `+18.36%`.
pub fn format_percentage(value: Decimal) -> String {
    format!("{}{:.2}%", sign_symbol(value), round_decimal(value.abs(), 2))
}

/// Local wall-clock time, second precision, e.g. `2024-06-15T10:00:00`.
pub fn local_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(dec!(36309.876), 2), "₹36,309.88");
        assert_eq!(format_currency(dec!(234170.23), 2), "₹234,170.23");
        assert_eq!(format_currency(dec!(-11708.5), 0), "₹11,709");
        assert_eq!(format_currency(dec!(999), 2), "₹999.00");
        assert_eq!(format_currency(Decimal::ZERO, 2), "₹0.00");
    }

    #[test]
    fn percentage_carries_sign() {
        assert_eq!(format_percentage(dec!(18.3512)), "+18.35%");
        assert_eq!(format_percentage(dec!(-4.5)), "-4.50%");
        assert_eq!(format_percentage(Decimal::ZERO), "+0.00%");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_decimal(dec!(2.345), 2), dec!(2.35));
        assert_eq!(round_f64(0.78125, 4), 0.7813);
    }
}
