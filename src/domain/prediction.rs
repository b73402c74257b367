// Prediction result presentation rules

/// Format a delay prediction for display, e.g. `4.82 hours`.
pub fn format_hours(value: f64) -> String {
    format!("{value:.2} hours")
}

/// Format a cost prediction as whole US dollars with thousands grouping,
/// e.g. `$13,500,000`.
pub fn format_usd(value: f64) -> String {
    let whole = value.round() as i64;
    let sign = if whole < 0 { "-" } else { "" };
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(4.82), "4.82 hours");
        assert_eq!(format_hours(0.5), "0.50 hours");
        assert_eq!(format_hours(12.0), "12.00 hours");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(13500000.0), "$13,500,000");
        assert_eq!(format_usd(500.0), "$500");
        assert_eq!(format_usd(1234.49), "$1,234");
        assert_eq!(format_usd(-2500.0), "-$2,500");
        assert_eq!(format_usd(0.0), "$0");
    }
}
