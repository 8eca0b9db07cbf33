use rust_decimal::{Decimal, RoundingStrategy};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

const LONG_DATE: &[BorrowedFormatItem<'_>] =
    format_description!("[month repr:short] [day padding:none], [year]");
const SHORT_DATE: &[BorrowedFormatItem<'_>] = format_description!("[month]/[day]/[year]");
const DATE_INPUT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Whole US dollars, e.g. `$1,234,568` or `-$1,235`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{}${}", sign, group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_percentage(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(1);
    format!("{}%", rounded)
}

pub fn format_allocation(value: Decimal) -> String {
    format!("{}%", value.normalize())
}

pub fn format_date(date: OffsetDateTime) -> String {
    date.format(LONG_DATE).unwrap_or_default()
}

pub fn format_short_date(date: Option<OffsetDateTime>, fallback: &str) -> String {
    match date {
        Some(d) => d.format(SHORT_DATE).unwrap_or_else(|_| fallback.to_string()),
        None => fallback.to_string(),
    }
}

/// `YYYY-MM-DD`, the format date inputs are edited in.
pub fn to_date_input(date: OffsetDateTime) -> String {
    date.format(DATE_INPUT).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    #[test]
    fn currency_rounds_half_away_from_zero() {
        assert_eq!(format_currency(dec!(1234567.5)), "$1,234,568");
        assert_eq!(format_currency(dec!(-1234.5)), "-$1,235");
        assert_eq!(format_currency(dec!(0.4)), "$0");
        assert_eq!(format_currency(dec!(999)), "$999");
        assert_eq!(format_currency(dec!(1000)), "$1,000");
    }

    #[test]
    fn tiny_negative_rounds_to_unsigned_zero() {
        assert_eq!(format_currency(dec!(-0.4)), "$0");
    }

    #[test]
    fn percentages_keep_one_decimal() {
        assert_eq!(format_percentage(dec!(50)), "50.0%");
        assert_eq!(format_percentage(dec!(33.333)), "33.3%");
        assert_eq!(format_percentage(dec!(12.25)), "12.3%");
        assert_eq!(format_allocation(dec!(75.00)), "75%");
        assert_eq!(format_allocation(dec!(37.5)), "37.5%");
    }

    #[test]
    fn dates() {
        let d = datetime!(2025-03-07 15:30:00 UTC);
        assert_eq!(format_date(d), "Mar 7, 2025");
        assert_eq!(format_short_date(Some(d), "N/A"), "03/07/2025");
        assert_eq!(format_short_date(None, "N/A"), "N/A");
        assert_eq!(to_date_input(d), "2025-03-07");
    }
}
