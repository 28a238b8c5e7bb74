// ABOUTME: Display formatting helpers
// ABOUTME: Currency, compact numbers and calendar/relative dates

use chrono::{DateTime, NaiveDate, Utc};

/// Format an amount as US dollars, e.g. `$1,234.50`
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Abbreviate large numbers with K, M or B
pub fn format_number(num: f64) -> String {
    if num >= 1_000_000_000.0 {
        format!("{:.1}B", num / 1_000_000_000.0)
    } else if num >= 1_000_000.0 {
        format!("{:.1}M", num / 1_000_000.0)
    } else if num >= 1_000.0 {
        format!("{:.1}K", num / 1_000.0)
    } else if num.fract() == 0.0 {
        format!("{}", num as i64)
    } else {
        num.to_string()
    }
}

/// Calendar date such as `Jan 5, 2026`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Date relative to `today`: Today, Yesterday, Tomorrow, `N days ago`,
/// `In N days`, falling back to the calendar date beyond a week.
pub fn format_relative_date(date: &DateTime<Utc>, today: NaiveDate) -> String {
    let diff_days = (today - date.date_naive()).num_days();

    match diff_days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        -1 => "Tomorrow".to_string(),
        2..=6 => format!("{} days ago", diff_days),
        -6..=-2 => format!("In {} days", -diff_days),
        _ => format_date(date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "$0.00")]
    #[case(5.5, "$5.50")]
    #[case(1234.5, "$1,234.50")]
    #[case(1_000_000.0, "$1,000,000.00")]
    #[case(-42.0, "-$42.00")]
    fn test_format_currency(#[case] amount: f64, #[case] expected: &str) {
        assert_eq!(format_currency(amount), expected);
    }

    #[rstest]
    #[case(950.0, "950")]
    #[case(1_500.0, "1.5K")]
    #[case(2_340_000.0, "2.3M")]
    #[case(7_000_000_000.0, "7.0B")]
    fn test_format_number(#[case] num: f64, #[case] expected: &str) {
        assert_eq!(format_number(num), expected);
    }

    #[test]
    fn test_format_relative_date() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let at = |d: u32| Utc.with_ymd_and_hms(2026, 3, d, 15, 30, 0).unwrap();

        assert_eq!(format_relative_date(&at(10), today), "Today");
        assert_eq!(format_relative_date(&at(9), today), "Yesterday");
        assert_eq!(format_relative_date(&at(11), today), "Tomorrow");
        assert_eq!(format_relative_date(&at(7), today), "3 days ago");
        assert_eq!(format_relative_date(&at(14), today), "In 4 days");
        assert_eq!(format_relative_date(&at(1), today), "Mar 1, 2026");
    }
}
