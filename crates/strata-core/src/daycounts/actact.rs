//! Actual/Actual day count convention.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// Actual/Actual ISDA day count convention.
///
/// The year fraction is calculated by splitting the period into
/// portions that fall in leap years vs non-leap years:
///
/// ```text
/// yf = days in non-leap years / 365 + days in leap years / 366
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ActActIsda;

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        if start >= end {
            return Decimal::ZERO;
        }

        let mut total = Decimal::ZERO;
        let mut current = start;

        // Process year by year
        while current.year() < end.year() {
            let year_end = Date::from_ymd(current.year(), 12, 31).unwrap();
            let days_in_year = current.days_in_year();
            let days = current.days_between(&year_end) + 1; // Include Dec 31

            total += Decimal::from(days) / Decimal::from(days_in_year);

            current = Date::from_ymd(current.year() + 1, 1, 1).unwrap();
        }

        // Remaining portion in the final year
        if current < end {
            let days = current.days_between(&end);
            let days_in_year = current.days_in_year();
            total += Decimal::from(days) / Decimal::from(days_in_year);
        }

        total
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_actact_same_year() {
        let dc = ActActIsda;
        let start = Date::from_ymd(2026, 1, 1).unwrap();
        let end = Date::from_ymd(2026, 7, 1).unwrap();

        assert_eq!(dc.year_fraction(start, end), dec!(181) / dec!(365));
    }

    #[test]
    fn test_actact_full_year() {
        let dc = ActActIsda;
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2026, 1, 1).unwrap();

        assert_eq!(dc.year_fraction(start, end), dec!(1));
    }

    #[test]
    fn test_actact_leap_split() {
        let dc = ActActIsda;

        // Crosses from 2023 (non-leap) into 2024 (leap)
        let start = Date::from_ymd(2023, 11, 15).unwrap();
        let end = Date::from_ymd(2024, 5, 15).unwrap();

        // 47 days in 2023 (Nov 15 through Dec 31), 135 days in 2024
        let expected = dec!(47) / dec!(365) + dec!(135) / dec!(366);
        assert_eq!(dc.year_fraction(start, end), expected);
    }

    #[test]
    fn test_actact_reversed_is_zero() {
        let dc = ActActIsda;
        let start = Date::from_ymd(2026, 7, 1).unwrap();
        let end = Date::from_ymd(2026, 1, 1).unwrap();

        assert_eq!(dc.year_fraction(start, end), Decimal::ZERO);
    }
}
