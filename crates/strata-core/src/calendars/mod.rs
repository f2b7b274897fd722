//! Business day calendars and conventions.
//!
//! This module provides:
//! - Business day calendars (weekend-only and US government bond market)
//! - Business day adjustment conventions
//! - Settlement date arithmetic

mod conventions;
mod us_calendar;

pub use conventions::{adjust, BusinessDayConvention};
pub use us_calendar::UsGovernmentBond;

use crate::types::Date;

/// Trait for business day calendars.
///
/// Calendars determine which days are business days vs holidays
/// for a specific market or jurisdiction.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &'static str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a holiday.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Adjusts a date according to the given business day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Date {
        conventions::adjust(date, convention, self)
    }

    /// Advances a date by a number of business days.
    ///
    /// Positive values move forward, negative values move backward.
    fn add_business_days(&self, date: Date, days: i32) -> Date {
        let mut result = date;
        let mut remaining = days.abs();
        let direction: i64 = if days >= 0 { 1 } else { -1 };

        while remaining > 0 {
            result = result.add_days(direction);
            if self.is_business_day(result) {
                remaining -= 1;
            }
        }

        result
    }

    /// Returns the next business day on or after the given date.
    fn next_business_day(&self, date: Date) -> Date {
        let mut result = date;
        while !self.is_business_day(result) {
            result = result.add_days(1);
        }
        result
    }

    /// Returns the previous business day on or before the given date.
    fn previous_business_day(&self, date: Date) -> Date {
        let mut result = date;
        while !self.is_business_day(result) {
            result = result.add_days(-1);
        }
        result
    }
}

/// A simple weekend-only calendar (no holidays).
///
/// Useful for testing or when holiday data is not available.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &'static str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekend_calendar() {
        let cal = WeekendCalendar;

        let saturday = Date::from_ymd(2026, 1, 24).unwrap();
        let monday = Date::from_ymd(2026, 1, 26).unwrap();

        assert!(!cal.is_business_day(saturday));
        assert!(cal.is_holiday(saturday));
        assert!(cal.is_business_day(monday));
    }

    #[test]
    fn test_add_business_days() {
        let cal = WeekendCalendar;

        // Wednesday Jan 28, 2026 + 2 business days = Friday Jan 30
        let wednesday = Date::from_ymd(2026, 1, 28).unwrap();
        assert_eq!(
            cal.add_business_days(wednesday, 2),
            Date::from_ymd(2026, 1, 30).unwrap()
        );

        // Friday + 2 business days skips the weekend
        let friday = Date::from_ymd(2026, 1, 30).unwrap();
        assert_eq!(
            cal.add_business_days(friday, 2),
            Date::from_ymd(2026, 2, 3).unwrap()
        );

        // Backward over a weekend
        let monday = Date::from_ymd(2026, 2, 2).unwrap();
        assert_eq!(
            cal.add_business_days(monday, -1),
            Date::from_ymd(2026, 1, 30).unwrap()
        );
    }

    #[test]
    fn test_next_previous_business_day() {
        let cal = WeekendCalendar;

        let saturday = Date::from_ymd(2026, 1, 24).unwrap();
        assert_eq!(
            cal.next_business_day(saturday),
            Date::from_ymd(2026, 1, 26).unwrap()
        );
        assert_eq!(
            cal.previous_business_day(saturday),
            Date::from_ymd(2026, 1, 23).unwrap()
        );
    }
}
