//! Business day adjustment conventions.

use serde::{Deserialize, Serialize};

use super::Calendar;
use crate::types::Date;

/// Business day adjustment conventions.
///
/// These conventions specify how to adjust a date that falls
/// on a non-business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BusinessDayConvention {
    /// No adjustment - use the date as-is even if not a business day.
    Unadjusted,

    /// Move to the following business day.
    #[default]
    Following,

    /// Move to the following business day, unless it crosses a month boundary,
    /// in which case move to the preceding business day.
    ModifiedFollowing,

    /// Move to the preceding business day.
    Preceding,

    /// Move to the preceding business day, unless it crosses a month boundary,
    /// in which case move to the following business day.
    ModifiedPreceding,
}

impl std::fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BusinessDayConvention::Unadjusted => "Unadjusted",
            BusinessDayConvention::Following => "Following",
            BusinessDayConvention::ModifiedFollowing => "Modified Following",
            BusinessDayConvention::Preceding => "Preceding",
            BusinessDayConvention::ModifiedPreceding => "Modified Preceding",
        };
        write!(f, "{name}")
    }
}

/// Adjusts a date according to the given business day convention.
pub fn adjust<C: Calendar + ?Sized>(
    date: Date,
    convention: BusinessDayConvention,
    calendar: &C,
) -> Date {
    if calendar.is_business_day(date) {
        return date;
    }

    match convention {
        BusinessDayConvention::Unadjusted => date,

        BusinessDayConvention::Following => following(date, calendar),

        BusinessDayConvention::ModifiedFollowing => {
            let adjusted = following(date, calendar);
            if adjusted.month() != date.month() {
                // Crossed month boundary, go preceding instead
                preceding(date, calendar)
            } else {
                adjusted
            }
        }

        BusinessDayConvention::Preceding => preceding(date, calendar),

        BusinessDayConvention::ModifiedPreceding => {
            let adjusted = preceding(date, calendar);
            if adjusted.month() != date.month() {
                // Crossed month boundary, go following instead
                following(date, calendar)
            } else {
                adjusted
            }
        }
    }
}

/// Returns the next business day on or after the given date.
fn following<C: Calendar + ?Sized>(mut date: Date, calendar: &C) -> Date {
    while !calendar.is_business_day(date) {
        date = date.add_days(1);
    }
    date
}

/// Returns the previous business day on or before the given date.
fn preceding<C: Calendar + ?Sized>(mut date: Date, calendar: &C) -> Date {
    while !calendar.is_business_day(date) {
        date = date.add_days(-1);
    }
    date
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendars::WeekendCalendar;

    #[test]
    fn test_following() {
        let cal = WeekendCalendar;

        // Saturday should roll to Monday
        let saturday = Date::from_ymd(2026, 1, 24).unwrap();
        let adjusted = adjust(saturday, BusinessDayConvention::Following, &cal);

        assert_eq!(adjusted, Date::from_ymd(2026, 1, 26).unwrap());
    }

    #[test]
    fn test_preceding() {
        let cal = WeekendCalendar;

        let saturday = Date::from_ymd(2026, 1, 24).unwrap();
        let adjusted = adjust(saturday, BusinessDayConvention::Preceding, &cal);

        assert_eq!(adjusted, Date::from_ymd(2026, 1, 23).unwrap());
    }

    #[test]
    fn test_modified_following_month_end() {
        let cal = WeekendCalendar;

        // Sunday May 31, 2026: following would land in June,
        // so modified following rolls back to Friday May 29
        let sunday = Date::from_ymd(2026, 5, 31).unwrap();
        let adjusted = adjust(sunday, BusinessDayConvention::ModifiedFollowing, &cal);

        assert_eq!(adjusted, Date::from_ymd(2026, 5, 29).unwrap());
    }

    #[test]
    fn test_unadjusted() {
        let cal = WeekendCalendar;

        let saturday = Date::from_ymd(2026, 1, 24).unwrap();
        let adjusted = adjust(saturday, BusinessDayConvention::Unadjusted, &cal);

        assert_eq!(adjusted, saturday);
    }

    #[test]
    fn test_business_day_unchanged() {
        let cal = WeekendCalendar;

        let monday = Date::from_ymd(2026, 1, 26).unwrap();
        let adjusted = adjust(monday, BusinessDayConvention::Following, &cal);

        assert_eq!(adjusted, monday);
    }
}
