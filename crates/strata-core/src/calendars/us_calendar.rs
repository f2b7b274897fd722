//! US government bond market calendar.

use chrono::Weekday;

use super::Calendar;
use crate::types::Date;

/// US government bond market calendar.
///
/// Includes all US Federal holidays observed by the Treasury market,
/// with Saturday holidays observed the preceding Friday and Sunday
/// holidays the following Monday.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsGovernmentBond;

impl UsGovernmentBond {
    /// Returns true if the date is a US Federal holiday.
    fn is_federal_holiday(&self, date: Date) -> bool {
        let year = date.year();
        let month = date.month();
        let day = date.day();
        let weekday = date.weekday();

        // Fixed-date holidays with observed shifts
        match (month, day) {
            // New Year's Day (Jan 1, or observed)
            (1, 1) => return true,
            (12, 31) if weekday == Weekday::Fri => return true,
            (1, 2) if weekday == Weekday::Mon => return true,

            // Juneteenth (Jun 19, or observed) - since 2021
            (6, 19) if year >= 2021 => return true,
            (6, 18) if year >= 2021 && weekday == Weekday::Fri => return true,
            (6, 20) if year >= 2021 && weekday == Weekday::Mon => return true,

            // Independence Day (Jul 4, or observed)
            (7, 4) => return true,
            (7, 3) if weekday == Weekday::Fri => return true,
            (7, 5) if weekday == Weekday::Mon => return true,

            // Veterans Day (Nov 11, or observed)
            (11, 11) => return true,
            (11, 10) if weekday == Weekday::Fri => return true,
            (11, 12) if weekday == Weekday::Mon => return true,

            // Christmas Day (Dec 25, or observed)
            (12, 25) => return true,
            (12, 24) if weekday == Weekday::Fri => return true,
            (12, 26) if weekday == Weekday::Mon => return true,

            _ => {}
        }

        // Floating holidays (nth weekday of month)

        // MLK Day: 3rd Monday in January
        if month == 1 && is_nth_weekday(date, Weekday::Mon, 3) {
            return true;
        }

        // Presidents Day: 3rd Monday in February
        if month == 2 && is_nth_weekday(date, Weekday::Mon, 3) {
            return true;
        }

        // Memorial Day: last Monday in May
        if month == 5 && is_last_weekday(date, Weekday::Mon) {
            return true;
        }

        // Labor Day: 1st Monday in September
        if month == 9 && is_nth_weekday(date, Weekday::Mon, 1) {
            return true;
        }

        // Columbus Day: 2nd Monday in October
        if month == 10 && is_nth_weekday(date, Weekday::Mon, 2) {
            return true;
        }

        // Thanksgiving: 4th Thursday in November
        if month == 11 && is_nth_weekday(date, Weekday::Thu, 4) {
            return true;
        }

        false
    }
}

impl Calendar for UsGovernmentBond {
    fn name(&self) -> &'static str {
        "US Government Bond"
    }

    fn is_business_day(&self, date: Date) -> bool {
        if date.is_weekend() {
            return false;
        }

        !self.is_federal_holiday(date)
    }
}

/// Returns true if date is the nth occurrence of weekday in its month.
fn is_nth_weekday(date: Date, weekday: Weekday, n: u32) -> bool {
    if date.weekday() != weekday {
        return false;
    }

    let occurrence = (date.day() - 1) / 7 + 1;
    occurrence == n
}

/// Returns true if date is the last occurrence of weekday in its month.
fn is_last_weekday(date: Date, weekday: Weekday) -> bool {
    if date.weekday() != weekday {
        return false;
    }

    // Adding 7 days crossing into next month means this was the last one
    let next_week = date.add_days(7);
    next_week.month() != date.month()
}
