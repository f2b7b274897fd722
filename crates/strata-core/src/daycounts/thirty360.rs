//! 30/360 US day count convention.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// 30/360 US (Bond Basis) day count convention.
///
/// Assumes 30-day months and a 360-day year, with the US end-of-month
/// rules for February and the 31st:
///
/// - If D1 is the last day of February, set D1 = 30; if additionally D2
///   is the last day of February, set D2 = 30.
/// - If D1 is 31, set D1 = 30.
/// - If D2 is 31 and D1 is 30, set D2 = 30.
#[derive(Debug, Clone, Copy, Default)]
pub struct Thirty360US;

impl DayCount for Thirty360US {
    fn name(&self) -> &'static str {
        "30/360 US"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        Decimal::from(self.day_count(start, end)) / Decimal::from(360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let mut d1 = i64::from(start.day());
        let mut d2 = i64::from(end.day());

        let start_is_feb_eom = start.month() == 2 && start.is_end_of_month();
        let end_is_feb_eom = end.month() == 2 && end.is_end_of_month();

        if start_is_feb_eom {
            if end_is_feb_eom {
                d2 = 30;
            }
            d1 = 30;
        }

        if d1 == 31 {
            d1 = 30;
        }
        if d2 == 31 && d1 == 30 {
            d2 = 30;
        }

        360 * i64::from(end.year() - start.year())
            + 30 * (i64::from(end.month()) - i64::from(start.month()))
            + (d2 - d1)
    }
}
