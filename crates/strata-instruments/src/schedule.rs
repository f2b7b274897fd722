//! Payment schedule generation.
//!
//! A schedule is the sequence of accrual period boundaries from an
//! instrument's start date to its maturity. Bonds roll their coupon
//! dates backward from maturity with no business day adjustment;
//! swaps roll forward from the effective date with Modified Following.

use strata_core::calendars::{adjust, BusinessDayConvention, UsGovernmentBond};
use strata_core::{Date, Frequency};

use crate::error::{PricingError, PricingResult};

/// Direction of schedule generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleGeneration {
    /// Roll dates backward from the end date; a short stub lands at the
    /// start. Standard for bond coupon schedules.
    #[default]
    Backward,
    /// Roll dates forward from the start date; a short stub lands at the
    /// end. Standard for swap legs.
    Forward,
}

/// Configuration for schedule generation.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Start date (issue date or effective date).
    pub start_date: Date,
    /// End date (maturity).
    pub end_date: Date,
    /// Payment frequency.
    pub frequency: Frequency,
    /// Business day adjustment applied to every generated date.
    pub convention: BusinessDayConvention,
    /// Generation direction.
    pub generation: ScheduleGeneration,
}

impl ScheduleConfig {
    /// Creates a backward, unadjusted configuration (bond default).
    #[must_use]
    pub fn new(start_date: Date, end_date: Date, frequency: Frequency) -> Self {
        Self {
            start_date,
            end_date,
            frequency,
            convention: BusinessDayConvention::Unadjusted,
            generation: ScheduleGeneration::Backward,
        }
    }

    /// Sets the business day convention.
    #[must_use]
    pub fn with_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Sets the generation direction.
    #[must_use]
    pub fn with_generation(mut self, generation: ScheduleGeneration) -> Self {
        self.generation = generation;
        self
    }
}

/// An accrual schedule: adjusted period boundary dates in ascending order.
///
/// The first date is the (adjusted) start; every following date is both
/// a period end and its payment date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    dates: Vec<Date>,
}

impl Schedule {
    /// Generates a schedule from the configuration on the US government
    /// bond calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if the start date is not strictly before the end
    /// date or the date arithmetic fails.
    pub fn generate(config: &ScheduleConfig) -> PricingResult<Self> {
        if config.start_date >= config.end_date {
            return Err(PricingError::schedule(format!(
                "start {} must precede end {}",
                config.start_date, config.end_date
            )));
        }

        let months = config.frequency.months_per_period() as i32;
        let calendar = UsGovernmentBond;

        let mut unadjusted = Vec::new();
        match config.generation {
            ScheduleGeneration::Backward => {
                unadjusted.push(config.end_date);
                let mut k = 1;
                loop {
                    let date = config.end_date.add_months(-k * months)?;
                    if date <= config.start_date {
                        break;
                    }
                    unadjusted.push(date);
                    k += 1;
                }
                unadjusted.push(config.start_date);
                unadjusted.reverse();
            }
            ScheduleGeneration::Forward => {
                unadjusted.push(config.start_date);
                let mut k = 1;
                loop {
                    let date = config.start_date.add_months(k * months)?;
                    if date >= config.end_date {
                        break;
                    }
                    unadjusted.push(date);
                    k += 1;
                }
                unadjusted.push(config.end_date);
            }
        }

        let mut dates: Vec<Date> = unadjusted
            .into_iter()
            .map(|d| adjust(d, config.convention, &calendar))
            .collect();

        // Adjustment can collapse neighboring dates onto one business day
        dates.dedup();

        if dates.len() < 2 {
            return Err(PricingError::schedule(
                "schedule collapsed to fewer than two dates",
            ));
        }

        Ok(Self { dates })
    }

    /// Returns the boundary dates, ascending.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Returns the accrual periods as (start, end) pairs.
    pub fn periods(&self) -> impl Iterator<Item = (Date, Date)> + '_ {
        self.dates.windows(2).map(|w| (w[0], w[1]))
    }

    /// Returns the number of accrual periods.
    #[must_use]
    pub fn period_count(&self) -> usize {
        self.dates.len() - 1
    }
}
