//! Working-day guard for the orchestrator
//!
//! Merging on a day nobody is around to notice a bad bump is how automated
//! updates go wrong quietly. The orchestrator consults a calendar before
//! doing anything at all.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;

/// Answers whether a given date is a designated non-working day
pub trait HolidayCalendar: Send + Sync {
    /// True if no merges should happen on `date`
    fn is_non_working_day(&self, date: NaiveDate) -> bool;
}

/// Calendar built from the local settings: an explicit holiday list plus an
/// optional weekend rule
#[derive(Debug, Clone, Default)]
pub struct ConfiguredCalendar {
    holidays: HashSet<NaiveDate>,
    skip_weekends: bool,
}

impl ConfiguredCalendar {
    /// Create a calendar from a holiday list and weekend rule
    pub fn new<I>(holidays: I, skip_weekends: bool) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self {
            holidays: holidays.into_iter().collect(),
            skip_weekends,
        }
    }
}

impl HolidayCalendar for ConfiguredCalendar {
    fn is_non_working_day(&self, date: NaiveDate) -> bool {
        if self.skip_weekends
            && matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
        {
            return true;
        }
        self.holidays.contains(&date)
    }
}
