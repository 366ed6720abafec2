use crate::extensions::chrono::NaiveDateExt;
use chrono::{Duration, Local, NaiveDate};

/// Window of consecutive board days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarView {
    start: NaiveDate,
    days: u32,
}

impl Default for CalendarView {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarView {
    /// Default: the week (Sunday first) containing today.
    pub fn new() -> Self {
        Self::week_containing(Local::now().date_naive())
    }

    pub fn week_containing(date: NaiveDate) -> Self {
        Self {
            start: date.week_start(),
            days: 7,
        }
    }

    pub fn with_start_date(mut self, start: NaiveDate) -> Self {
        self.start = start;
        self
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// First day after the window.
    pub fn end_exclusive(&self) -> NaiveDate {
        self.start + Duration::days(self.days as i64)
    }

    /// Last day inside the window.
    pub fn last_day(&self) -> NaiveDate {
        self.end_exclusive() - Duration::days(1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end_exclusive()
    }

    /// Ordered list of board dates.
    pub fn days(&self) -> Vec<NaiveDate> {
        (0..self.days)
            .map(|offset| self.start + Duration::days(offset as i64))
            .collect()
    }
}
