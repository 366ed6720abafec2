use crate::core::aliases::Instant;
use crate::core::types::DayOfWeek;
use chrono::{Datelike, Days, Months, NaiveDate, Timelike, Weekday};

pub trait WeekdayExt {
    fn to_day_of_week(self) -> DayOfWeek;
}

impl WeekdayExt for Weekday {
    fn to_day_of_week(self) -> DayOfWeek {
        match self {
            Weekday::Sun => DayOfWeek::Sun,
            Weekday::Mon => DayOfWeek::Mon,
            Weekday::Tue => DayOfWeek::Tue,
            Weekday::Wed => DayOfWeek::Wed,
            Weekday::Thu => DayOfWeek::Thu,
            Weekday::Fri => DayOfWeek::Fri,
            Weekday::Sat => DayOfWeek::Sat,
        }
    }
}

pub trait NaiveDateExt {
    /// Sunday of the week containing the date.
    fn week_start(self) -> NaiveDate;
    fn day_of_week(self) -> DayOfWeek;
    /// Adds whole months; a missing day clamps to the month's last day.
    fn add_months_clamped(self, months: u32) -> Option<NaiveDate>;
}

impl NaiveDateExt for NaiveDate {
    fn week_start(self) -> NaiveDate {
        self.checked_sub_days(Days::new(u64::from(self.weekday().num_days_from_sunday())))
            .unwrap_or(NaiveDate::MIN)
    }

    fn day_of_week(self) -> DayOfWeek {
        self.weekday().to_day_of_week()
    }

    fn add_months_clamped(self, months: u32) -> Option<NaiveDate> {
        self.checked_add_months(Months::new(months))
    }
}

pub trait InstantExt {
    /// Calendar date in the instant's own offset.
    fn local_date(&self) -> NaiveDate;
    /// Hours since local midnight, minutes as a fraction.
    fn fractional_hour(&self) -> f64;
}

impl InstantExt for Instant {
    fn local_date(&self) -> NaiveDate {
        self.date_naive()
    }

    fn fractional_hour(&self) -> f64 {
        self.hour() as f64 + self.minute() as f64 / 60.0
    }
}
