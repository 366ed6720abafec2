
use crate::core::aliases::Instant;
use crate::core::models::{Appointment, Assignee};
use chrono::{FixedOffset, NaiveDate, TimeZone};

pub(super) fn offset() -> FixedOffset {
    FixedOffset::west_opt(5 * 3600).unwrap()
}

/// 2024-03-04 is a Monday.
pub(super) fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

pub(super) fn at(hour: u32, minute: u32) -> Instant {
    offset()
        .with_ymd_and_hms(2024, 3, 4, hour, minute, 0)
        .unwrap()
}

pub(super) fn appt(id: i32, start: Instant, end: Instant, assignees: &[Assignee]) -> Appointment {
    let mut a = Appointment::new(format!("Job {id}"), 1, start, end).unwrap();
    a.id = id;
    a.set_assignees(assignees.iter().copied());
    a
}
