use crate::core::models::Appointment;
use crate::core::repository::Repository;
use crate::extensions::chrono::InstantExt;
use chrono::{NaiveDate, Timelike};

pub const HOURS_PER_DAY: usize = 24;

/// 24 hourly rows. A multi-hour appointment appears once, in its start hour.
#[derive(Debug, Clone)]
pub struct DayView<'a> {
    pub date: NaiveDate,
    hours: Vec<Vec<&'a Appointment>>,
}

impl<'a> DayView<'a> {
    pub fn build(appointments: &'a Repository<Appointment>, date: NaiveDate) -> Self {
        let mut hours: Vec<Vec<&'a Appointment>> = vec![Vec::new(); HOURS_PER_DAY];
        let on_day = appointments
            .query()
            .r#where(move |a| a.start_time.local_date() == date)
            .order_with(|a, b| a.start_time.cmp(&b.start_time))
            .collect();
        for appt in on_day {
            hours[appt.start_time.hour() as usize].push(appt);
        }
        Self { date, hours }
    }

    pub fn hour(&self, hour: u32) -> &[&'a Appointment] {
        self.hours
            .get(hour as usize)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// `(hour, appointments)` for every hour, empty ones included.
    pub fn rows(&self) -> impl Iterator<Item = (u32, &[&'a Appointment])> {
        self.hours
            .iter()
            .enumerate()
            .map(|(h, v)| (h as u32, v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.hours.iter().all(|h| h.is_empty())
    }
}
