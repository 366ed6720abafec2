use crate::core::aliases::{Instant, WorkerId};
use crate::core::context::BoardContext;
use crate::core::models::{WorkerSchedule, WorkerUnavailability};
use crate::core::repository::Repository;
use crate::core::types::{AvailabilityPeriod, AvailabilityStatus};
use crate::extensions::chrono::{InstantExt, NaiveDateExt};
use chrono::{Duration, NaiveDate};
use strum::IntoEnumIterator;

/// Day-level answer for dropping work on one day cell.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityCheck {
    pub is_available: bool,
    pub reason: Option<String>,
    pub available_periods: Vec<AvailabilityPeriod>,
}

impl AvailabilityCheck {
    fn blocked(reason: impl Into<String>) -> Self {
        Self {
            is_available: false,
            reason: Some(reason.into()),
            available_periods: Vec::new(),
        }
    }

    /// Emoji hints for the open periods, e.g. "🌅 ☀️".
    pub fn hint(&self) -> String {
        self.available_periods
            .iter()
            .map(|p| p.emoji())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Reads weekly schedules and unavailability windows. Advisory only:
/// nothing here blocks a mutation.
pub struct AvailabilityResolver<'a> {
    schedules: &'a Repository<WorkerSchedule>,
    unavailability: &'a Repository<WorkerUnavailability>,
}

impl<'a> AvailabilityResolver<'a> {
    pub fn new(
        schedules: &'a Repository<WorkerSchedule>,
        unavailability: &'a Repository<WorkerUnavailability>,
    ) -> Self {
        Self {
            schedules,
            unavailability,
        }
    }

    pub fn from_context(ctx: &'a BoardContext) -> Self {
        Self::new(&ctx.schedules, &ctx.unavailability)
    }

    fn shifts_on(&self, worker: WorkerId, date: NaiveDate) -> Vec<&'a WorkerSchedule> {
        let day = date.day_of_week();
        self.schedules
            .query()
            .r#where(move |s| s.worker_id == worker && s.is_active && s.day_of_week == day)
            .order_with(|a, b| a.hours.start.cmp(&b.hours.start))
            .collect()
    }

    fn blocking_window(&self, worker: WorkerId, date: NaiveDate) -> Option<&'a WorkerUnavailability> {
        self.unavailability
            .query()
            .r#where(move |u| u.worker_id == worker && u.covers(date))
            .order_with(|a, b| a.start_date.cmp(&b.start_date))
            .collect()
            .into_iter()
            .next()
    }

    /// Classifies `from..=to`: no scheduled day, or every scheduled day
    /// blocked, is unavailable; some blocked is partial.
    pub fn worker_availability_status(
        &self,
        worker: WorkerId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AvailabilityStatus {
        let mut scheduled_days = 0usize;
        let mut unavailable_days = 0usize;

        let mut date = from;
        while date <= to {
            if !self.shifts_on(worker, date).is_empty() {
                scheduled_days += 1;
                if self.blocking_window(worker, date).is_some() {
                    unavailable_days += 1;
                }
            }
            date += Duration::days(1);
        }

        if scheduled_days == 0 || unavailable_days == scheduled_days {
            AvailabilityStatus::Unavailable
        } else if unavailable_days > 0 {
            AvailabilityStatus::Partial
        } else {
            AvailabilityStatus::Available
        }
    }

    /// Looks at the day `start` falls on; `end` only has to follow it.
    pub fn check_availability(
        &self,
        worker: WorkerId,
        start: Instant,
        end: Instant,
    ) -> AvailabilityCheck {
        if end <= start {
            return AvailabilityCheck::blocked("The time window is empty.");
        }
        let date = start.local_date();

        if let Some(window) = self.blocking_window(worker, date) {
            let reason = window
                .reason
                .clone()
                .unwrap_or_else(|| format!("Unavailable {} to {}", window.start_date, window.end_date));
            return AvailabilityCheck::blocked(reason);
        }

        let shifts = self.shifts_on(worker, date);
        if shifts.is_empty() {
            return AvailabilityCheck::blocked(format!("Not scheduled on {}", date.day_of_week()));
        }

        let available_periods = AvailabilityPeriod::iter()
            .filter(|p| {
                let (from, to) = p.hours();
                shifts.iter().any(|s| s.hours.overlaps_hours(from, to))
            })
            .collect();

        AvailabilityCheck {
            is_available: true,
            reason: None,
            available_periods,
        }
    }
}
