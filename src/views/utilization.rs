use crate::core::aliases::WorkerId;
use crate::core::models::{Appointment, Assignee, Worker};
use crate::core::repository::Repository;
use crate::core::types::AppointmentStatus;
use crate::extensions::chrono::InstantExt;
use crate::scheduler::calendar_view::CalendarView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilizationState {
    Overbooked,
    Balanced,
    Underutilized,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utilization {
    pub worker_id: WorkerId,
    pub scheduled_hours: f64,
    pub standard_hours: f64,
    pub percent: f64,
    pub state: UtilizationState,
}

/// Scheduled hours in `window` against the worker's weekly standard hours.
/// `None` for workers without standard hours.
pub fn worker_utilization(
    worker: &Worker,
    appointments: &Repository<Appointment>,
    window: &CalendarView,
    underutilized_percent: f64,
) -> Option<Utilization> {
    let standard_hours = worker.standard_work_hours.filter(|h| *h > 0.0)?;
    let assignee = Assignee::Internal(worker.id);
    let window = *window;

    let scheduled_hours: f64 = appointments
        .query()
        .r#where(move |a| {
            a.status != AppointmentStatus::Cancelled
                && a.is_assigned_to(&assignee)
                && window.contains(a.start_time.local_date())
        })
        .collect()
        .into_iter()
        .map(|a| a.duration_hours())
        .sum();

    let percent = scheduled_hours / standard_hours * 100.0;
    let state = if percent > 100.0 {
        UtilizationState::Overbooked
    } else if percent < underutilized_percent {
        UtilizationState::Underutilized
    } else {
        UtilizationState::Balanced
    };

    Some(Utilization {
        worker_id: worker.id,
        scheduled_hours,
        standard_hours,
        percent,
        state,
    })
}

/// Fixed-width bar, e.g. `[######----]`; overbooked bars stay full.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
