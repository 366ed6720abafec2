//! Pure projections of the shared appointment cache. Nothing here mutates.

pub mod day;
pub mod kanban;
pub mod orders;
#[cfg(test)]
mod tests;
pub mod time_grid;
pub mod utilization;
pub mod week;

use crate::core::context::BoardContext;
use crate::core::models::{Appointment, Assignee};
use crate::core::repository::Sort;
use crate::core::types::AvailabilityStatus;
use crate::extensions::chrono::InstantExt;
use crate::scheduler::availability::AvailabilityResolver;
use crate::scheduler::calendar_view::CalendarView;
use chrono::NaiveDate;
use std::fmt;

/// Identity of a board row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKey {
    Unassigned,
    Assignee(Assignee),
}

impl RowKey {
    /// Assignment an appointment takes when dropped on this row.
    pub fn assignees(&self) -> Vec<Assignee> {
        match self {
            RowKey::Unassigned => Vec::new(),
            RowKey::Assignee(a) => vec![*a],
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Unassigned => write!(f, "unassigned"),
            RowKey::Assignee(a) => write!(f, "{a}"),
        }
    }
}

/// True when `appt` belongs in the `row` x `date` cell. An appointment with
/// several assignees shows in each of their rows.
pub fn appointment_matches_row(appt: &Appointment, row: &RowKey, date: NaiveDate) -> bool {
    if appt.start_time.local_date() != date {
        return false;
    }
    match row {
        RowKey::Unassigned => appt.is_unassigned(),
        RowKey::Assignee(a) => appt.is_assigned_to(a),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardRow {
    pub key: RowKey,
    pub label: String,
    /// Internal workers only.
    pub availability: Option<AvailabilityStatus>,
}

impl BoardRow {
    /// Unavailable rows render dimmed.
    pub fn is_dimmed(&self) -> bool {
        self.availability == Some(AvailabilityStatus::Unavailable)
    }
}

/// Unassigned first, then internal workers (available, partial,
/// unavailable; by name within a class), then subcontractors by name.
pub fn board_rows(ctx: &BoardContext, window: &CalendarView) -> Vec<BoardRow> {
    let resolver = AvailabilityResolver::from_context(ctx);

    let mut workers: Vec<BoardRow> = ctx
        .workers
        .values(Sort::IdAsc)
        .into_iter()
        .map(|w| BoardRow {
            key: RowKey::Assignee(Assignee::Internal(w.id)),
            label: w.name.clone(),
            availability: Some(resolver.worker_availability_status(
                w.id,
                window.start(),
                window.last_day(),
            )),
        })
        .collect();
    workers.sort_by(|a, b| {
        a.availability
            .cmp(&b.availability)
            .then_with(|| a.label.cmp(&b.label))
    });

    let mut contractors: Vec<BoardRow> = ctx
        .subcontractors
        .values(Sort::IdAsc)
        .into_iter()
        .map(|s| BoardRow {
            key: RowKey::Assignee(Assignee::External(s.id)),
            label: s.display_name(),
            availability: None,
        })
        .collect();
    contractors.sort_by(|a, b| a.label.cmp(&b.label));

    let mut rows = Vec::with_capacity(workers.len() + contractors.len() + 1);
    rows.push(BoardRow {
        key: RowKey::Unassigned,
        label: "Unassigned".into(),
        availability: None,
    });
    rows.extend(workers);
    rows.extend(contractors);
    rows
}
