use crate::core::aliases::{AppointmentId, Instant};
use crate::core::models::{Appointment, Assignee};
use crate::core::types::AppointmentStatus;

/// Half-open overlap of `[a_start, a_end)` and `[b_start, b_end)`. Touching
/// boundaries do not overlap.
pub fn overlaps(a_start: Instant, a_end: Instant, b_start: Instant, b_end: Instant) -> bool {
    a_start < b_end && a_end > b_start
}

/// A candidate instance that clashes with existing work.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    /// Position of the candidate in the generated sequence.
    pub index: usize,
    pub start_time: Instant,
    pub end_time: Instant,
    pub existing_id: AppointmentId,
}

/// One entry per conflicting candidate, in candidate order. Cancelled
/// appointments and appointments not assigned to `assignee` never clash.
pub fn check_recurring_conflicts<'a, I>(
    instances: &[Appointment],
    existing: I,
    assignee: Assignee,
) -> Vec<Conflict>
where
    I: IntoIterator<Item = &'a Appointment>,
{
    let mut busy: Vec<&Appointment> = existing
        .into_iter()
        .filter(|a| a.status != AppointmentStatus::Cancelled && a.is_assigned_to(&assignee))
        .collect();
    busy.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));

    instances
        .iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            busy.iter()
                .find(|b| {
                    overlaps(
                        candidate.start_time,
                        candidate.end_time,
                        b.start_time,
                        b.end_time,
                    )
                })
                .map(|b| Conflict {
                    index,
                    start_time: candidate.start_time,
                    end_time: candidate.end_time,
                    existing_id: b.id,
                })
        })
        .collect()
}
