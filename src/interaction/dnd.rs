use crate::core::aliases::{AppointmentId, Instant, ServiceOrderId};
use crate::core::models::{Appointment, Assignee};
use crate::core::repository::Repository;
use crate::core::types::AppointmentStatus;
use crate::interaction::resize::ResizeOutcome;
use crate::views::{RowKey, appointment_matches_row};
use chrono::{FixedOffset, NaiveDate, TimeZone, Timelike};

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPayload {
    Appointment(AppointmentId),
    ServiceOrder(ServiceOrderId),
    Worker(Assignee),
}

/// Registered drop zone under the pointer at release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Slot {
        row: RowKey,
        date: NaiveDate,
        hour: u32,
    },
    Card(AppointmentId),
    KanbanColumn(AppointmentStatus),
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssignMode {
    /// The dropped assignee replaces every existing link.
    #[default]
    Single,
    /// The dropped assignee joins the existing links.
    Multi,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropIntent {
    Move {
        appointment_id: AppointmentId,
        start_time: Instant,
        row: RowKey,
    },
    /// Opens a prefilled form; nothing is mutated.
    CreateDraft {
        service_order_id: ServiceOrderId,
        start_time: Instant,
        row: RowKey,
    },
    Assign {
        appointment_id: AppointmentId,
        assignee: Assignee,
        mode: AssignMode,
    },
    ChangeStatus {
        appointment_id: AppointmentId,
        status: AppointmentStatus,
    },
    Resize(ResizeOutcome),
}

/// Ring drawn around a target while a payload hovers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// Create something new here.
    Primary,
    /// Move something that already exists here.
    Warning,
    /// Assign onto this card.
    Accent,
}

pub fn highlight_for(payload: &DragPayload, target: &DropTarget) -> Option<Highlight> {
    match (payload, target) {
        (DragPayload::ServiceOrder(_), DropTarget::Slot { .. }) => Some(Highlight::Primary),
        (DragPayload::Appointment(_), DropTarget::Slot { .. }) => Some(Highlight::Warning),
        (DragPayload::Appointment(_), DropTarget::KanbanColumn(_)) => Some(Highlight::Warning),
        (DragPayload::Worker(_), DropTarget::Card(_)) => Some(Highlight::Accent),
        _ => None,
    }
}

/// Start instant of the `hour` slot on `date`, on the given clock.
pub fn slot_start(date: NaiveDate, hour: u32, offset: FixedOffset) -> Option<Instant> {
    let local = date.and_hms_opt(hour, 0, 0)?;
    offset.from_local_datetime(&local).single()
}

/// A live appointment other than `except` already starts in this slot.
pub fn slot_is_occupied(
    appointments: &Repository<Appointment>,
    row: &RowKey,
    date: NaiveDate,
    hour: u32,
    except: Option<AppointmentId>,
) -> bool {
    let row = *row;
    appointments
        .query()
        .r#where(move |a| {
            Some(a.id) != except
                && a.status != AppointmentStatus::Cancelled
                && a.start_time.hour() == hour
                && appointment_matches_row(a, &row, date)
        })
        .exists()
}

/// Turns a release into an intent. `None` means the drop is a no-op and no
/// store call may follow: no target, an occupied slot, an unknown subject,
/// or a drop that changes nothing.
pub fn resolve_drop(
    payload: &DragPayload,
    target: &DropTarget,
    appointments: &Repository<Appointment>,
    board_offset: FixedOffset,
    mode: AssignMode,
) -> Option<DropIntent> {
    match (*payload, *target) {
        (DragPayload::Appointment(id), DropTarget::Slot { row, date, hour }) => {
            let appt = appointments.get(id).ok()?;
            if slot_is_occupied(appointments, &row, date, hour, Some(id)) {
                return None;
            }
            let start_time = slot_start(date, hour, *appt.start_time.offset())?;
            let same_people = appt.assignees().copied().collect::<Vec<_>>() == row.assignees();
            if start_time == appt.start_time && same_people {
                return None;
            }
            Some(DropIntent::Move {
                appointment_id: id,
                start_time,
                row,
            })
        }
        (DragPayload::ServiceOrder(order), DropTarget::Slot { row, date, hour }) => {
            Some(DropIntent::CreateDraft {
                service_order_id: order,
                start_time: slot_start(date, hour, board_offset)?,
                row,
            })
        }
        (DragPayload::Worker(assignee), DropTarget::Card(id)) => {
            let appt = appointments.get(id).ok()?;
            let unchanged = match mode {
                AssignMode::Single => {
                    appt.workers.len() == 1 && appt.is_assigned_to(&assignee)
                }
                AssignMode::Multi => appt.is_assigned_to(&assignee),
            };
            (!unchanged).then_some(DropIntent::Assign {
                appointment_id: id,
                assignee,
                mode,
            })
        }
        (DragPayload::Appointment(id), DropTarget::KanbanColumn(status)) => {
            let appt = appointments.get(id).ok()?;
            (appt.status != status).then_some(DropIntent::ChangeStatus {
                appointment_id: id,
                status,
            })
        }
        _ => None,
    }
}

/// Stable detail address, openable in a new browsing context.
pub fn deep_link(base: &str, id: AppointmentId) -> String {
    format!("{}/appointments/{id}", base.trim_end_matches('/'))
}
