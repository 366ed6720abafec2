use crate::core::models::Appointment;
use crate::core::repository::Repository;
use crate::core::types::AppointmentStatus;
use crate::extensions::chrono::InstantExt;
use crate::scheduler::calendar_view::CalendarView;
use once_cell::sync::Lazy;

/// Board columns, left to right. Cancelled work has no column.
pub static KANBAN_COLUMNS: Lazy<Vec<AppointmentStatus>> = Lazy::new(|| {
    vec![
        AppointmentStatus::Draft,
        AppointmentStatus::Published,
        AppointmentStatus::CheckedIn,
        AppointmentStatus::Completed,
    ]
});

pub fn column_index(status: AppointmentStatus) -> Option<usize> {
    KANBAN_COLUMNS.iter().position(|s| *s == status)
}

#[derive(Debug, Clone)]
pub struct KanbanColumn<'a> {
    pub status: AppointmentStatus,
    pub cards: Vec<&'a Appointment>,
}

#[derive(Debug, Clone)]
pub struct KanbanBoard<'a> {
    pub columns: Vec<KanbanColumn<'a>>,
}

impl<'a> KanbanBoard<'a> {
    /// Cards starting inside `window`, ordered by start time.
    pub fn build(appointments: &'a Repository<Appointment>, window: &CalendarView) -> Self {
        let window = *window;
        let visible = appointments
            .query()
            .r#where(move |a| window.contains(a.start_time.local_date()))
            .order_with(|a, b| a.start_time.cmp(&b.start_time))
            .collect();

        let mut columns: Vec<KanbanColumn<'a>> = KANBAN_COLUMNS
            .iter()
            .map(|status| KanbanColumn {
                status: *status,
                cards: Vec::new(),
            })
            .collect();
        for appt in visible {
            if let Some(idx) = column_index(appt.status) {
                columns[idx].cards.push(appt);
            }
        }
        Self { columns }
    }

    pub fn column(&self, status: AppointmentStatus) -> Option<&KanbanColumn<'a>> {
        self.columns.iter().find(|c| c.status == status)
    }
}
