use crate::core::context::BoardContext;
use crate::core::models::{Appointment, Assignee};
use crate::scheduler::calendar_view::CalendarView;
use crate::views::utilization::{Utilization, worker_utilization};
use crate::views::{BoardRow, RowKey, appointment_matches_row, board_rows};
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct WeekCell<'a> {
    pub date: NaiveDate,
    pub appointments: Vec<&'a Appointment>,
}

#[derive(Debug, Clone)]
pub struct WeekRow<'a> {
    pub row: BoardRow,
    pub cells: Vec<WeekCell<'a>>,
    /// Internal workers with standard hours only.
    pub utilization: Option<Utilization>,
}

/// Rows are people, columns are the seven days of the week containing
/// the current date.
#[derive(Debug, Clone)]
pub struct WeekView<'a> {
    pub window: CalendarView,
    pub rows: Vec<WeekRow<'a>>,
}

impl<'a> WeekView<'a> {
    pub fn build(ctx: &'a BoardContext, current: NaiveDate) -> Self {
        let window = CalendarView::week_containing(current);
        let days = window.days();
        let mut appointments = ctx.appointments.query().collect();
        appointments.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));

        let rows = board_rows(ctx, &window)
            .into_iter()
            .map(|row| {
                let cells = days
                    .iter()
                    .map(|date| WeekCell {
                        date: *date,
                        appointments: appointments
                            .iter()
                            .copied()
                            .filter(|a| appointment_matches_row(a, &row.key, *date))
                            .collect(),
                    })
                    .collect();
                let utilization = match row.key {
                    RowKey::Assignee(Assignee::Internal(id)) => ctx
                        .workers
                        .get(id)
                        .ok()
                        .and_then(|w| {
                            worker_utilization(
                                w,
                                &ctx.appointments,
                                &window,
                                ctx.config.underutilized_percent(),
                            )
                        }),
                    _ => None,
                };
                WeekRow {
                    row,
                    cells,
                    utilization,
                }
            })
            .collect();

        Self { window, rows }
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        self.window.days()
    }

    pub fn row(&self, key: &RowKey) -> Option<&WeekRow<'a>> {
        self.rows.iter().find(|r| r.row.key == *key)
    }
}
