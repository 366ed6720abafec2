use crate::core::models::Appointment;
use crate::ui::ansi::{FG_RED, FG_YELLOW, STYLE_DIM, STYLE_UNDERLINE, styled};
use crate::views::BoardRow;
use crate::views::day::DayView;
use crate::views::kanban::KanbanBoard;
use crate::views::orders::OrdersCalendar;
use crate::views::time_grid::TimeGrid;
use crate::views::utilization::{Utilization, UtilizationState, progress_bar};
use crate::views::week::WeekView;
use chrono::NaiveDate;

const BAR_WIDTH: usize = 10;

/// Turns view projections into table rows of already painted strings.
#[derive(Debug, Default, Clone)]
pub struct DisplayDataBuilder;

impl DisplayDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `#3 09:00-11:00 Boiler service`, painted by status.
    pub fn appointment_label(&self, appt: &Appointment) -> String {
        appt.status.paint(format!(
            "#{} {}-{} {}",
            appt.id,
            appt.start_time.format("%H:%M"),
            appt.end_time.format("%H:%M"),
            appt.title
        ))
    }

    fn cell(&self, appointments: &[&Appointment]) -> String {
        if appointments.is_empty() {
            return String::new();
        }
        appointments
            .iter()
            .map(|a| self.appointment_label(a))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn day_headers(&self, dates: &[NaiveDate]) -> Vec<String> {
        dates
            .iter()
            .map(|d| d.format("%a %m-%d").to_string().to_uppercase())
            .collect()
    }

    pub fn row_label(&self, row: &BoardRow) -> String {
        let label = match row.availability {
            Some(status) => format!("{} ({status})", row.label),
            None => row.label.clone(),
        };
        if row.is_dimmed() {
            styled(STYLE_DIM, label)
        } else {
            label
        }
    }

    pub fn utilization_label(&self, utilization: Option<&Utilization>) -> String {
        let Some(u) = utilization else {
            return "-".into();
        };
        let text = format!("{} {:.0}%", progress_bar(u.percent, BAR_WIDTH), u.percent);
        match u.state {
            UtilizationState::Overbooked => styled(FG_RED, text),
            UtilizationState::Underutilized => styled(FG_YELLOW, text),
            UtilizationState::Balanced => text,
        }
    }

    /// One row per hour: `[HOUR, APPOINTMENTS]`.
    pub fn day_rows(&self, view: &DayView<'_>) -> Vec<Vec<String>> {
        view.rows()
            .map(|(hour, appointments)| vec![format!("{hour:02}:00"), self.cell(appointments)])
            .collect()
    }

    /// `[ROW, LOAD, <one column per day>]`.
    pub fn week_rows(&self, view: &WeekView<'_>) -> Vec<Vec<String>> {
        view.rows
            .iter()
            .map(|r| {
                let mut line = vec![
                    self.row_label(&r.row),
                    self.utilization_label(r.utilization.as_ref()),
                ];
                line.extend(r.cells.iter().map(|c| self.cell(&c.appointments)));
                line
            })
            .collect()
    }

    /// `[ROW, <one column per day>]`; blocks show `top+height` in pixels,
    /// fully free days show the create affordance.
    pub fn time_grid_rows(&self, grid: &TimeGrid) -> Vec<Vec<String>> {
        let days = grid.window.days().len();
        grid.rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| {
                let mut line = vec![self.row_label(row)];
                for day_index in 0..days {
                    let blocks: Vec<String> = grid
                        .blocks_in(row_index, day_index)
                        .map(|b| {
                            format!("#{} {:.0}+{:.0}px", b.appointment_id, b.top_px, b.height_px)
                        })
                        .collect();
                    let free = grid.create_affordances(row_index, day_index).len();
                    line.push(if blocks.is_empty() {
                        "+ create".into()
                    } else {
                        format!("{} ({free}h free)", blocks.join(", "))
                    });
                }
                line
            })
            .collect()
    }

    /// Columns side by side; row `i` holds the `i`-th card of each column.
    pub fn kanban_rows(&self, board: &KanbanBoard<'_>) -> Vec<Vec<String>> {
        let depth = board
            .columns
            .iter()
            .map(|c| c.cards.len())
            .max()
            .unwrap_or(0);
        (0..depth)
            .map(|i| {
                board
                    .columns
                    .iter()
                    .map(|c| {
                        c.cards
                            .get(i)
                            .map(|a| self.appointment_label(a))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }

    /// `[ORDER, HOURS, <one column per day>]`.
    pub fn order_rows(&self, calendar: &OrdersCalendar<'_>) -> Vec<Vec<String>> {
        calendar
            .rows
            .iter()
            .map(|r| {
                let estimate = r
                    .order
                    .estimated_hours
                    .map(|h| format!("{h:.1}"))
                    .unwrap_or_else(|| "?".into());
                let hours = format!("{:.1}/{estimate}", r.scheduled_hours);
                let mut line = vec![
                    r.order.to_string(),
                    if r.fulfilled {
                        format!("{hours} done")
                    } else {
                        hours
                    },
                ];
                line.extend(r.cells.iter().map(|c| {
                    let text = if c.muted {
                        styled(STYLE_DIM, "·")
                    } else if c.quick_create {
                        "+".into()
                    } else {
                        self.cell(&c.appointments)
                    };
                    if c.preferred {
                        styled(STYLE_UNDERLINE, text)
                    } else {
                        text
                    }
                }));
                line
            })
            .collect()
    }
}
