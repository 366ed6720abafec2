use crate::core::aliases::AppointmentId;
use crate::core::context::BoardContext;
use crate::core::models::Appointment;
use crate::extensions::chrono::InstantExt;
use crate::scheduler::calendar_view::CalendarView;
use crate::views::{BoardRow, appointment_matches_row, board_rows};
use chrono::NaiveDate;

/// `(top, height)` in pixels: `top = (h + m/60) * pph`,
/// `height = duration_h * pph`.
pub fn block_geometry(appt: &Appointment, pixels_per_hour: f64) -> (f64, f64) {
    (
        appt.start_time.fractional_hour() * pixels_per_hour,
        appt.duration_hours() * pixels_per_hour,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridBlock {
    pub appointment_id: AppointmentId,
    pub row_index: usize,
    pub day_index: usize,
    pub top_px: f64,
    pub height_px: f64,
}

/// Week layout with absolutely positioned blocks; the surface resize works on.
#[derive(Debug, Clone)]
pub struct TimeGrid {
    pub window: CalendarView,
    pub rows: Vec<BoardRow>,
    pub blocks: Vec<GridBlock>,
    pub pixels_per_hour: f64,
}

impl TimeGrid {
    pub fn build(ctx: &BoardContext, current: NaiveDate) -> Self {
        let window = CalendarView::week_containing(current);
        let pixels_per_hour = ctx.config.pixels_per_hour();
        let rows = board_rows(ctx, &window);
        let mut appointments = ctx.appointments.query().collect();
        appointments.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));

        let mut blocks = Vec::new();
        for (row_index, row) in rows.iter().enumerate() {
            for (day_index, date) in window.days().into_iter().enumerate() {
                for appt in appointments
                    .iter()
                    .filter(|a| appointment_matches_row(a, &row.key, date))
                {
                    let (top_px, height_px) = block_geometry(appt, pixels_per_hour);
                    blocks.push(GridBlock {
                        appointment_id: appt.id,
                        row_index,
                        day_index,
                        top_px,
                        height_px,
                    });
                }
            }
        }

        Self {
            window,
            rows,
            blocks,
            pixels_per_hour,
        }
    }

    /// Hourly grid line offsets, 0 through 24.
    pub fn hour_lines(&self) -> Vec<f64> {
        (0..=24).map(|h| h as f64 * self.pixels_per_hour).collect()
    }

    pub fn blocks_in(&self, row_index: usize, day_index: usize) -> impl Iterator<Item = &GridBlock> {
        self.blocks
            .iter()
            .filter(move |b| b.row_index == row_index && b.day_index == day_index)
    }

    /// No block covers any part of the hour; the cell offers "create".
    pub fn is_empty_hour(&self, row_index: usize, day_index: usize, hour: u32) -> bool {
        let from = hour as f64 * self.pixels_per_hour;
        let to = from + self.pixels_per_hour;
        !self
            .blocks_in(row_index, day_index)
            .any(|b| b.top_px < to && b.top_px + b.height_px > from)
    }

    /// Hours of a cell that show the create affordance.
    pub fn create_affordances(&self, row_index: usize, day_index: usize) -> Vec<u32> {
        (0..24)
            .filter(|h| self.is_empty_hour(row_index, day_index, *h))
            .collect()
    }
}
