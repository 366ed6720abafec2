use crate::core::aliases::{AppointmentId, Instant};
use crate::core::models::Appointment;
use crate::errors::Result;
use crate::extensions::chrono::InstantExt;
use chrono::{Duration, Timelike};

pub const SNAP_MINUTES: i64 = 30;
pub const MIN_DURATION_MINUTES: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Top,
    Bottom,
}

/// Live block geometry while the edge is held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizePreview {
    pub top_px: f64,
    pub height_px: f64,
}

/// Committed result of a resize gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeOutcome {
    pub appointment_id: AppointmentId,
    pub start_time: Instant,
    pub end_time: Instant,
}

/// Rounds to the nearest half hour of the instant's own clock; ties go up.
pub fn snap_to_half_hour(at: Instant) -> Instant {
    let step = SNAP_MINUTES * 60;
    let into_day = at.num_seconds_from_midnight() as i64;
    let floor = at
        - Duration::seconds(into_day % step)
        - Duration::nanoseconds(at.nanosecond() as i64);
    let rem = into_day % step;
    if rem * 2 >= step {
        floor + Duration::seconds(step)
    } else {
        floor
    }
}

/// One edge held on one block. Created on pointer-down over an edge zone,
/// consumed on release.
#[derive(Debug, Clone)]
pub struct ResizeSession {
    appointment_id: AppointmentId,
    edge: ResizeEdge,
    origin_y: f64,
    pixels_per_hour: f64,
    start: Instant,
    end: Instant,
    delta_px: f64,
}

impl ResizeSession {
    pub fn begin(appt: &Appointment, edge: ResizeEdge, y: f64, pixels_per_hour: f64) -> Self {
        Self {
            appointment_id: appt.id,
            edge,
            origin_y: y,
            pixels_per_hour,
            start: appt.start_time,
            end: appt.end_time,
            delta_px: 0.0,
        }
    }

    pub fn edge(&self) -> ResizeEdge {
        self.edge
    }

    fn min_height_px(&self) -> f64 {
        MIN_DURATION_MINUTES as f64 / 60.0 * self.pixels_per_hour
    }

    fn base_geometry(&self) -> (f64, f64) {
        let hours = (self.end - self.start).num_seconds() as f64 / 3600.0;
        (
            self.start.fractional_hour() * self.pixels_per_hour,
            hours * self.pixels_per_hour,
        )
    }

    /// Follows the pointer without snapping; height never drops below the
    /// minimum duration.
    pub fn drag_to(&mut self, y: f64) -> ResizePreview {
        self.delta_px = y - self.origin_y;
        let (top, height) = self.base_geometry();
        let min = self.min_height_px();
        match self.edge {
            ResizeEdge::Top => {
                let shift = self.delta_px.min(height - min);
                ResizePreview {
                    top_px: top + shift,
                    height_px: height - shift,
                }
            }
            ResizeEdge::Bottom => ResizePreview {
                top_px: top,
                height_px: (height + self.delta_px).max(min),
            },
        }
    }

    /// Converts the travel to time and snaps both boundaries to the
    /// half-hour grid. The held edge is snapped as well: it stays put when
    /// already aligned, but an off-grid one moves to the nearest half hour
    /// (a 10:15 end becomes 10:30 on a top-edge resize). The dragged edge
    /// stops `MIN_DURATION_MINUTES` short of the held one.
    pub fn release(self) -> Result<ResizeOutcome> {
        let delta = Duration::milliseconds(
            (self.delta_px / self.pixels_per_hour * 3_600_000.0).round() as i64,
        );
        let min = Duration::minutes(MIN_DURATION_MINUTES);

        let (start_time, end_time) = match self.edge {
            ResizeEdge::Top => {
                let end = snap_to_half_hour(self.end);
                let start = snap_to_half_hour(self.start + delta).min(end - min);
                (start, end)
            }
            ResizeEdge::Bottom => {
                let start = snap_to_half_hour(self.start);
                let end = snap_to_half_hour(self.end + delta).max(start + min);
                (start, end)
            }
        };
        Appointment::validate_window(start_time, end_time)?;
        Ok(ResizeOutcome {
            appointment_id: self.appointment_id,
            start_time,
            end_time,
        })
    }
}
