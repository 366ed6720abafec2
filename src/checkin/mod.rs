//! GPS-gated check-in and check-out.
//!
//! `not checked in -> checked_in -> completed`. Check-in needs a fresh
//! position within the appointment's radius; check-out only needs a prior
//! check-in.

#[cfg(test)]
mod tests;

use std::collections::VecDeque;

use thiserror::Error;

use crate::core::aliases::Instant;
use crate::core::models::{Appointment, CheckInRecord, GeoPoint};
use crate::core::types::AppointmentStatus;
use crate::errors::{Error, Result};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Classified geolocation failure; each class has its own guidance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeoError {
    #[error("Location permission was denied. Allow location access and try again.")]
    PermissionDenied,
    #[error("Your position is unavailable. Turn on GPS or move to an open area and try again.")]
    PositionUnavailable,
    #[error("Getting your location timed out. Check your signal and try again.")]
    Timeout,
    #[error("Could not get your location: {0}")]
    Unknown(String),
}

/// Device location source. Asked once per check-in attempt; never cached.
pub trait GeoProvider {
    fn current_position(&mut self) -> std::result::Result<GeoPoint, GeoError>;
}

/// Replays queued answers in order; the last one repeats.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPosition {
    answers: VecDeque<std::result::Result<GeoPoint, GeoError>>,
    last: Option<std::result::Result<GeoPoint, GeoError>>,
    requests: usize,
}

impl ScriptedPosition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(point: GeoPoint) -> Self {
        Self::new().then(Ok(point))
    }

    pub fn failing(err: GeoError) -> Self {
        Self::new().then(Err(err))
    }

    pub fn then(mut self, answer: std::result::Result<GeoPoint, GeoError>) -> Self {
        self.answers.push_back(answer);
        self
    }

    pub fn requests(&self) -> usize {
        self.requests
    }
}

impl GeoProvider for ScriptedPosition {
    fn current_position(&mut self) -> std::result::Result<GeoPoint, GeoError> {
        self.requests += 1;
        if let Some(next) = self.answers.pop_front() {
            self.last = Some(next.clone());
            return next;
        }
        self.last
            .clone()
            .unwrap_or_else(|| Err(GeoError::PositionUnavailable))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInState {
    NotCheckedIn,
    CheckedIn,
    Completed,
}

pub fn state_of(appt: &Appointment) -> CheckInState {
    match (&appt.check_in, appt.check_out_time) {
        (_, Some(_)) => CheckInState::Completed,
        (Some(_), None) => CheckInState::CheckedIn,
        (None, None) => CheckInState::NotCheckedIn,
    }
}

/// Great-circle distance in metres.
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

pub fn distance_to_site(appt: &Appointment, position: GeoPoint) -> Result<f64> {
    let site = appt.location.ok_or_else(|| {
        Error::validation(format!(
            "Appointment {} has no job site coordinates; check-in needs a location.",
            appt.id
        ))
    })?;
    Ok(haversine_m(site, position))
}

/// Records the check-in when `position` is inside the radius. Returns the
/// measured distance.
pub fn apply_check_in(appt: &mut Appointment, position: GeoPoint, now: Instant) -> Result<f64> {
    if matches!(
        appt.status,
        AppointmentStatus::Cancelled | AppointmentStatus::Completed
    ) || state_of(appt) != CheckInState::NotCheckedIn
    {
        return Err(Error::InvalidTransition(format!(
            "Appointment {} is {} and cannot be checked in.",
            appt.id,
            appt.status.label().to_lowercase()
        )));
    }

    let distance_m = distance_to_site(appt, position)?;
    if distance_m > appt.gps_check_in_radius {
        return Err(Error::TooFar {
            distance_m,
            radius_m: appt.gps_check_in_radius,
        });
    }

    appt.check_in = Some(CheckInRecord {
        time: now,
        location: position,
    });
    appt.status = AppointmentStatus::CheckedIn;
    Ok(distance_m)
}

pub fn apply_check_out(appt: &mut Appointment, now: Instant) -> Result<()> {
    if state_of(appt) != CheckInState::CheckedIn {
        return Err(Error::InvalidTransition(format!(
            "Appointment {} must be checked in before checking out.",
            appt.id
        )));
    }
    appt.check_out_time = Some(now);
    appt.status = AppointmentStatus::Completed;
    Ok(())
}
