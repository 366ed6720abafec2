use super::*;
use crate::core::models::{Appointment, GeoPoint};
use crate::core::types::AppointmentStatus;
use chrono::DateTime;

const SITE: GeoPoint = GeoPoint {
    lat: 40.7128,
    lng: -74.0060,
};

fn at(s: &str) -> Instant {
    DateTime::parse_from_rfc3339(s).unwrap()
}

/// Point `metres` due north of the site.
fn north_of_site(metres: f64) -> GeoPoint {
    let dlat = (metres / EARTH_RADIUS_M).to_degrees();
    GeoPoint::new(SITE.lat + dlat, SITE.lng)
}

fn job() -> Appointment {
    let mut appt = Appointment::new(
        "Boiler service",
        1,
        at("2024-01-03T09:00:00+00:00"),
        at("2024-01-03T11:00:00+00:00"),
    )
    .unwrap();
    appt.status = AppointmentStatus::Published;
    appt.location = Some(SITE);
    appt.gps_check_in_radius = 100.0;
    appt
}

#[test]
fn haversine_matches_known_distances() {
    assert_eq!(haversine_m(SITE, SITE), 0.0);

    let one_degree = haversine_m(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 0.0));
    assert!((one_degree - 111_194.93).abs() < 1.0, "{one_degree}");

    let d = haversine_m(SITE, north_of_site(150.0));
    assert!((d - 150.0).abs() < 0.01, "{d}");
}

#[test]
fn haversine_is_symmetric() {
    let other = GeoPoint::new(51.5074, -0.1278);
    assert!((haversine_m(SITE, other) - haversine_m(other, SITE)).abs() < 1e-6);
}

#[test]
fn check_in_too_far_is_rejected() {
    let mut appt = job();
    let err = apply_check_in(&mut appt, north_of_site(150.0), at("2024-01-03T09:02:00+00:00"))
        .unwrap_err();
    match err {
        Error::TooFar {
            distance_m,
            radius_m,
        } => {
            assert!((distance_m - 150.0).abs() < 0.01);
            assert_eq!(radius_m, 100.0);
        }
        other => panic!("expected too far, got {other:?}"),
    }
    assert_eq!(appt.status, AppointmentStatus::Published);
    assert!(appt.check_in.is_none());
}

#[test]
fn check_in_within_radius_records_position() {
    let mut appt = job();
    let now = at("2024-01-03T09:02:00+00:00");
    let position = north_of_site(50.0);
    let distance = apply_check_in(&mut appt, position, now).unwrap();

    assert!((distance - 50.0).abs() < 0.01);
    assert_eq!(appt.status, AppointmentStatus::CheckedIn);
    let record = appt.check_in.as_ref().unwrap();
    assert_eq!(record.time, now);
    assert_eq!(record.location, position);
    assert_eq!(state_of(&appt), CheckInState::CheckedIn);
}

#[test]
fn check_in_on_the_radius_boundary_is_allowed() {
    let mut appt = job();
    appt.gps_check_in_radius = 200.0;
    assert!(apply_check_in(&mut appt, north_of_site(199.9), at("2024-01-03T09:00:00+00:00")).is_ok());
}

#[test]
fn check_in_needs_site_coordinates() {
    let mut appt = job();
    appt.location = None;
    let err = apply_check_in(&mut appt, SITE, at("2024-01-03T09:00:00+00:00")).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn check_in_twice_is_an_invalid_transition() {
    let mut appt = job();
    let now = at("2024-01-03T09:00:00+00:00");
    apply_check_in(&mut appt, SITE, now).unwrap();
    let err = apply_check_in(&mut appt, SITE, now).unwrap_err();
    assert!(matches!(err, Error::InvalidTransition(_)));
}

#[test]
fn cancelled_appointment_cannot_be_checked_in() {
    let mut appt = job();
    appt.status = AppointmentStatus::Cancelled;
    let err = apply_check_in(&mut appt, SITE, at("2024-01-03T09:00:00+00:00")).unwrap_err();
    assert!(matches!(err, Error::InvalidTransition(_)));
}

#[test]
fn check_out_requires_check_in_and_completes() {
    let mut appt = job();
    let err = apply_check_out(&mut appt, at("2024-01-03T11:00:00+00:00")).unwrap_err();
    assert!(matches!(err, Error::InvalidTransition(_)));

    apply_check_in(&mut appt, SITE, at("2024-01-03T09:00:00+00:00")).unwrap();
    let out = at("2024-01-03T11:05:00+00:00");
    apply_check_out(&mut appt, out).unwrap();
    assert_eq!(appt.status, AppointmentStatus::Completed);
    assert_eq!(appt.check_out_time, Some(out));
    assert_eq!(state_of(&appt), CheckInState::Completed);
}

#[test]
fn geo_errors_have_distinct_messages() {
    let messages = [
        GeoError::PermissionDenied.to_string(),
        GeoError::PositionUnavailable.to_string(),
        GeoError::Timeout.to_string(),
        GeoError::Unknown("sensor fault".into()).to_string(),
    ];
    for (i, a) in messages.iter().enumerate() {
        for b in messages.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
    assert!(messages[3].contains("sensor fault"));
}

#[test]
fn scripted_position_replays_and_counts_requests() {
    let mut provider = ScriptedPosition::failing(GeoError::Timeout).then(Ok(SITE));
    assert_eq!(provider.current_position(), Err(GeoError::Timeout));
    assert_eq!(provider.current_position(), Ok(SITE));
    assert_eq!(provider.current_position(), Ok(SITE));
    assert_eq!(provider.requests(), 3);
}
