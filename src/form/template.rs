use crate::core::aliases::{Instant, ServiceOrderId};
use crate::core::models::{Appointment, Assignee, GeoPoint};
use crate::form::draft::AppointmentForm;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Reusable appointment shape: what to do, for how long, by whom, where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentTemplate {
    pub name: String,
    pub title: String,
    pub duration_minutes: i64,
    #[serde(default)]
    pub assignees: Vec<Assignee>,
    pub gps_check_in_radius: f64,
    #[serde(default)]
    pub location_address: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

impl AppointmentTemplate {
    pub fn from_appointment(name: impl Into<String>, appt: &Appointment) -> Self {
        Self {
            name: name.into(),
            title: appt.title.clone(),
            duration_minutes: appt.duration().num_minutes(),
            assignees: appt.assignees().copied().collect(),
            gps_check_in_radius: appt.gps_check_in_radius,
            location_address: appt.location_address.clone(),
            location: appt.location,
        }
    }

    /// Form draft starting at `start`; dates, status and recurrence are
    /// never carried over.
    pub fn instantiate(&self, start: Instant, service_order_id: ServiceOrderId) -> AppointmentForm {
        let mut form = AppointmentForm::new(start, start + Duration::minutes(self.duration_minutes));
        form.title = self.title.clone();
        form.service_order_id = Some(service_order_id);
        form.assignees = self.assignees.clone();
        form.gps_check_in_radius = Some(self.gps_check_in_radius);
        form.location_address = self.location_address.clone();
        form.location = self.location;
        form
    }
}
