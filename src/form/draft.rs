use crate::core::aliases::{Instant, ServiceOrderId};
use crate::core::models::{Appointment, Assignee, GeoPoint, RecurrenceConfig, ServiceOrder};
use crate::core::repository::Repository;
use crate::core::store::AppointmentPatch;
use crate::core::types::{AppointmentStatus, EditScope};
use crate::errors::{Error, Result, require_valid};
use crate::extensions::chrono::InstantExt;
use chrono::Duration;

/// Length of a draft opened from an empty slot.
pub const DEFAULT_SLOT_MINUTES: i64 = 60;

/// Editable copy of an appointment. Nothing here touches the cache until the
/// board saves it.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentForm {
    pub title: String,
    pub description: Option<String>,
    pub service_order_id: Option<ServiceOrderId>,
    pub start_time: Instant,
    pub end_time: Instant,
    pub assignees: Vec<Assignee>,
    pub location_address: Option<String>,
    pub location: Option<GeoPoint>,
    /// `None` falls back to the configured default radius.
    pub gps_check_in_radius: Option<f64>,
    pub status: AppointmentStatus,
    /// Only read when creating.
    pub recurrence: Option<RecurrenceConfig>,
}

impl AppointmentForm {
    pub fn new(start_time: Instant, end_time: Instant) -> Self {
        Self {
            title: String::new(),
            description: None,
            service_order_id: None,
            start_time,
            end_time,
            assignees: Vec::new(),
            location_address: None,
            location: None,
            gps_check_in_radius: None,
            status: AppointmentStatus::Draft,
            recurrence: None,
        }
    }

    /// Draft prefilled from a service order dropped on a slot.
    pub fn for_slot(order: &ServiceOrder, start_time: Instant, assignees: Vec<Assignee>) -> Self {
        let mut form = Self::new(start_time, start_time + Duration::minutes(DEFAULT_SLOT_MINUTES));
        form.title = order.title.clone();
        form.service_order_id = Some(order.id);
        form.assignees = assignees;
        form
    }

    pub fn from_appointment(appt: &Appointment) -> Self {
        Self {
            title: appt.title.clone(),
            description: appt.description.clone(),
            service_order_id: Some(appt.service_order_id),
            start_time: appt.start_time,
            end_time: appt.end_time,
            assignees: appt.assignees().copied().collect(),
            location_address: appt.location_address.clone(),
            location: appt.location,
            gps_check_in_radius: Some(appt.gps_check_in_radius),
            status: appt.status,
            recurrence: appt.recurrence.clone(),
        }
    }

    pub fn validate(&self, orders: &Repository<ServiceOrder>) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("Enter a title."));
        }
        let order = require_valid(self.service_order_id, "Select a service order.")?;
        if !orders.contains(order) {
            return Err(Error::validation(format!(
                "Service order {order} does not exist."
            )));
        }
        Appointment::validate_window(self.start_time, self.end_time)?;
        if let Some(radius) = self.gps_check_in_radius {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(Error::validation(
                    "Check-in radius must be greater than zero.",
                ));
            }
        }
        if let Some(rule) = &self.recurrence {
            rule.validate()?;
            if let Some(end) = rule.end_date {
                if end <= self.start_time.local_date() {
                    return Err(Error::validation(
                        "Repeat end date must be after the first occurrence.",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Template appointment for a create. The id is a placeholder.
    pub fn to_appointment(&self, default_radius: f64) -> Result<Appointment> {
        let order = require_valid(self.service_order_id, "Select a service order.")?;
        let mut appt = Appointment::new(self.title.trim(), order, self.start_time, self.end_time)?;
        appt.status = self.status;
        appt.gps_check_in_radius = default_radius;
        self.apply_to(&mut appt)?;
        Ok(appt)
    }

    /// Single-occurrence edit: every field lands on `appt`; series links and
    /// check-in records are kept.
    pub fn apply_to(&self, appt: &mut Appointment) -> Result<()> {
        let order = require_valid(self.service_order_id, "Select a service order.")?;
        appt.reschedule(self.start_time, self.end_time)?;
        appt.title = self.title.trim().to_string();
        appt.description = self.description.clone();
        appt.service_order_id = order;
        appt.status = self.status;
        appt.location_address = self.location_address.clone();
        appt.location = self.location;
        if let Some(radius) = self.gps_check_in_radius {
            appt.gps_check_in_radius = radius;
        }
        appt.set_assignees(self.assignees.iter().copied());
        Ok(())
    }

    /// Diff against `original` expressed relative to it, so the same patch
    /// moves every later occurrence by the same amount.
    pub fn series_patch(&self, original: &Appointment) -> AppointmentPatch {
        let mut patch = AppointmentPatch::default();

        let shift = self.start_time - original.start_time;
        if shift != Duration::zero() {
            patch.shift = Some(shift);
        }
        let duration = self.end_time - self.start_time;
        if duration != original.duration() {
            patch.duration = Some(duration);
        }

        let title = self.title.trim();
        if title != original.title {
            patch.title = Some(title.to_string());
        }
        if self.description != original.description {
            patch.description = Some(self.description.clone());
        }
        if let Some(order) = self.service_order_id.filter(|o| *o != original.service_order_id) {
            patch.service_order_id = Some(order);
        }
        if self.status != original.status {
            patch.status = Some(self.status);
        }
        if self.location_address != original.location_address {
            patch.location_address = Some(self.location_address.clone());
        }
        if self.location != original.location {
            patch.location = Some(self.location);
        }
        if let Some(radius) = self
            .gps_check_in_radius
            .filter(|r| *r != original.gps_check_in_radius)
        {
            patch.gps_check_in_radius = Some(radius);
        }
        if !original.assignees().copied().eq(self.assignees.iter().copied()) {
            patch.assignees = Some(self.assignees.clone());
        }
        patch
    }
}

/// Scope a save or delete runs with. Appointments outside a series ignore
/// `scope`; series members must name one.
pub fn resolve_scope(appt: &Appointment, scope: Option<EditScope>) -> Result<EditScope> {
    if !appt.is_part_of_series() {
        return Ok(EditScope::ThisOccurrence);
    }
    scope.ok_or(Error::ScopeRequired { id: appt.id })
}
