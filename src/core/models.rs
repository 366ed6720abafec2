use crate::core::aliases::{AppointmentId, ContactId, Instant, ServiceOrderId, WorkerId};
use crate::core::types::{AppointmentStatus, DayOfWeek, RecurrencePattern, TimeRange};
use crate::errors::{Error, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub trait BaseEntity {
    fn id(&self) -> i32;
    fn set_id(&mut self, id: i32);
}

macro_rules! impl_base_entity {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl BaseEntity for $ty {
                fn id(&self) -> i32 {
                    self.id
                }
                fn set_id(&mut self, id: i32) {
                    self.id = id;
                }
            }
        )+
    };
}

/// Who an appointment link points at. A link is either an internal worker
/// or an external subcontractor contact, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Assignee {
    Internal(WorkerId),
    External(ContactId),
}

impl fmt::Display for Assignee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assignee::Internal(id) => write!(f, "worker:{id}"),
            Assignee::External(id) => write!(f, "contact:{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentWorker {
    pub appointment_id: AppointmentId,
    pub assignee: Assignee,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInRecord {
    pub time: Instant,
    pub location: GeoPoint,
}

/// Recurrence rule captured by the form. Consumed once to materialize
/// instances, then kept on the series parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceConfig {
    pub pattern: RecurrencePattern,
    pub frequency: u32,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub days_of_week: Vec<DayOfWeek>,
}

/// Largest accepted "every N days/weeks/months".
pub const MAX_REPEAT_FREQUENCY: u32 = 999;

impl RecurrenceConfig {
    pub fn new(pattern: RecurrencePattern, frequency: u32) -> Self {
        Self {
            pattern,
            frequency,
            end_date: None,
            days_of_week: Vec::new(),
        }
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn on_days(mut self, days: Vec<DayOfWeek>) -> Self {
        self.days_of_week = days;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.frequency == 0 {
            return Err(Error::validation("Repeat frequency must be at least 1."));
        }
        if self.frequency > MAX_REPEAT_FREQUENCY {
            return Err(Error::validation(format!(
                "Repeat frequency must be at most {MAX_REPEAT_FREQUENCY}, got {}.",
                self.frequency
            )));
        }
        if !self.days_of_week.is_empty() && self.pattern != RecurrencePattern::Weekly {
            return Err(Error::validation(
                "Days of the week only apply to weekly recurrence.",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub service_order_id: ServiceOrderId,
    pub start_time: Instant,
    pub end_time: Instant,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub workers: Vec<AppointmentWorker>,
    #[serde(default)]
    pub location_address: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    pub gps_check_in_radius: f64,
    #[serde(default)]
    pub check_in: Option<CheckInRecord>,
    #[serde(default)]
    pub check_out_time: Option<Instant>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence: Option<RecurrenceConfig>,
    #[serde(default)]
    pub parent_appointment_id: Option<AppointmentId>,
}

pub const DEFAULT_GPS_RADIUS_M: f64 = 100.0;

impl Appointment {
    pub fn new(
        title: impl Into<String>,
        service_order_id: ServiceOrderId,
        start_time: Instant,
        end_time: Instant,
    ) -> Result<Self> {
        Self::validate_window(start_time, end_time)?;
        Ok(Self {
            id: 1,
            title: title.into(),
            description: None,
            service_order_id,
            start_time,
            end_time,
            status: AppointmentStatus::Draft,
            workers: Vec::new(),
            location_address: None,
            location: None,
            gps_check_in_radius: DEFAULT_GPS_RADIUS_M,
            check_in: None,
            check_out_time: None,
            is_recurring: false,
            recurrence: None,
            parent_appointment_id: None,
        })
    }

    pub fn validate_window(start: Instant, end: Instant) -> Result<()> {
        if end <= start {
            return Err(Error::validation(format!(
                "End time {} must be after start time {}.",
                end.format("%Y-%m-%d %H:%M"),
                start.format("%Y-%m-%d %H:%M")
            )));
        }
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration().num_minutes() as f64 / 60.0
    }

    /// Series id: the parent's id for children, own id for a recurring parent.
    pub fn series_id(&self) -> Option<AppointmentId> {
        match self.parent_appointment_id {
            Some(parent) => Some(parent),
            None if self.is_recurring => Some(self.id),
            None => None,
        }
    }

    pub fn is_part_of_series(&self) -> bool {
        self.is_recurring || self.parent_appointment_id.is_some()
    }

    pub fn assignees(&self) -> impl Iterator<Item = &Assignee> {
        self.workers.iter().map(|w| &w.assignee)
    }

    pub fn is_assigned_to(&self, assignee: &Assignee) -> bool {
        self.assignees().any(|a| a == assignee)
    }

    pub fn is_unassigned(&self) -> bool {
        self.workers.is_empty()
    }

    /// Replaces every link; duplicates collapse to one.
    pub fn set_assignees(&mut self, assignees: impl IntoIterator<Item = Assignee>) {
        self.workers.clear();
        for assignee in assignees {
            if !self.is_assigned_to(&assignee) {
                self.workers.push(AppointmentWorker {
                    appointment_id: self.id,
                    assignee,
                });
            }
        }
    }

    pub fn reschedule(&mut self, start_time: Instant, end_time: Instant) -> Result<()> {
        Self::validate_window(start_time, end_time)?;
        self.start_time = start_time;
        self.end_time = end_time;
        Ok(())
    }

    /// Moves the appointment to `start_time`, keeping its duration.
    pub fn shift_to(&mut self, start_time: Instant) {
        let duration = self.duration();
        self.start_time = start_time;
        self.end_time = start_time + duration;
    }
}
impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let workers = if self.workers.is_empty() {
            "Unassigned".to_string()
        } else {
            self.assignees()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(
            f,
            "Appointment(id={}, title='{}', {}-{}, status={}, workers=[{}])",
            self.id,
            self.title,
            self.start_time.format("%Y-%m-%d %H:%M"),
            self.end_time.format("%H:%M"),
            self.status,
            workers
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub name: String,
    /// Contracted hours per week; `None` means utilization is not tracked.
    #[serde(default)]
    pub standard_work_hours: Option<f64>,
}
impl Worker {
    pub fn new(name: impl Into<String>, standard_work_hours: Option<f64>) -> Self {
        Self {
            id: 1,
            name: name.into(),
            standard_work_hours,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcontractor {
    pub id: ContactId,
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
}
impl Subcontractor {
    pub fn new(name: impl Into<String>, company: Option<String>) -> Self {
        Self {
            id: 1,
            name: name.into(),
            company,
        }
    }

    pub fn display_name(&self) -> String {
        match &self.company {
            Some(company) => format!("{} ({company})", self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub id: ServiceOrderId,
    pub order_number: String,
    pub title: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub preferred_date: Option<NaiveDate>,
    #[serde(default)]
    pub preferred_date_range: Option<(NaiveDate, NaiveDate)>,
}
impl ServiceOrder {
    pub fn new(order_number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: 1,
            order_number: order_number.into(),
            title: title.into(),
            customer_name: None,
            estimated_hours: None,
            preferred_date: None,
            preferred_date_range: None,
        }
    }

    pub fn is_preferred_day(&self, date: NaiveDate) -> bool {
        self.preferred_date == Some(date)
            || self
                .preferred_date_range
                .is_some_and(|(from, to)| from <= date && date <= to)
    }
}

impl fmt::Display for ServiceOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.order_number, self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSchedule {
    pub id: i32,
    pub worker_id: WorkerId,
    pub day_of_week: DayOfWeek,
    pub hours: TimeRange,
    pub is_active: bool,
}
impl WorkerSchedule {
    pub fn new(worker_id: WorkerId, day_of_week: DayOfWeek, hours: TimeRange) -> Self {
        Self {
            id: 1,
            worker_id,
            day_of_week,
            hours,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerUnavailability {
    pub id: i32,
    pub worker_id: WorkerId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
}
impl WorkerUnavailability {
    pub fn new(worker_id: WorkerId, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: 1,
            worker_id,
            start_date,
            end_date,
            reason: None,
        }
    }

    /// Both ends are inclusive.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

impl_base_entity!(
    Appointment,
    Worker,
    Subcontractor,
    ServiceOrder,
    WorkerSchedule,
    WorkerUnavailability,
);
