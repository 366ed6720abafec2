use crate::core::aliases::{AppointmentId, Instant, ServiceOrderId};
use crate::core::models::{Appointment, Assignee, GeoPoint};
use crate::core::repository::{Repository, Sort};
use crate::core::types::AppointmentStatus;
use crate::errors::{Error, Result};
use chrono::Duration;
use std::cell::Cell;

/// Series predicate: `(parent == series OR id == series) AND start >= cutoff`.
/// Instances before the cutoff are never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesSelector {
    pub series_id: AppointmentId,
    pub cutoff: Instant,
}

impl SeriesSelector {
    pub fn new(series_id: AppointmentId, cutoff: Instant) -> Self {
        Self { series_id, cutoff }
    }

    /// Selector for "this and future" starting at `target`. `None` when the
    /// appointment is not part of a series.
    pub fn from_target(target: &Appointment) -> Option<Self> {
        target
            .series_id()
            .map(|series_id| Self::new(series_id, target.start_time))
    }

    pub fn matches(&self, appt: &Appointment) -> bool {
        let in_series =
            appt.parent_appointment_id == Some(self.series_id) || appt.id == self.series_id;
        in_series && appt.start_time >= self.cutoff
    }
}

/// Field changes applied identically to every selected appointment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub service_order_id: Option<ServiceOrderId>,
    pub status: Option<AppointmentStatus>,
    pub location_address: Option<Option<String>>,
    pub location: Option<Option<GeoPoint>>,
    pub gps_check_in_radius: Option<f64>,
    /// Offset added to both boundaries.
    pub shift: Option<Duration>,
    /// New length measured from the (shifted) start.
    pub duration: Option<Duration>,
    pub assignees: Option<Vec<Assignee>>,
}

impl AppointmentPatch {
    pub fn is_empty(&self) -> bool {
        *self == AppointmentPatch::default()
    }

    pub fn apply(&self, appt: &mut Appointment) -> Result<()> {
        let mut start = appt.start_time;
        let mut end = appt.end_time;
        if let Some(shift) = self.shift {
            start += shift;
            end += shift;
        }
        if let Some(duration) = self.duration {
            end = start + duration;
        }
        appt.reschedule(start, end)?;

        if let Some(title) = &self.title {
            appt.title = title.clone();
        }
        if let Some(description) = &self.description {
            appt.description = description.clone();
        }
        if let Some(order) = self.service_order_id {
            appt.service_order_id = order;
        }
        if let Some(status) = self.status {
            appt.status = status;
        }
        if let Some(address) = &self.location_address {
            appt.location_address = address.clone();
        }
        if let Some(location) = self.location {
            appt.location = location;
        }
        if let Some(radius) = self.gps_check_in_radius {
            appt.gps_check_in_radius = radius;
        }
        if let Some(assignees) = &self.assignees {
            appt.set_assignees(assignees.iter().copied());
        }
        Ok(())
    }
}

/// Remote appointment data API. Every write is all-or-nothing per call.
pub trait AppointmentStore {
    /// Appointments overlapping `[from, to)`, assignments embedded.
    fn fetch_range(&self, from: Instant, to: Instant) -> Result<Vec<Appointment>>;

    /// Hands out `count` consecutive unused ids and returns the first. Ids
    /// are never handed out twice, even if the rows are never inserted.
    fn reserve_ids(&mut self, count: usize) -> Result<AppointmentId>;

    /// Parent plus recurrence children land in one call.
    fn insert_many(&mut self, rows: &[Appointment]) -> Result<()>;

    fn update_one(&mut self, row: &Appointment) -> Result<()>;

    fn update_series(
        &mut self,
        selector: &SeriesSelector,
        patch: &AppointmentPatch,
    ) -> Result<usize>;

    fn delete_one(&mut self, id: AppointmentId) -> Result<()>;

    fn delete_series(&mut self, selector: &SeriesSelector) -> Result<usize>;

    /// Delete every link of `id`, then insert `assignees`. Never a diff.
    fn replace_assignments(&mut self, id: AppointmentId, assignees: &[Assignee]) -> Result<()>;
}

/// In-process store. Can be switched offline to exercise rollback.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Repository<Appointment>,
    offline: Option<String>,
    calls: Cell<usize>,
    next_reserved: AppointmentId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: impl IntoIterator<Item = Appointment>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Every subsequent call fails with `reason` until `set_online`.
    pub fn set_offline(&mut self, reason: impl Into<String>) {
        self.offline = Some(reason.into());
    }

    pub fn set_online(&mut self) {
        self.offline = None;
    }

    /// Number of calls received, reads and failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }

    pub fn rows(&self) -> &Repository<Appointment> {
        &self.rows
    }

    fn check(&self) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        match &self.offline {
            Some(reason) => Err(Error::persistence(reason.clone())),
            None => Ok(()),
        }
    }

    fn stored_mut(&mut self, id: AppointmentId) -> Result<&mut Appointment> {
        self.rows
            .get_mut(id)
            .map_err(|_| Error::persistence(format!("appointment {id} does not exist")))
    }
}

impl AppointmentStore for MemoryStore {
    fn fetch_range(&self, from: Instant, to: Instant) -> Result<Vec<Appointment>> {
        self.check()?;
        Ok(self
            .rows
            .query()
            .r#where(|a| a.start_time < to && a.end_time > from)
            .order_with(|a, b| a.start_time.cmp(&b.start_time))
            .collect()
            .into_iter()
            .cloned()
            .collect())
    }

    fn reserve_ids(&mut self, count: usize) -> Result<AppointmentId> {
        self.check()?;
        let first = self.rows.peek_next_id().max(self.next_reserved);
        self.next_reserved = AppointmentId::try_from(count)
            .ok()
            .and_then(|n| first.checked_add(n))
            .ok_or_else(|| Error::persistence(format!("cannot reserve {count} ids")))?;
        Ok(first)
    }

    fn insert_many(&mut self, rows: &[Appointment]) -> Result<()> {
        self.check()?;
        if let Some(dup) = rows.iter().find(|r| self.rows.contains(r.id)) {
            return Err(Error::persistence(format!(
                "appointment {} already exists",
                dup.id
            )));
        }
        for row in rows {
            self.rows.upsert(row.clone());
        }
        Ok(())
    }

    fn update_one(&mut self, row: &Appointment) -> Result<()> {
        self.check()?;
        *self.stored_mut(row.id)? = row.clone();
        Ok(())
    }

    fn update_series(
        &mut self,
        selector: &SeriesSelector,
        patch: &AppointmentPatch,
    ) -> Result<usize> {
        self.check()?;
        // every selected row is validated before any row is written
        let mut patched = Vec::new();
        for row in self.rows.values(Sort::IdAsc) {
            if selector.matches(row) {
                let mut copy = row.clone();
                patch.apply(&mut copy)?;
                patched.push(copy);
            }
        }
        let count = patched.len();
        for row in patched {
            self.rows.upsert(row);
        }
        Ok(count)
    }

    fn delete_one(&mut self, id: AppointmentId) -> Result<()> {
        self.check()?;
        self.rows
            .delete(id)
            .map(|_| ())
            .map_err(|_| Error::persistence(format!("appointment {id} does not exist")))
    }

    fn delete_series(&mut self, selector: &SeriesSelector) -> Result<usize> {
        self.check()?;
        let selector = *selector;
        Ok(self
            .rows
            .query_mut()
            .r#where(move |a| selector.matches(a))
            .remove_all()
            .len())
    }

    fn replace_assignments(&mut self, id: AppointmentId, assignees: &[Assignee]) -> Result<()> {
        self.check()?;
        let row = self.stored_mut(id)?;
        row.set_assignees(assignees.iter().copied());
        Ok(())
    }
}
