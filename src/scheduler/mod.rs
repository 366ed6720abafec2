use crate::checkin::{self, GeoProvider};
use crate::core::aliases::{AppointmentId, Instant};
use crate::core::context::{BoardContext, NoticeLevel};
use crate::core::models::{Appointment, Assignee};
use crate::core::repository::Repository;
use crate::core::store::{AppointmentPatch, AppointmentStore, SeriesSelector};
use crate::core::transaction::PendingMutation;
use crate::core::types::{AppointmentStatus, EditScope};
use crate::errors::{Error, Result};
use crate::form::{AppointmentForm, resolve_scope};
use crate::interaction::dnd::{AssignMode, DropIntent};
use crate::logging::{LogTarget, Logger};
use crate::scheduler::conflict::{Conflict, check_recurring_conflicts};
use crate::scheduler::recurrence::{
    RecurrenceLimits, generate_recurring_instances, materialize_series,
};
use std::collections::BTreeSet;

pub mod availability;
pub mod calendar_view;
pub mod conflict;
pub mod recurrence;
#[cfg(test)]
mod tests;

/// Hooks around every optimistic mutation. All methods default to no-ops.
pub trait MutationObserver {
    /// The patch is visible in the cache; the store has not answered yet.
    fn mutation_applied(&self, _label: &str, _cache: &Repository<Appointment>) {}
    fn mutation_committed(&self, _label: &str) {}
    fn mutation_reverted(&self, _label: &str, _error: &Error) {}
    fn series_blocked(&self, _conflicts: &[Conflict]) {}
    fn check_in_attempted(&self, _id: AppointmentId, _outcome: &Result<f64>) {}
}

pub struct LoggerObserver {
    pub logger: Logger,
}

impl MutationObserver for LoggerObserver {
    fn mutation_applied(&self, label: &str, _cache: &Repository<Appointment>) {
        self.logger.info(format!("Begin {label}"), LogTarget::FileOnly);
    }

    fn mutation_committed(&self, label: &str) {
        self.logger.info(format!("Committed {label}"), LogTarget::FileOnly);
    }

    fn mutation_reverted(&self, label: &str, error: &Error) {
        self.logger
            .error(format!("Reverted {label}: {error}"), LogTarget::FileOnly);
    }

    fn series_blocked(&self, conflicts: &[Conflict]) {
        for c in conflicts {
            self.logger.warn(
                format!(
                    "Occurrence {} ({} to {}) overlaps appointment {}",
                    c.index,
                    c.start_time.format("%Y-%m-%d %H:%M"),
                    c.end_time.format("%H:%M"),
                    c.existing_id
                ),
                LogTarget::FileOnly,
            );
        }
    }

    fn check_in_attempted(&self, id: AppointmentId, outcome: &Result<f64>) {
        match outcome {
            Ok(distance) => self.logger.info(
                format!("Appointment {id} checked in at {distance:.0}m from site"),
                LogTarget::FileOnly,
            ),
            Err(e) => self.logger.warn(
                format!("Check-in for appointment {id} refused: {e}"),
                LogTarget::FileOnly,
            ),
        }
    }
}

/// What a settled drop did to the board.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Moved(AppointmentId),
    Assigned(AppointmentId),
    StatusChanged(AppointmentId),
    Resized(AppointmentId),
    /// Nothing changed; the front end opens this form.
    DraftRequested(AppointmentForm),
}

/// Runs every board mutation through the optimistic protocol: snapshot,
/// patch the shared cache, persist, then commit or revert. Each public
/// operation leaves exactly one notice on the context.
pub struct BoardManager<'a> {
    ctx: &'a mut BoardContext,
    store: &'a mut dyn AppointmentStore,
    observers: Vec<Box<dyn MutationObserver + 'a>>,
}

impl<'a> BoardManager<'a> {
    pub fn new(ctx: &'a mut BoardContext, store: &'a mut dyn AppointmentStore) -> Self {
        let logger = ctx.logger.clone();
        Self {
            ctx,
            store,
            observers: vec![Box::new(LoggerObserver { logger })],
        }
    }

    pub fn with_observer(mut self, observer: impl MutationObserver + 'a) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn context(&self) -> &BoardContext {
        &*self.ctx
    }

    /// First half of the protocol. Several tickets may be open at once.
    pub fn begin<F>(&mut self, label: impl Into<String>, patch: F) -> Result<PendingMutation>
    where
        F: FnOnce(&mut Repository<Appointment>) -> Result<()>,
    {
        let ticket = PendingMutation::begin(self.ctx, label, patch)?;
        for o in &self.observers {
            o.mutation_applied(ticket.label(), &self.ctx.appointments);
        }
        Ok(ticket)
    }

    /// Second half: keeps the patch on success, restores the ticket's
    /// snapshot on failure. The store's answer is passed through.
    pub fn settle<T>(&mut self, ticket: PendingMutation, answer: Result<T>) -> Result<T> {
        let label = ticket.label().to_string();
        match &answer {
            Ok(_) => {
                ticket.commit();
                for o in &self.observers {
                    o.mutation_committed(&label);
                }
            }
            Err(e) => {
                ticket.revert(self.ctx);
                for o in &self.observers {
                    o.mutation_reverted(&label, e);
                }
            }
        }
        answer
    }

    fn report<T>(
        &mut self,
        result: Result<T>,
        success: impl FnOnce(&T) -> Option<String>,
    ) -> Result<T> {
        match &result {
            Ok(value) => {
                if let Some(message) = success(value) {
                    self.ctx.notify(NoticeLevel::Success, message);
                }
            }
            Err(e) => self.ctx.notify(NoticeLevel::Error, e.to_string()),
        }
        result
    }

    fn cached(&self, id: AppointmentId) -> Result<Appointment> {
        self.ctx
            .appointments
            .get(id)
            .cloned()
            .map_err(|_| Error::not_found("Appointment", id))
    }

    /// Replaces the cached appointments overlapping `[from, to)` with the
    /// store's view of that range.
    pub fn refresh(&mut self, from: Instant, to: Instant) -> Result<usize> {
        let result = self.store.fetch_range(from, to).map(|rows| {
            self.ctx
                .appointments
                .query_mut()
                .r#where(move |a| a.start_time < to && a.end_time > from)
                .remove_all();
            let count = rows.len();
            for row in rows {
                self.ctx.appointments.upsert(row);
            }
            count
        });
        self.report(result, |_| None)
    }

    /// Creates one appointment, or a whole series when the form carries a
    /// recurrence rule. A series that overlaps existing work for any of its
    /// assignees is refused before anything is written. Ids come from the
    /// store, since the cache only holds the fetched range.
    pub fn create(&mut self, form: &AppointmentForm) -> Result<Vec<AppointmentId>> {
        let result = self.try_create(form);
        self.report(result, |ids| {
            Some(match ids.len() {
                1 => "Appointment created.".to_string(),
                n => format!("Created {n} recurring appointments."),
            })
        })
    }

    fn try_create(&mut self, form: &AppointmentForm) -> Result<Vec<AppointmentId>> {
        form.validate(&self.ctx.service_orders)?;
        let template = form.to_appointment(self.ctx.config.default_gps_radius_m())?;

        let instances = match &form.recurrence {
            Some(rule) => {
                let limits = RecurrenceLimits::from_config(&self.ctx.config);
                let instances = generate_recurring_instances(&template, rule, limits)?;
                self.block_conflicts(&instances, &form.assignees)?;
                instances
            }
            None => vec![template],
        };

        let first_id = self.store.reserve_ids(instances.len())?;
        let rows = materialize_series(instances, first_id, form.recurrence.as_ref());
        let ids: Vec<AppointmentId> = rows.iter().map(|r| r.id).collect();
        let label = format!("create of appointment {}", ids[0]);

        let staged = rows.clone();
        let ticket = self.begin(label, move |repo| {
            for row in staged {
                repo.insert_with_id(row)?;
            }
            Ok(())
        })?;
        let answer = self.store.insert_many(&rows);
        self.settle(ticket, answer).map(|_| ids)
    }

    fn block_conflicts(&self, instances: &[Appointment], assignees: &[Assignee]) -> Result<()> {
        let mut conflicts = Vec::new();
        for assignee in assignees {
            conflicts.extend(check_recurring_conflicts(
                instances,
                self.ctx.appointments.query().collect(),
                *assignee,
            ));
        }
        if conflicts.is_empty() {
            return Ok(());
        }
        for o in &self.observers {
            o.series_blocked(&conflicts);
        }
        let count = conflicts
            .iter()
            .map(|c| c.index)
            .collect::<BTreeSet<_>>()
            .len();
        Err(Error::Conflict { count })
    }

    /// Saves `form` over appointment `id`. Series members need a scope;
    /// returns how many appointments changed.
    pub fn save(
        &mut self,
        id: AppointmentId,
        form: &AppointmentForm,
        scope: Option<EditScope>,
    ) -> Result<usize> {
        let result = self.try_save(id, form, scope);
        self.report(result, |n| {
            Some(match n {
                0 => "No changes to save.".to_string(),
                1 => "Appointment updated.".to_string(),
                n => format!("Updated {n} appointments."),
            })
        })
    }

    fn try_save(
        &mut self,
        id: AppointmentId,
        form: &AppointmentForm,
        scope: Option<EditScope>,
    ) -> Result<usize> {
        let original = self.cached(id)?;
        form.validate(&self.ctx.service_orders)?;

        match resolve_scope(&original, scope)? {
            EditScope::ThisOccurrence => {
                let mut updated = original.clone();
                form.apply_to(&mut updated)?;
                if updated == original {
                    return Ok(0);
                }
                let staged = updated.clone();
                let ticket = self.begin(format!("edit of appointment {id}"), move |repo| {
                    repo.upsert(staged);
                    Ok(())
                })?;
                let answer = self
                    .store
                    .update_one(&updated)
                    .and_then(|_| self.store.replace_assignments(id, &form.assignees));
                self.settle(ticket, answer).map(|_| 1)
            }
            EditScope::ThisAndFuture => {
                let patch = form.series_patch(&original);
                if patch.is_empty() {
                    return Ok(0);
                }
                let selector = SeriesSelector::from_target(&original)
                    .ok_or(Error::ScopeRequired { id })?;
                let staged = patch.clone();
                let label = format!(
                    "edit of series {} from {}",
                    selector.series_id,
                    selector.cutoff.format("%Y-%m-%d %H:%M")
                );
                let ticket = self.begin(label, move |repo| patch_series(repo, &selector, &staged))?;
                let answer = self.store.update_series(&selector, &patch);
                self.settle(ticket, answer)
            }
        }
    }

    /// Deletes appointment `id`, or it and every later occurrence.
    pub fn delete(&mut self, id: AppointmentId, scope: Option<EditScope>) -> Result<usize> {
        let result = self.try_delete(id, scope);
        self.report(result, |n| {
            Some(match n {
                1 => "Appointment deleted.".to_string(),
                n => format!("Deleted {n} appointments."),
            })
        })
    }

    fn try_delete(&mut self, id: AppointmentId, scope: Option<EditScope>) -> Result<usize> {
        let target = self.cached(id)?;
        match resolve_scope(&target, scope)? {
            EditScope::ThisOccurrence => {
                let ticket = self.begin(format!("delete of appointment {id}"), move |repo| {
                    repo.delete(id).map(|_| ())
                })?;
                let answer = self.store.delete_one(id);
                self.settle(ticket, answer).map(|_| 1)
            }
            EditScope::ThisAndFuture => {
                let selector =
                    SeriesSelector::from_target(&target).ok_or(Error::ScopeRequired { id })?;
                let label = format!(
                    "delete of series {} from {}",
                    selector.series_id,
                    selector.cutoff.format("%Y-%m-%d %H:%M")
                );
                let ticket = self.begin(label, move |repo| {
                    repo.query_mut()
                        .r#where(move |a| selector.matches(a))
                        .remove_all();
                    Ok(())
                })?;
                let answer = self.store.delete_series(&selector);
                self.settle(ticket, answer)
            }
        }
    }

    /// Carries out a resolved drop.
    pub fn apply_drop(&mut self, intent: DropIntent) -> Result<DropOutcome> {
        let result = self.try_apply_drop(intent);
        self.report(result, |outcome| match outcome {
            DropOutcome::Moved(id) => Some(format!("Appointment {id} moved.")),
            DropOutcome::Assigned(id) => Some(format!("Assignment updated for appointment {id}.")),
            DropOutcome::StatusChanged(id) => Some(format!("Status updated for appointment {id}.")),
            DropOutcome::Resized(id) => Some(format!("Appointment {id} resized.")),
            DropOutcome::DraftRequested(_) => None,
        })
    }

    fn try_apply_drop(&mut self, intent: DropIntent) -> Result<DropOutcome> {
        match intent {
            DropIntent::Move {
                appointment_id: id,
                start_time,
                row,
            } => {
                let mut updated = self.cached(id)?;
                let assignees = row.assignees();
                updated.shift_to(start_time);
                updated.set_assignees(assignees.iter().copied());
                self.write_one(format!("move of appointment {id}"), updated, Some(&assignees))?;
                Ok(DropOutcome::Moved(id))
            }
            DropIntent::CreateDraft {
                service_order_id,
                start_time,
                row,
            } => {
                let order = self
                    .ctx
                    .service_orders
                    .get(service_order_id)
                    .map_err(|_| Error::not_found("Service order", service_order_id))?;
                Ok(DropOutcome::DraftRequested(AppointmentForm::for_slot(
                    order,
                    start_time,
                    row.assignees(),
                )))
            }
            DropIntent::Assign {
                appointment_id: id,
                assignee,
                mode,
            } => {
                let mut updated = self.cached(id)?;
                let mut assignees: Vec<Assignee> = match mode {
                    AssignMode::Single => Vec::new(),
                    AssignMode::Multi => updated.assignees().copied().collect(),
                };
                if !assignees.contains(&assignee) {
                    assignees.push(assignee);
                }
                updated.set_assignees(assignees.iter().copied());
                let staged = updated.clone();
                let ticket = self.begin(format!("assignment of appointment {id}"), move |repo| {
                    repo.upsert(staged);
                    Ok(())
                })?;
                let answer = self.store.replace_assignments(id, &assignees);
                self.settle(ticket, answer)?;
                Ok(DropOutcome::Assigned(id))
            }
            DropIntent::ChangeStatus {
                appointment_id: id,
                status,
            } => {
                self.try_change_status(id, status)?;
                Ok(DropOutcome::StatusChanged(id))
            }
            DropIntent::Resize(outcome) => {
                let id = outcome.appointment_id;
                let mut updated = self.cached(id)?;
                updated.reschedule(outcome.start_time, outcome.end_time)?;
                self.write_one(format!("resize of appointment {id}"), updated, None)?;
                Ok(DropOutcome::Resized(id))
            }
        }
    }

    /// Single-row optimistic write; `assignees` also rewrites the links.
    fn write_one(
        &mut self,
        label: String,
        updated: Appointment,
        assignees: Option<&[Assignee]>,
    ) -> Result<()> {
        let staged = updated.clone();
        let ticket = self.begin(label, move |repo| {
            repo.upsert(staged);
            Ok(())
        })?;
        let answer = self.store.update_one(&updated).and_then(|_| match assignees {
            Some(list) => self.store.replace_assignments(updated.id, list),
            None => Ok(()),
        });
        self.settle(ticket, answer)
    }

    pub fn change_status(&mut self, id: AppointmentId, status: AppointmentStatus) -> Result<()> {
        let result = self.try_change_status(id, status);
        self.report(result, |_| {
            Some(format!("Appointment {id} is now {}.", status.label().to_lowercase()))
        })
    }

    fn try_change_status(&mut self, id: AppointmentId, status: AppointmentStatus) -> Result<()> {
        let mut updated = self.cached(id)?;
        updated.status = status;
        self.write_one(format!("status change of appointment {id}"), updated, None)
    }

    /// Asks `geo` for a fresh position and checks in when inside the
    /// radius. Returns the measured distance in metres.
    pub fn check_in(
        &mut self,
        id: AppointmentId,
        geo: &mut dyn GeoProvider,
        now: Instant,
    ) -> Result<f64> {
        let result = self.try_check_in(id, geo, now);
        for o in &self.observers {
            o.check_in_attempted(id, &result);
        }
        self.report(result, |distance| {
            Some(format!("Checked in {distance:.0}m from the job site."))
        })
    }

    fn try_check_in(
        &mut self,
        id: AppointmentId,
        geo: &mut dyn GeoProvider,
        now: Instant,
    ) -> Result<f64> {
        let mut updated = self.cached(id)?;
        let position = geo.current_position()?;
        let distance = checkin::apply_check_in(&mut updated, position, now)?;
        self.write_one(format!("check-in of appointment {id}"), updated, None)?;
        Ok(distance)
    }

    pub fn check_out(&mut self, id: AppointmentId, now: Instant) -> Result<()> {
        let result = self.try_check_out(id, now);
        self.report(result, |_| Some("Checked out.".to_string()))
    }

    fn try_check_out(&mut self, id: AppointmentId, now: Instant) -> Result<()> {
        let mut updated = self.cached(id)?;
        checkin::apply_check_out(&mut updated, now)?;
        self.write_one(format!("check-out of appointment {id}"), updated, None)
    }
}

/// Applies `patch` to every cached appointment `selector` picks.
fn patch_series(
    repo: &mut Repository<Appointment>,
    selector: &SeriesSelector,
    patch: &AppointmentPatch,
) -> Result<()> {
    let selector = *selector;
    let ids = repo.query().r#where(move |a| selector.matches(a)).ids();
    for id in ids {
        patch.apply(repo.get_mut(id)?)?;
    }
    Ok(())
}
