use crate::core::context::BoardContext;
use crate::core::models::{
    Appointment, Assignee, BaseEntity, ServiceOrder, Subcontractor, Worker, WorkerSchedule,
    WorkerUnavailability,
};
use crate::core::repository::{RepoSnapshot, Repository, Sort};
use crate::errors::{Error, Result};

trait ParticipantOps {
    fn begin_stage(&mut self, ctx: &mut BoardContext, clear_existing: bool);
    fn commit_stage(&mut self);
    fn discard_stage(&mut self, ctx: &mut BoardContext);
}

struct RepoParticipant<T: BaseEntity + Clone> {
    accessor: fn(&mut BoardContext) -> &mut Repository<T>,
    snapshot: Option<RepoSnapshot<T>>,
}

impl<T: BaseEntity + Clone> RepoParticipant<T> {
    fn new(accessor: fn(&mut BoardContext) -> &mut Repository<T>) -> Self {
        Self {
            accessor,
            snapshot: None,
        }
    }
}

impl<T: BaseEntity + Clone> ParticipantOps for RepoParticipant<T> {
    fn begin_stage(&mut self, ctx: &mut BoardContext, clear_existing: bool) {
        let repo = (self.accessor)(ctx);
        self.snapshot = Some(repo.snapshot());
        if clear_existing {
            repo.clear();
        }
    }

    fn commit_stage(&mut self) {
        self.snapshot = None;
    }

    fn discard_stage(&mut self, ctx: &mut BoardContext) {
        if let Some(snapshot) = self.snapshot.take() {
            (self.accessor)(ctx).restore(snapshot);
        }
    }
}

/// Multi-repository edit that lands completely or not at all. References
/// between entities are checked before the edit is kept.
pub struct Transaction {
    participants: Vec<Box<dyn ParticipantOps>>,
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Transaction {
    pub fn new() -> Self {
        let participants: Vec<Box<dyn ParticipantOps>> = vec![
            Box::new(RepoParticipant::new(BoardContext::workers_repo)),
            Box::new(RepoParticipant::new(BoardContext::subcontractors_repo)),
            Box::new(RepoParticipant::new(BoardContext::service_orders_repo)),
            Box::new(RepoParticipant::new(BoardContext::schedules_repo)),
            Box::new(RepoParticipant::new(BoardContext::unavailability_repo)),
            Box::new(RepoParticipant::new(BoardContext::appointments_repo)),
        ];
        Self { participants }
    }

    pub fn run<F>(&mut self, ctx: &mut BoardContext, clear_existing: bool, f: F) -> Result<()>
    where
        F: FnOnce(&mut BoardContext) -> Result<()>,
    {
        for p in self.participants.iter_mut() {
            p.begin_stage(ctx, clear_existing);
        }
        match f(ctx).and_then(|_| validate_associations(ctx)) {
            Ok(()) => {
                for p in self.participants.iter_mut() {
                    p.commit_stage();
                }
                Ok(())
            }
            Err(e) => {
                for p in self.participants.iter_mut() {
                    p.discard_stage(ctx);
                }
                Err(e)
            }
        }
    }
}

/// Every appointment has a valid window, a known service order and known
/// assignees. A child may outlive its deleted parent; the series id stays.
/// Schedules and unavailability point at known workers.
pub fn validate_associations(ctx: &BoardContext) -> Result<()> {
    for appt in ctx.appointments.values(Sort::IdAsc) {
        Appointment::validate_window(appt.start_time, appt.end_time)?;
        if !ctx.service_orders.contains(appt.service_order_id) {
            return Err(Error::validation(format!(
                "Appointment {} references unknown service order {}.",
                appt.id, appt.service_order_id
            )));
        }
        for assignee in appt.assignees() {
            let known = match assignee {
                Assignee::Internal(id) => ctx.workers.contains(*id),
                Assignee::External(id) => ctx.subcontractors.contains(*id),
            };
            if !known {
                return Err(Error::validation(format!(
                    "Appointment {} is assigned to unknown {}.",
                    appt.id, assignee
                )));
            }
        }
        if appt.parent_appointment_id == Some(appt.id) {
            return Err(Error::validation(format!(
                "Appointment {} cannot be its own series parent.",
                appt.id
            )));
        }
    }

    let worker_refs = ctx
        .schedules
        .values(Sort::IdAsc)
        .into_iter()
        .map(|s| s.worker_id)
        .chain(
            ctx.unavailability
                .values(Sort::IdAsc)
                .into_iter()
                .map(|u| u.worker_id),
        );
    for worker_id in worker_refs {
        if !ctx.workers.contains(worker_id) {
            return Err(Error::validation(format!(
                "Availability entry references unknown worker {worker_id}."
            )));
        }
    }
    Ok(())
}

/// Optimistic mutation in flight. The patch is already visible in the
/// shared cache; the ticket holds the pre-patch snapshot until the store
/// answers. Settle it exactly once.
#[must_use = "a pending mutation must be committed or reverted"]
#[derive(Debug)]
pub struct PendingMutation {
    label: String,
    snapshot: RepoSnapshot<Appointment>,
}

impl PendingMutation {
    /// Snapshot, then patch. A patch that fails leaves the cache untouched.
    pub fn begin<F>(ctx: &mut BoardContext, label: impl Into<String>, patch: F) -> Result<Self>
    where
        F: FnOnce(&mut Repository<Appointment>) -> Result<()>,
    {
        let snapshot = ctx.appointments.snapshot();
        if let Err(err) = patch(&mut ctx.appointments) {
            ctx.appointments.restore(snapshot);
            return Err(err);
        }
        Ok(Self {
            label: label.into(),
            snapshot,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn snapshot(&self) -> &RepoSnapshot<Appointment> {
        &self.snapshot
    }

    pub fn commit(self) {}

    /// Puts the pre-patch collection back verbatim.
    pub fn revert(self, ctx: &mut BoardContext) {
        ctx.appointments.restore(self.snapshot);
    }
}

impl BoardContext {
    fn workers_repo(&mut self) -> &mut Repository<Worker> {
        &mut self.workers
    }
    fn subcontractors_repo(&mut self) -> &mut Repository<Subcontractor> {
        &mut self.subcontractors
    }
    fn service_orders_repo(&mut self) -> &mut Repository<ServiceOrder> {
        &mut self.service_orders
    }
    fn schedules_repo(&mut self) -> &mut Repository<WorkerSchedule> {
        &mut self.schedules
    }
    fn unavailability_repo(&mut self) -> &mut Repository<WorkerUnavailability> {
        &mut self.unavailability
    }
    fn appointments_repo(&mut self) -> &mut Repository<Appointment> {
        &mut self.appointments
    }
}
