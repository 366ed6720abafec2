
use crate::config::Config;
use crate::core::aliases::Instant;
use crate::core::context::BoardContext;
use crate::core::models::{
    Appointment, Assignee, ServiceOrder, Subcontractor, Worker, WorkerSchedule,
    WorkerUnavailability,
};
use crate::core::types::{AppointmentStatus, DayOfWeek, TimeRange};
use chrono::{FixedOffset, NaiveDate, TimeZone};

pub(super) const ANA: Assignee = Assignee::Internal(1);
pub(super) const BEN: Assignee = Assignee::Internal(2);
pub(super) const CY: Assignee = Assignee::Internal(3);
pub(super) const SPARKS: Assignee = Assignee::External(1);

pub(super) fn at(d: u32, h: u32, min: u32) -> Instant {
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 1, d, h, min, 0)
        .unwrap()
}

pub(super) fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

/// Wednesday 2024-01-10; its week runs Sunday the 7th to Saturday the 13th.
pub(super) fn current() -> NaiveDate {
    day(10)
}

fn book(
    ctx: &mut BoardContext,
    id: i32,
    order: i32,
    (start, end): (Instant, Instant),
    assignees: &[Assignee],
) -> i32 {
    let mut a = Appointment::new(format!("Job {id}"), order, start, end).unwrap();
    a.id = id;
    a.set_assignees(assignees.iter().copied());
    ctx.appointments.upsert(a);
    id
}

/// Ana is fully available, Cy partially, Ben not at all; Sparks is a
/// subcontractor. Appointments:
/// 1 Ana Mon 09-11, 2 Ana+Sparks Tue 13:30-15 (published), 3 unassigned
/// Wed 10-11, 4 Ana next Sunday, 5 Ana Thu cancelled, 6 Ben Fri 08-20.
pub(super) fn board() -> BoardContext {
    let path = std::env::temp_dir().join("crewboard-views-config.json");
    let mut ctx = BoardContext::in_memory(Config::with_defaults(path));

    ctx.workers.insert(Worker::new("Ana", Some(40.0)));
    ctx.workers.insert(Worker::new("Ben", Some(20.0)));
    ctx.workers.insert(Worker::new("Cy", None));
    ctx.subcontractors
        .insert(Subcontractor::new("Sparks", Some("Volt Ltd".into())));

    let shift = TimeRange::try_from_str("08:00-17:00").unwrap();
    for d in [
        DayOfWeek::Mon,
        DayOfWeek::Tue,
        DayOfWeek::Wed,
        DayOfWeek::Thu,
        DayOfWeek::Fri,
    ] {
        ctx.schedules.insert(WorkerSchedule::new(1, d, shift.clone()));
    }
    ctx.schedules
        .insert(WorkerSchedule::new(2, DayOfWeek::Mon, shift.clone()));
    ctx.unavailability
        .insert(WorkerUnavailability::new(2, day(8), day(8)));
    ctx.schedules
        .insert(WorkerSchedule::new(3, DayOfWeek::Mon, shift.clone()));
    ctx.schedules
        .insert(WorkerSchedule::new(3, DayOfWeek::Tue, shift));
    ctx.unavailability
        .insert(WorkerUnavailability::new(3, day(9), day(9)));

    let mut boiler = ServiceOrder::new("SO-1", "Boiler service");
    boiler.estimated_hours = Some(4.0);
    ctx.service_orders.insert(boiler);
    let mut roof = ServiceOrder::new("SO-2", "Roof inspection");
    roof.estimated_hours = Some(1.0);
    ctx.service_orders.insert(roof);
    let mut gutters = ServiceOrder::new("SO-3", "Gutter clean");
    gutters.preferred_date_range = Some((day(11), day(12)));
    ctx.service_orders.insert(gutters);

    book(&mut ctx, 1, 1, (at(8, 9, 0), at(8, 11, 0)), &[ANA]);
    book(&mut ctx, 2, 1, (at(9, 13, 30), at(9, 15, 0)), &[ANA, SPARKS]);
    book(&mut ctx, 3, 2, (at(10, 10, 0), at(10, 11, 0)), &[]);
    book(&mut ctx, 4, 2, (at(14, 9, 0), at(14, 10, 0)), &[ANA]);
    book(&mut ctx, 5, 1, (at(11, 8, 0), at(11, 12, 0)), &[ANA]);
    book(&mut ctx, 6, 2, (at(12, 8, 0), at(12, 20, 0)), &[BEN]);
    ctx.appointments.get_mut(2).unwrap().status = AppointmentStatus::Published;
    ctx.appointments.get_mut(5).unwrap().status = AppointmentStatus::Cancelled;
    ctx
}

pub(super) fn ids(appointments: &[&Appointment]) -> Vec<i32> {
    appointments.iter().map(|a| a.id).collect()
}
