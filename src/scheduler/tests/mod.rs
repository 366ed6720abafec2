mod calendar_tests;
mod recurrence_tests;

use crate::config::Config;
use crate::core::aliases::Instant;
use crate::core::context::BoardContext;
use crate::core::models::{Appointment, Assignee, ServiceOrder, Subcontractor, Worker};
use chrono::{FixedOffset, NaiveDate, TimeZone};
use std::path::PathBuf;

fn temp_config_path() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("crewboard-scheduler-{nanos}.json"))
}

pub(super) const ANA: Assignee = Assignee::Internal(1);
pub(super) const BEN: Assignee = Assignee::Internal(2);
pub(super) const SPARKS: Assignee = Assignee::External(1);

/// Ana and Ben on staff, one subcontractor, two service orders.
pub(super) fn make_ctx() -> BoardContext {
    let mut ctx = BoardContext::in_memory(Config::with_defaults(temp_config_path()));
    ctx.workers.insert(Worker::new("Ana", Some(40.0)));
    ctx.workers.insert(Worker::new("Ben", Some(40.0)));
    ctx.subcontractors
        .insert(Subcontractor::new("Sparks", Some("Volt Ltd".into())));

    let mut boiler = ServiceOrder::new("SO-1", "Boiler service");
    boiler.estimated_hours = Some(4.0);
    ctx.service_orders.insert(boiler);
    ctx.service_orders
        .insert(ServiceOrder::new("SO-2", "Roof inspection"));
    ctx
}

pub(super) fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Instant {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .unwrap()
}

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(super) fn appointment(
    id: i32,
    start: Instant,
    end: Instant,
    assignees: &[Assignee],
) -> Appointment {
    let mut a = Appointment::new(format!("Visit {id}"), 1, start, end).unwrap();
    a.id = id;
    a.set_assignees(assignees.iter().copied());
    a
}
