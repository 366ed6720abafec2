
use crate::config::Config;
use crate::core::aliases::Instant;
use crate::core::context::BoardContext;
use crate::core::models::{Appointment, Assignee, ServiceOrder, Worker, WorkerSchedule};
use crate::core::types::{AppointmentStatus, DayOfWeek, TimeRange};
use crate::ui::width_util::WidthUtil;
use chrono::{NaiveDate, TimeZone, Utc};

pub(super) fn plain(s: &str) -> String {
    WidthUtil::strip_ansi_for_test(s)
}

pub(super) fn at(d: u32, h: u32) -> Instant {
    Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap().fixed_offset()
}

pub(super) fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

/// Ana (40h, Mondays) has appointment 1 on Monday the 8th 09-11 for SO-1
/// (2h estimate); appointment 2 is unassigned, published, Tuesday 10-11
/// for SO-2 (no estimate).
pub(super) fn small_board() -> BoardContext {
    let path = std::env::temp_dir().join("crewboard-ui-config.json");
    let mut ctx = BoardContext::in_memory(Config::with_defaults(path));
    ctx.workers.insert(Worker::new("Ana", Some(40.0)));
    ctx.schedules.insert(WorkerSchedule::new(
        1,
        DayOfWeek::Mon,
        TimeRange::try_from_str("08:00-17:00").unwrap(),
    ));

    let mut boiler = ServiceOrder::new("SO-1", "Boiler service");
    boiler.estimated_hours = Some(2.0);
    ctx.service_orders.insert(boiler);
    ctx.service_orders
        .insert(ServiceOrder::new("SO-2", "Roof inspection"));

    let mut first = Appointment::new("Boiler", 1, at(8, 9), at(8, 11)).unwrap();
    first.id = 1;
    first.set_assignees([Assignee::Internal(1)]);
    ctx.appointments.upsert(first);

    let mut second = Appointment::new("Roof", 2, at(9, 10), at(9, 11)).unwrap();
    second.id = 2;
    second.status = AppointmentStatus::Published;
    ctx.appointments.upsert(second);
    ctx
}
