use chrono::NaiveDate;
use crewboard::config::Config;
use crewboard::core::context::{BoardContext, NoticeLevel};
use crewboard::core::models::{Appointment, RecurrenceConfig};
use crewboard::core::repository::Sort;
use crewboard::core::store::MemoryStore;
use crewboard::core::types::{AppointmentStatus, EditScope, RecurrencePattern};
use crewboard::form::draft::AppointmentForm;
use crewboard::form::template::AppointmentTemplate;
use crewboard::interaction::dnd::{AssignMode, DragPayload, DropTarget, resolve_drop};
use crewboard::scheduler::{BoardManager, DropOutcome};
use crewboard::views::RowKey;

use crate::common::{ANA, BEN, at, seed};

fn seeded() -> (BoardContext, MemoryStore) {
    let mut ctx = BoardContext::in_memory(Config::with_defaults("config.json"));
    seed(&mut ctx);
    let rows: Vec<Appointment> = ctx
        .appointments
        .values(Sort::IdAsc)
        .into_iter()
        .cloned()
        .collect();
    (ctx, MemoryStore::with_rows(rows))
}

fn wednesday_series() -> AppointmentForm {
    let mut form = AppointmentForm::new(at(10, 8, 0), at(10, 9, 0));
    form.title = "Filter check".into();
    form.service_order_id = Some(1);
    form.assignees = vec![ANA];
    form.recurrence = Some(
        RecurrenceConfig::new(RecurrencePattern::Weekly, 1)
            .until(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()),
    );
    form
}

#[test]
fn series_lifecycle_reaches_the_store() {
    let (mut ctx, mut store) = seeded();

    let ids = BoardManager::new(&mut ctx, &mut store)
        .create(&wednesday_series())
        .unwrap();
    assert_eq!(ids, vec![3, 4, 5]);
    assert_eq!(store.rows().len(), 5);
    assert!(ctx.appointments.get(3).unwrap().recurrence.is_some());
    assert_eq!(ctx.appointments.get(5).unwrap().parent_appointment_id, Some(3));
    assert_eq!(
        ctx.appointments.get(5).unwrap().start_time,
        at(24, 8, 0)
    );

    let err = BoardManager::new(&mut ctx, &mut store)
        .delete(4, None)
        .unwrap_err();
    assert!(err.to_string().contains("part of a recurring series"));

    let removed = BoardManager::new(&mut ctx, &mut store)
        .delete(4, Some(EditScope::ThisAndFuture))
        .unwrap();
    assert_eq!(removed, 2);
    assert!(ctx.appointments.contains(3));
    assert!(!store.rows().contains(4));
    assert!(!store.rows().contains(5));

    let messages: Vec<String> = ctx.drain_notices().into_iter().map(|n| n.message).collect();
    assert_eq!(messages[0], "Created 3 recurring appointments.");
    assert_eq!(messages[2], "Deleted 2 appointments.");
}

#[test]
fn overlapping_series_is_refused_without_store_calls() {
    let (mut ctx, mut store) = seeded();
    let mut form = wednesday_series();
    form.start_time = at(8, 10, 0);
    form.end_time = at(8, 12, 0);

    let err = BoardManager::new(&mut ctx, &mut store)
        .create(&form)
        .unwrap_err();
    assert!(err.to_string().contains("no appointments were created"));
    assert_eq!(store.call_count(), 0);
    assert_eq!(ctx.appointments.len(), 2);
    assert_eq!(ctx.notices()[0].level, NoticeLevel::Error);
}

#[test]
fn dragging_a_card_to_another_row_moves_and_reassigns() {
    let (mut ctx, mut store) = seeded();
    let target = DropTarget::Slot {
        row: RowKey::Assignee(BEN),
        date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        hour: 14,
    };
    let intent = resolve_drop(
        &DragPayload::Appointment(1),
        &target,
        &ctx.appointments,
        *at(10, 0, 0).offset(),
        AssignMode::Single,
    )
    .expect("free slot should accept the drop");

    let outcome = BoardManager::new(&mut ctx, &mut store)
        .apply_drop(intent)
        .unwrap();
    assert_eq!(outcome, DropOutcome::Moved(1));

    let moved = store.rows().get(1).unwrap();
    assert_eq!(moved.start_time, at(10, 14, 0));
    assert_eq!(moved.end_time, at(10, 16, 0));
    assert!(moved.is_assigned_to(&BEN));
    assert!(!moved.is_assigned_to(&ANA));
    assert_eq!(ctx.notices()[0].message, "Appointment 1 moved.");
}

#[test]
fn failed_store_write_restores_the_board() {
    let (mut ctx, mut store) = seeded();
    store.set_offline("network unreachable");

    let err = BoardManager::new(&mut ctx, &mut store)
        .change_status(2, AppointmentStatus::Published)
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to save changes: network unreachable");
    assert_eq!(
        ctx.appointments.get(2).unwrap().status,
        AppointmentStatus::Draft
    );
    assert_eq!(store.call_count(), 1);

    store.set_online();
    BoardManager::new(&mut ctx, &mut store)
        .change_status(2, AppointmentStatus::Published)
        .unwrap();
    assert_eq!(
        store.rows().get(2).unwrap().status,
        AppointmentStatus::Published
    );
    let last = ctx.drain_notices().pop().unwrap();
    assert_eq!(last.level, NoticeLevel::Success);
    assert_eq!(last.message, "Appointment 2 is now published.");
}

#[test]
fn template_creates_a_matching_appointment() {
    let (mut ctx, mut store) = seeded();
    let template =
        AppointmentTemplate::from_appointment("Boiler visit", ctx.appointments.get(1).unwrap());
    let form = template.instantiate(at(12, 8, 0), 2);

    let ids = BoardManager::new(&mut ctx, &mut store)
        .create(&form)
        .unwrap();
    assert_eq!(ids, vec![3]);
    let created = store.rows().get(3).unwrap();
    assert_eq!(created.title, "Boiler");
    assert_eq!(created.service_order_id, 2);
    assert_eq!(created.end_time, at(12, 10, 0));
    assert!(created.is_assigned_to(&ANA));
    assert_eq!(created.status, AppointmentStatus::Draft);
}
