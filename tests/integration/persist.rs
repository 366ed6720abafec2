use std::fs;

use crewboard::config::Config;
use crewboard::core::context::BoardContext;
use crewboard::core::persist::{load_board, save_board};
use crewboard::core::types::AppointmentStatus;

use crate::common::{ANA, at, context_for, make_temp_dir, seed, write_valid_config};

#[test]
fn saved_board_loads_into_a_fresh_context() {
    let dir = make_temp_dir("persist-roundtrip");
    write_valid_config(&dir);
    let mut original = BoardContext::in_memory(Config::with_defaults(dir.join("config.json")));
    seed(&mut original);
    original.appointments.get_mut(2).unwrap().status = AppointmentStatus::Published;
    let path = save_board(&original, &dir.join("nested").join("board.json")).unwrap();

    let mut ctx = context_for(&dir);
    load_board(&mut ctx, &path).unwrap();

    assert_eq!(ctx.workers.len(), 2);
    assert_eq!(ctx.subcontractors.len(), 1);
    assert_eq!(ctx.schedules.len(), 5);
    let first = ctx.appointments.get(1).unwrap();
    assert_eq!(first.start_time, at(8, 9, 0));
    assert!(first.is_assigned_to(&ANA));
    assert_eq!(
        ctx.appointments.get(2).unwrap().status,
        AppointmentStatus::Published
    );
    assert_eq!(ctx.appointments.peek_next_id(), 3);
}

#[test]
fn broken_board_file_leaves_the_context_untouched() {
    let dir = make_temp_dir("persist-broken");
    write_valid_config(&dir);
    let mut ctx = context_for(&dir);
    seed(&mut ctx);

    let path = dir.join("board.json");
    fs::write(&path, "{ \"appointments\": [ ").unwrap();
    assert!(load_board(&mut ctx, &path).is_err());

    assert_eq!(ctx.appointments.len(), 2);
    assert_eq!(ctx.workers.len(), 2);
}
