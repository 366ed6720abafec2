use std::fs;

use crate::common::{
    make_temp_dir, normalized_lines, read_log_contents, run, write_seeded_board,
    write_valid_config,
};

#[test]
fn week_view_is_the_default() {
    let dir = make_temp_dir("cli-week");
    write_seeded_board(&dir);

    let output = run(&dir, &["--date", "2024-01-10"]);
    assert!(output.status.success(), "run should succeed");
    let lines = normalized_lines(&output.stdout);
    assert!(lines.iter().any(|l| l.contains("C R E W B O A R D")));
    assert!(lines.iter().any(|l| l == "WEEK 2024-01-07 - 2024-01-13"));
    let ana = lines
        .iter()
        .find(|l| l.starts_with("Ana (available)"))
        .expect("Ana's row should render");
    assert!(ana.contains("#1 09:00-11:00 Boiler"));
    assert!(ana.contains("[#---------] 5%"));
    assert!(lines.iter().any(|l| l.starts_with("Ben (unavailable)")));
    assert!(lines.iter().any(|l| l.starts_with("Sparks (Volt Ltd)")));
}

#[test]
fn each_view_can_be_chosen() {
    let dir = make_temp_dir("cli-views");
    write_seeded_board(&dir);

    let day = normalized_lines(&run(&dir, &["--view", "day", "--date", "2024-01-08"]).stdout);
    assert!(day.iter().any(|l| l == "DAY 2024-01-08"));
    assert!(day.iter().any(|l| l.starts_with("09:00 | #1 09:00-11:00 Boiler")));

    let grid = normalized_lines(&run(&dir, &["--view", "time-grid", "--date", "2024-01-10"]).stdout);
    assert!(grid.iter().any(|l| l.contains("#1 540+120px")));

    let kanban = normalized_lines(&run(&dir, &["--view", "kanban", "--date", "2024-01-10"]).stdout);
    assert!(kanban.iter().any(|l| l.starts_with("DRAFT")));

    let orders = normalized_lines(&run(&dir, &["--view", "orders", "--date", "2024-01-10"]).stdout);
    assert!(
        orders
            .iter()
            .any(|l| l.starts_with("SO-1 Boiler service") && l.contains("2.0/2.0 done"))
    );
}

#[test]
fn missing_board_file_shows_an_empty_board() {
    let dir = make_temp_dir("cli-empty");
    write_valid_config(&dir);

    let output = run(&dir, &["--view", "kanban", "--date", "2024-01-10"]);
    assert!(output.status.success());
    let lines = normalized_lines(&output.stdout);
    assert!(lines.iter().any(|l| l == "No appointments this week."));
    assert!(
        lines
            .iter()
            .any(|l| l.starts_with("[INFO] No board file at"))
    );
}

#[test]
fn show_config_prints_the_config_table() {
    let dir = make_temp_dir("cli-config");
    write_seeded_board(&dir);

    let output = run(&dir, &["--show-config"]);
    assert!(output.status.success());
    let lines = normalized_lines(&output.stdout);
    assert!(lines.iter().any(|l| l == "CONFIG"));
    assert!(lines.iter().any(|l| l.contains("DEEP_LINK_BASE")));
}

#[test]
fn missing_config_exits_with_error() {
    let dir = make_temp_dir("cli-no-config");

    let output = run(&dir, &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot start with config config.json"));
    assert!(stderr.contains("not found"));
}

#[test]
fn bad_arguments_exit_with_error() {
    let dir = make_temp_dir("cli-bad-args");
    write_valid_config(&dir);

    let output = run(&dir, &["--bogus"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown argument: --bogus"));

    let output = run(&dir, &["--view", "gantt"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown view: 'gantt'"));
}

#[test]
fn inconsistent_board_exits_with_error() {
    let dir = make_temp_dir("cli-bad-board");
    write_valid_config(&dir);
    let board = r#"{
      "appointments": [{
        "id": 1, "title": "Orphan", "service_order_id": 9,
        "start_time": "2024-01-08T09:00:00+00:00", "end_time": "2024-01-08T10:00:00+00:00",
        "status": "draft", "gps_check_in_radius": 100.0
      }]
    }"#;
    fs::write(dir.join("board.json"), board).unwrap();

    let output = run(&dir, &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot load board board.json"));
    assert!(stderr.contains("unknown service order 9"));
}

#[test]
fn loading_a_board_is_logged_to_file() {
    let dir = make_temp_dir("cli-log");
    write_seeded_board(&dir);

    let output = run(&dir, &[]);
    assert!(output.status.success());
    let log = read_log_contents(&dir).expect("log file should exist");
    assert!(log.contains("INFO"));
    assert!(log.contains("Loaded 2 appointments from board.json"));
}
