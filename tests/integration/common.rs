use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, FixedOffset, TimeZone};
use crewboard::config::Config;
use crewboard::core::context::BoardContext;
use crewboard::core::models::{
    Appointment, Assignee, ServiceOrder, Subcontractor, Worker, WorkerSchedule,
};
use crewboard::core::persist::save_board;
use crewboard::core::types::{DayOfWeek, TimeRange};

pub const ANA: Assignee = Assignee::Internal(1);
pub const BEN: Assignee = Assignee::Internal(2);

pub fn binary_path() -> String {
    let raw = PathBuf::from(env!("CARGO_BIN_EXE_crewboard"));
    if raw.is_absolute() {
        return raw.to_string_lossy().to_string();
    }
    let from_manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(&raw);
    if from_manifest.exists() {
        return from_manifest.to_string_lossy().to_string();
    }
    raw.to_string_lossy().to_string()
}

static COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn make_temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "crewboard-{prefix}-{}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    let _ = fs::create_dir_all(&dir);
    dir
}

pub fn write_valid_config(dir: &Path) {
    let cfg = r#"{
      "pixels_per_hour": { "value": 60.0, "description": "Time-grid pixels per hour." },
      "drag_threshold_px": { "value": 8.0, "description": "Pointer travel before a drag starts." },
      "default_gps_radius_m": { "value": 100.0, "description": "Check-in radius when none is set." },
      "recurrence_horizon_days": { "value": 90, "description": "Open-ended series horizon." },
      "max_recurrence_instances": { "value": 365, "description": "Series size cap." },
      "underutilized_percent": { "value": 50.0, "description": "Utilization warning threshold." },
      "deep_link_base": { "value": "https://board.example.com", "description": "Detail link base." },
      "file_logging_enabled": { "value": "True", "description": "Write log lines to file." }
    }"#;
    fs::write(dir.join("config.json"), cfg).unwrap();
}

pub fn at(d: u32, h: u32, m: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 1, d, h, m, 0)
        .unwrap()
}

pub fn context_for(dir: &Path) -> BoardContext {
    BoardContext::new_with_paths(
        dir.join("config.json"),
        dir.join("board.json"),
        dir.join("logs"),
    )
    .expect("config should load")
}

/// Ana works weekdays 08-17, Ben has no schedule, Sparks subcontracts.
/// Appointment 1: Ana, Monday 2024-01-08 09-11, SO-1.
/// Appointment 2: Ben, Tuesday 2024-01-09 13-14, SO-2.
pub fn seed(ctx: &mut BoardContext) {
    ctx.workers.insert(Worker::new("Ana", Some(40.0)));
    ctx.workers.insert(Worker::new("Ben", Some(20.0)));
    ctx.subcontractors
        .insert(Subcontractor::new("Sparks", Some("Volt Ltd".into())));
    let shift = TimeRange::try_from_str("08:00-17:00").unwrap();
    for day in [
        DayOfWeek::Mon,
        DayOfWeek::Tue,
        DayOfWeek::Wed,
        DayOfWeek::Thu,
        DayOfWeek::Fri,
    ] {
        ctx.schedules
            .insert(WorkerSchedule::new(1, day, shift.clone()));
    }

    let mut boiler = ServiceOrder::new("SO-1", "Boiler service");
    boiler.estimated_hours = Some(2.0);
    ctx.service_orders.insert(boiler);
    ctx.service_orders
        .insert(ServiceOrder::new("SO-2", "Roof inspection"));

    let mut first = Appointment::new("Boiler", 1, at(8, 9, 0), at(8, 11, 0)).unwrap();
    first.id = 1;
    first.set_assignees([ANA]);
    ctx.appointments.upsert(first);
    let mut second = Appointment::new("Roof", 2, at(9, 13, 0), at(9, 14, 0)).unwrap();
    second.id = 2;
    second.set_assignees([BEN]);
    ctx.appointments.upsert(second);
}

/// Config plus a saved board in `dir`.
pub fn write_seeded_board(dir: &Path) {
    write_valid_config(dir);
    let mut ctx = BoardContext::in_memory(Config::with_defaults(dir.join("config.json")));
    seed(&mut ctx);
    save_board(&ctx, &dir.join("board.json")).unwrap();
}

pub fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(binary_path())
        .current_dir(dir)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to run binary")
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            let _ = chars.next();
            for nc in chars.by_ref() {
                if nc.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}

pub fn normalized_lines(buf: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(buf)
        .lines()
        .map(|l| strip_ansi(l).trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

pub fn read_log_contents(dir: &Path) -> Option<String> {
    let mut entries = fs::read_dir(dir.join("logs")).ok()?;
    let entry = entries.find_map(|e| e.ok())?;
    fs::read_to_string(entry.path()).ok()
}
