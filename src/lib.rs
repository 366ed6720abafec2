//! Field-service scheduling board: recurring appointments, conflict and
//! availability checks, optimistic drag/drop edits and GPS check-in.

pub mod checkin;
pub mod config;
pub mod core;
pub mod errors;
pub mod extensions;
pub mod form;
pub mod interaction;
pub mod logging;
pub mod scheduler;
pub mod ui;
pub mod views;
