//! Terminal rendering of the board views.

pub mod ansi;
pub mod ascii;
pub mod chrome;
pub mod display_data;
pub mod display_manager;
mod table_printer;
#[cfg(test)]
mod tests;
mod width_util;
