//! Appointment edit form, recurrence capture and saved templates.

pub mod draft;
pub mod template;

pub use draft::{AppointmentForm, resolve_scope};
pub use template::AppointmentTemplate;
