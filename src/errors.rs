use thiserror::Error;

// Re-export a simple Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

use crate::checkin::GeoError;
use crate::core::aliases::AppointmentId;

/// Everything that can stop a board action from taking effect.
#[derive(Error, Debug)]
pub enum Error {
    // ---- Parsing -------------------------------------------------------------
    /// Bad user or file input (dates, enum names, CLI flags).
    #[error("Parse error: {0}")]
    Parse(String),

    // ---- Scheduling / Domain -----------------------------------------------
    /// Caught locally before any store call (bad resize, missing service order...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Recurrence expansion overlaps existing work for the same worker.
    #[error("{count} scheduling conflict(s) found; no appointments were created.")]
    Conflict { count: usize },

    /// A series action was attempted without choosing a scope.
    #[error(
        "Appointment {id} is part of a recurring series; choose 'this occurrence' or 'this and future occurrences'."
    )]
    ScopeRequired { id: AppointmentId },

    /// Status change not allowed from the current state.
    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("{entity} with id {id} not found.")]
    NotFound { entity: &'static str, id: i32 },

    // ---- Check-in ------------------------------------------------------------
    #[error("{0}")]
    Geolocation(#[from] GeoError),

    #[error(
        "You are {distance_m:.0}m from the job site; check-in is allowed within {radius_m:.0}m."
    )]
    TooFar { distance_m: f64, radius_m: f64 },

    // ---- Persistence ---------------------------------------------------------
    /// The store refused or failed a write; the optimistic patch is reverted.
    #[error("Failed to save changes: {0}")]
    Persistence(String),

    // ---- Config -------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    // ---- Plumbing / Wrappers ------------------------------------------------
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ----------------------- Convenience constructors ----------------------------

impl Error {
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Error::Parse(msg.into())
    }
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Error::Validation(msg.into())
    }
    pub fn persistence<S: Into<String>>(msg: S) -> Self {
        Error::Persistence(msg.into())
    }
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Error::NotFound { entity, id }
    }
}

// ----------------------- Small result helpers --------------------------------

/// Map an `Option<T>` into `Result<T, Error::Validation>` with a custom message.
pub fn require_valid<T, S: Into<String>>(opt: Option<T>, msg: S) -> Result<T> {
    opt.ok_or_else(|| Error::Validation(msg.into()))
}
