use chrono::{DateTime, FixedOffset};

pub type AppointmentId = i32;
pub type WorkerId = i32;
pub type ContactId = i32;
pub type ServiceOrderId = i32;

/// Timezone-aware instant used for every appointment boundary.
pub type Instant = DateTime<FixedOffset>;
