use crate::config::Config;
use crate::core::aliases::AppointmentId;
use crate::core::models::{Appointment, RecurrenceConfig};
use crate::core::types::{DayOfWeek, RecurrencePattern};
use crate::errors::{Error, Result};
use crate::extensions::chrono::{InstantExt, NaiveDateExt};
use chrono::{Days, NaiveDate};

/// Bounds applied to every expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceLimits {
    /// Days covered when the rule has no end date.
    pub horizon_days: u32,
    /// Total instances, the template included.
    pub max_instances: u32,
}

impl Default for RecurrenceLimits {
    fn default() -> Self {
        Self {
            horizon_days: 90,
            max_instances: 365,
        }
    }
}

impl RecurrenceLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            horizon_days: config.recurrence_horizon_days(),
            max_instances: config.max_recurrence_instances(),
        }
    }
}

/// Expands `template` by `config`. Index 0 is the template itself; every
/// instance keeps the template's duration; no instance starts on or after
/// the end date (or the horizon when there is none).
pub fn generate_recurring_instances(
    template: &Appointment,
    config: &RecurrenceConfig,
    limits: RecurrenceLimits,
) -> Result<Vec<Appointment>> {
    config.validate()?;
    let first_day = template.start_time.local_date();
    let stop = match config.end_date {
        Some(end) if end <= first_day => {
            return Err(Error::validation(format!(
                "Recurrence end date {end} must be after the first occurrence on {first_day}."
            )));
        }
        Some(end) => end,
        None => first_day
            .checked_add_days(Days::new(limits.horizon_days as u64))
            .unwrap_or(NaiveDate::MAX),
    };
    let cap = limits.max_instances.max(1) as usize;

    let mut days = occurrence_days(first_day, config, stop, cap);
    days.retain(|d| *d > first_day);
    days.truncate(cap - 1);

    let mut out = Vec::with_capacity(days.len() + 1);
    out.push(template.clone());
    for day in days {
        let Some(start) = template.start_time.checked_add_signed(day - first_day) else {
            break;
        };
        let mut instance = template.clone();
        instance.shift_to(start);
        instance.is_recurring = false;
        instance.recurrence = None;
        instance.check_in = None;
        instance.check_out_time = None;
        out.push(instance);
    }
    Ok(out)
}

/// Dates from `first_day` every `step` days while before `stop`. Ends early
/// at the calendar's last representable date.
fn stepped_days(first_day: NaiveDate, step: u64, stop: NaiveDate, cap: usize) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut next = Some(first_day);
    while let Some(day) = next {
        if day >= stop || out.len() >= cap {
            break;
        }
        out.push(day);
        next = day.checked_add_days(Days::new(step));
    }
    out
}

/// Candidate dates in chronological order, all before `stop`.
fn occurrence_days(
    first_day: NaiveDate,
    config: &RecurrenceConfig,
    stop: NaiveDate,
    cap: usize,
) -> Vec<NaiveDate> {
    let step = u64::from(config.frequency);

    match config.pattern {
        RecurrencePattern::Daily => stepped_days(first_day, step, stop, cap),
        RecurrencePattern::Weekly if config.days_of_week.is_empty() => {
            stepped_days(first_day, step * 7, stop, cap)
        }
        RecurrencePattern::Weekly => {
            let mut weekdays: Vec<DayOfWeek> = config.days_of_week.clone();
            weekdays.sort();
            weekdays.dedup();

            let mut out = Vec::new();
            let mut week = Some(first_day.week_start());
            'weeks: while let Some(start) = week.filter(|w| *w < stop) {
                for d in &weekdays {
                    let Some(day) = start.checked_add_days(Days::new(u64::from(d.index()))) else {
                        break 'weeks;
                    };
                    if day >= stop || out.len() >= cap {
                        break 'weeks;
                    }
                    if day >= first_day {
                        out.push(day);
                    }
                }
                week = start.checked_add_days(Days::new(step * 7));
            }
            out
        }
        RecurrencePattern::Monthly => {
            let mut out = Vec::new();
            let mut k: u32 = 0;
            while out.len() < cap {
                let Some(day) = k
                    .checked_mul(config.frequency)
                    .and_then(|months| first_day.add_months_clamped(months))
                else {
                    break;
                };
                if day >= stop {
                    break;
                }
                out.push(day);
                k += 1;
            }
            out
        }
    }
}

/// Assigns consecutive ids from `first_id` and links the series: index 0
/// becomes the recurring parent carrying `rule`, the rest point back at it.
pub fn materialize_series(
    instances: Vec<Appointment>,
    first_id: AppointmentId,
    rule: Option<&RecurrenceConfig>,
) -> Vec<Appointment> {
    instances
        .into_iter()
        .enumerate()
        .map(|(offset, mut appt)| {
            let id = first_id + offset as AppointmentId;
            appt.id = id;
            for link in &mut appt.workers {
                link.appointment_id = id;
            }
            match (offset, rule) {
                (_, None) => {
                    appt.is_recurring = false;
                    appt.recurrence = None;
                    appt.parent_appointment_id = None;
                }
                (0, Some(rule)) => {
                    appt.is_recurring = true;
                    appt.recurrence = Some(rule.clone());
                    appt.parent_appointment_id = None;
                }
                (_, Some(_)) => {
                    appt.is_recurring = false;
                    appt.recurrence = None;
                    appt.parent_appointment_id = Some(first_id);
                }
            }
            appt
        })
        .collect()
}
