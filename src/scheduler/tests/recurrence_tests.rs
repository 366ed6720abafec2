use super::{appointment, at, date, ANA};
use crate::core::models::{MAX_REPEAT_FREQUENCY, RecurrenceConfig};
use crate::core::types::{DayOfWeek, RecurrencePattern};
use crate::errors::Error;
use crate::extensions::chrono::InstantExt;
use crate::scheduler::recurrence::{
    RecurrenceLimits, generate_recurring_instances, materialize_series,
};
use chrono::{Days, Duration, FixedOffset, NaiveDate, TimeZone};

fn days_of(instances: &[crate::core::models::Appointment]) -> Vec<chrono::NaiveDate> {
    instances.iter().map(|a| a.start_time.local_date()).collect()
}

#[test]
fn weekly_on_chosen_days_until_end_date() {
    let template = appointment(1, at(2024, 1, 1, 9, 0), at(2024, 1, 1, 11, 0), &[ANA]);
    let rule = RecurrenceConfig::new(RecurrencePattern::Weekly, 1)
        .on_days(vec![DayOfWeek::Mon, DayOfWeek::Wed])
        .until(date(2024, 1, 15));

    let instances =
        generate_recurring_instances(&template, &rule, RecurrenceLimits::default()).unwrap();

    assert_eq!(
        days_of(&instances),
        vec![
            date(2024, 1, 1),
            date(2024, 1, 3),
            date(2024, 1, 8),
            date(2024, 1, 10)
        ]
    );
    for instance in &instances {
        assert_eq!(instance.duration(), Duration::hours(2));
        assert_eq!(instance.start_time.format("%H:%M").to_string(), "09:00");
        assert!(instance.is_assigned_to(&ANA));
    }
}

#[test]
fn every_instance_keeps_duration_and_stays_before_end() {
    let template = appointment(1, at(2024, 2, 5, 13, 15), at(2024, 2, 5, 14, 0), &[]);
    let end = date(2024, 4, 1);
    let rules = [
        RecurrenceConfig::new(RecurrencePattern::Daily, 3).until(end),
        RecurrenceConfig::new(RecurrencePattern::Weekly, 2).until(end),
        RecurrenceConfig::new(RecurrencePattern::Weekly, 1)
            .on_days(vec![DayOfWeek::Sat, DayOfWeek::Tue])
            .until(end),
        RecurrenceConfig::new(RecurrencePattern::Monthly, 1).until(end),
    ];

    for rule in rules {
        let instances =
            generate_recurring_instances(&template, &rule, RecurrenceLimits::default()).unwrap();
        assert!(instances.len() > 1, "{rule:?}");
        for instance in &instances {
            assert_eq!(instance.duration(), template.duration());
            assert!(instance.start_time.local_date() < end, "{rule:?}");
        }
        let days = days_of(&instances);
        assert!(days.windows(2).all(|w| w[0] < w[1]), "{rule:?}");
    }
}

#[test]
fn monthly_clamps_to_short_months_without_drift() {
    let template = appointment(1, at(2024, 1, 31, 8, 0), at(2024, 1, 31, 9, 0), &[]);
    let rule = RecurrenceConfig::new(RecurrencePattern::Monthly, 1).until(date(2024, 5, 1));

    let instances =
        generate_recurring_instances(&template, &rule, RecurrenceLimits::default()).unwrap();
    assert_eq!(
        days_of(&instances),
        vec![
            date(2024, 1, 31),
            date(2024, 2, 29),
            date(2024, 3, 31),
            date(2024, 4, 30)
        ]
    );
}

#[test]
fn open_ended_rule_stops_at_horizon() {
    let template = appointment(1, at(2024, 1, 1, 9, 0), at(2024, 1, 1, 10, 0), &[]);
    let rule = RecurrenceConfig::new(RecurrencePattern::Daily, 2);
    let limits = RecurrenceLimits {
        horizon_days: 10,
        max_instances: 365,
    };

    let instances = generate_recurring_instances(&template, &rule, limits).unwrap();
    assert_eq!(
        days_of(&instances),
        vec![
            date(2024, 1, 1),
            date(2024, 1, 3),
            date(2024, 1, 5),
            date(2024, 1, 7),
            date(2024, 1, 9)
        ]
    );
}

#[test]
fn largest_frequency_jumps_straight_past_the_end() {
    let template = appointment(1, at(2024, 1, 1, 9, 0), at(2024, 1, 1, 10, 0), &[]);
    for pattern in [
        RecurrencePattern::Daily,
        RecurrencePattern::Weekly,
        RecurrencePattern::Monthly,
    ] {
        let rule = RecurrenceConfig::new(pattern, MAX_REPEAT_FREQUENCY).until(date(2024, 2, 1));
        let instances =
            generate_recurring_instances(&template, &rule, RecurrenceLimits::default()).unwrap();
        assert_eq!(days_of(&instances), vec![date(2024, 1, 1)], "{pattern:?}");
    }

    let rule = RecurrenceConfig::new(RecurrencePattern::Daily, MAX_REPEAT_FREQUENCY + 1)
        .until(date(2024, 2, 1));
    let err = generate_recurring_instances(&template, &rule, RecurrenceLimits::default())
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn enormous_horizon_still_stops_at_the_cap() {
    let template = appointment(1, at(2024, 1, 1, 9, 0), at(2024, 1, 1, 10, 0), &[]);
    let limits = RecurrenceLimits {
        horizon_days: u32::MAX,
        max_instances: 365,
    };
    let rule = RecurrenceConfig::new(RecurrencePattern::Daily, 1);
    let instances = generate_recurring_instances(&template, &rule, limits).unwrap();
    assert_eq!(instances.len(), 365);
    assert_eq!(instances[364].start_time.local_date(), date(2024, 12, 30));
}

#[test]
fn series_near_the_last_calendar_day_ends_without_overflow() {
    let first = NaiveDate::MAX.checked_sub_days(Days::new(3)).unwrap();
    let start = FixedOffset::east_opt(0)
        .unwrap()
        .from_local_datetime(&first.and_hms_opt(9, 0, 0).unwrap())
        .single()
        .unwrap();
    let template = appointment(1, start, start + Duration::hours(1), &[]);
    let limits = RecurrenceLimits {
        horizon_days: 90,
        max_instances: 365,
    };
    let expected: Vec<NaiveDate> = (0..3)
        .map(|n| first.checked_add_days(Days::new(n)).unwrap())
        .collect();

    let daily = RecurrenceConfig::new(RecurrencePattern::Daily, 1);
    let instances = generate_recurring_instances(&template, &daily, limits).unwrap();
    assert_eq!(days_of(&instances), expected);
    assert_eq!(instances[2].duration(), Duration::hours(1));

    let every_day = RecurrenceConfig::new(RecurrencePattern::Weekly, 1).on_days(vec![
        DayOfWeek::Sun,
        DayOfWeek::Mon,
        DayOfWeek::Tue,
        DayOfWeek::Wed,
        DayOfWeek::Thu,
        DayOfWeek::Fri,
        DayOfWeek::Sat,
    ]);
    let instances = generate_recurring_instances(&template, &every_day, limits).unwrap();
    assert_eq!(days_of(&instances), expected);

    for rule in [
        RecurrenceConfig::new(RecurrencePattern::Weekly, 1),
        RecurrenceConfig::new(RecurrencePattern::Monthly, 1),
    ] {
        let instances = generate_recurring_instances(&template, &rule, limits).unwrap();
        assert_eq!(days_of(&instances), vec![first], "{rule:?}");
    }
}

#[test]
fn instance_cap_counts_the_template() {
    let template = appointment(1, at(2024, 1, 1, 9, 0), at(2024, 1, 1, 10, 0), &[]);
    let limits = RecurrenceLimits {
        horizon_days: 90,
        max_instances: 5,
    };
    for rule in [
        RecurrenceConfig::new(RecurrencePattern::Daily, 1),
        RecurrenceConfig::new(RecurrencePattern::Weekly, 1)
            .on_days(vec![DayOfWeek::Mon, DayOfWeek::Tue, DayOfWeek::Fri]),
    ] {
        let instances = generate_recurring_instances(&template, &rule, limits).unwrap();
        assert_eq!(instances.len(), 5, "{rule:?}");
    }
}

#[test]
fn end_date_on_first_day_is_rejected() {
    let template = appointment(1, at(2024, 1, 1, 9, 0), at(2024, 1, 1, 10, 0), &[]);
    let rule = RecurrenceConfig::new(RecurrencePattern::Daily, 1).until(date(2024, 1, 1));
    let err = generate_recurring_instances(&template, &rule, RecurrenceLimits::default())
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn materialized_series_links_children_to_parent() {
    let template = appointment(1, at(2024, 1, 1, 9, 0), at(2024, 1, 1, 10, 0), &[ANA]);
    let rule = RecurrenceConfig::new(RecurrencePattern::Daily, 1).until(date(2024, 1, 4));
    let instances =
        generate_recurring_instances(&template, &rule, RecurrenceLimits::default()).unwrap();

    let rows = materialize_series(instances, 20, Some(&rule));
    assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![20, 21, 22]);

    assert!(rows[0].is_recurring);
    assert_eq!(rows[0].recurrence.as_ref(), Some(&rule));
    assert_eq!(rows[0].series_id(), Some(20));
    for child in &rows[1..] {
        assert!(!child.is_recurring);
        assert!(child.recurrence.is_none());
        assert_eq!(child.parent_appointment_id, Some(20));
        assert_eq!(child.workers[0].appointment_id, child.id);
    }
}
