use super::date;
use crate::scheduler::calendar_view::CalendarView;

#[test]
fn week_starts_on_sunday() {
    let view = CalendarView::week_containing(date(2024, 1, 10));
    assert_eq!(view.start(), date(2024, 1, 7));
    assert_eq!(view.last_day(), date(2024, 1, 13));
    assert_eq!(view.end_exclusive(), date(2024, 1, 14));
    assert_eq!(view.days().len(), 7);

    let sunday = CalendarView::week_containing(date(2024, 1, 7));
    assert_eq!(sunday.start(), date(2024, 1, 7));
}

#[test]
fn custom_windows_contain_only_their_days() {
    let view = CalendarView::new()
        .with_start_date(date(2024, 2, 27))
        .with_days(4);
    assert_eq!(
        view.days(),
        vec![
            date(2024, 2, 27),
            date(2024, 2, 28),
            date(2024, 2, 29),
            date(2024, 3, 1)
        ]
    );
    assert!(view.contains(date(2024, 3, 1)));
    assert!(!view.contains(date(2024, 3, 2)));
    assert!(!view.contains(date(2024, 2, 26)));
}
