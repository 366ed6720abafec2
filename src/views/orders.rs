use crate::core::context::BoardContext;
use crate::core::models::{Appointment, ServiceOrder};
use crate::core::repository::Sort;
use crate::core::types::AppointmentStatus;
use crate::extensions::chrono::InstantExt;
use crate::scheduler::calendar_view::CalendarView;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct OrderCell<'a> {
    pub date: NaiveDate,
    pub appointments: Vec<&'a Appointment>,
    /// Fulfilled order, nothing booked here.
    pub muted: bool,
    /// Unfulfilled order, nothing booked here.
    pub quick_create: bool,
    /// Inside the order's preferred date or range.
    pub preferred: bool,
}

#[derive(Debug, Clone)]
pub struct OrderRow<'a> {
    pub order: &'a ServiceOrder,
    pub scheduled_hours: f64,
    pub fulfilled: bool,
    pub cells: Vec<OrderCell<'a>>,
}

/// Sum of non-cancelled appointment hours booked against the order.
pub fn scheduled_hours(order: &ServiceOrder, appointments: &[&Appointment]) -> f64 {
    appointments
        .iter()
        .filter(|a| a.service_order_id == order.id && a.status != AppointmentStatus::Cancelled)
        .map(|a| a.duration_hours())
        .sum()
}

/// Fulfilled once booked hours reach the estimate. Orders without an
/// estimate are never fulfilled.
pub fn is_fulfilled(order: &ServiceOrder, scheduled_hours: f64) -> bool {
    order
        .estimated_hours
        .is_some_and(|estimate| scheduled_hours >= estimate)
}

/// Rows are service orders, columns the week containing the current date.
#[derive(Debug, Clone)]
pub struct OrdersCalendar<'a> {
    pub window: CalendarView,
    pub rows: Vec<OrderRow<'a>>,
}

impl<'a> OrdersCalendar<'a> {
    pub fn build(ctx: &'a BoardContext, current: NaiveDate) -> Self {
        let window = CalendarView::week_containing(current);
        let mut appointments = ctx.appointments.query().collect();
        appointments.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));

        let rows = ctx
            .service_orders
            .values(Sort::IdAsc)
            .into_iter()
            .map(|order| {
                let hours = scheduled_hours(order, &appointments);
                let fulfilled = is_fulfilled(order, hours);
                let cells = window
                    .days()
                    .into_iter()
                    .map(|date| {
                        let booked: Vec<&'a Appointment> = appointments
                            .iter()
                            .copied()
                            .filter(|a| {
                                a.service_order_id == order.id
                                    && a.start_time.local_date() == date
                            })
                            .collect();
                        let empty = booked.is_empty();
                        OrderCell {
                            date,
                            appointments: booked,
                            muted: fulfilled && empty,
                            quick_create: !fulfilled && empty,
                            preferred: !fulfilled && order.is_preferred_day(date),
                        }
                    })
                    .collect();
                OrderRow {
                    order,
                    scheduled_hours: hours,
                    fulfilled,
                    cells,
                }
            })
            .collect();

        Self { window, rows }
    }
}
