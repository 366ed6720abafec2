use crate::config::Config;
use crate::core::context::BoardContext;
use crate::core::types::ViewKind;
use crate::scheduler::calendar_view::CalendarView;
use crate::ui::display_data::DisplayDataBuilder;
use crate::ui::table_printer::TablePrinter;
use crate::ui::width_util::WidthUtil;
use crate::views::day::DayView;
use crate::views::kanban::KanbanBoard;
use crate::views::orders::OrdersCalendar;
use crate::views::time_grid::TimeGrid;
use crate::views::week::WeekView;
use chrono::NaiveDate;
use std::io;
use std::io::Write;

#[derive(Debug, Default, Clone)]
pub struct DisplayManager {
    pub printer: TablePrinter,
    pub util: WidthUtil,
    pub data: DisplayDataBuilder,
}

fn as_strs(headers: &[String]) -> Vec<&str> {
    headers.iter().map(String::as_str).collect()
}

impl DisplayManager {
    pub fn new() -> Self {
        Self {
            printer: TablePrinter::new(),
            util: WidthUtil::default(),
            data: DisplayDataBuilder::new(),
        }
    }

    pub fn render_config<W: Write + ?Sized>(&self, config: &Config, out: &mut W) -> io::Result<()> {
        let headers = ["ID", "KEY", "DESCRIPTION", "VALUE"];
        let rows: Vec<Vec<String>> = config
            .rows()
            .iter()
            .enumerate()
            .map(|(i, (k, d, v))| vec![i.to_string(), k.clone(), d.clone(), v.clone()])
            .collect();

        self.printer.render_table(
            "Config",
            &headers,
            &rows,
            Some("No config items found."),
            None,
            out,
        )
    }

    /// Renders `view` for the day or week containing `date`.
    pub fn render_view<W: Write + ?Sized>(
        &self,
        ctx: &BoardContext,
        view: ViewKind,
        date: NaiveDate,
        out: &mut W,
    ) -> io::Result<()> {
        match view {
            ViewKind::Day => self.render_day(ctx, date, out),
            ViewKind::Week => self.render_week(ctx, date, out),
            ViewKind::TimeGrid => self.render_time_grid(ctx, date, out),
            ViewKind::Kanban => self.render_kanban(ctx, date, out),
            ViewKind::Orders => self.render_orders(ctx, date, out),
        }
    }

    pub fn render_day<W: Write + ?Sized>(
        &self,
        ctx: &BoardContext,
        date: NaiveDate,
        out: &mut W,
    ) -> io::Result<()> {
        let view = DayView::build(&ctx.appointments, date);
        let rows = if view.is_empty() {
            Vec::new()
        } else {
            self.data.day_rows(&view)
        };
        self.printer.render_table(
            &format!("Day {}", date.format("%Y-%m-%d")),
            &["HOUR", "APPOINTMENTS"],
            &rows,
            Some("No appointments scheduled."),
            None,
            out,
        )
    }

    pub fn render_week<W: Write + ?Sized>(
        &self,
        ctx: &BoardContext,
        date: NaiveDate,
        out: &mut W,
    ) -> io::Result<()> {
        let view = WeekView::build(ctx, date);
        let mut headers = vec!["ROW".to_string(), "LOAD".to_string()];
        headers.extend(self.data.day_headers(&view.days()));
        let rows = self.data.week_rows(&view);
        self.printer.render_table(
            &self.week_title(&view.window),
            &as_strs(&headers),
            &rows,
            None,
            None,
            out,
        )
    }

    pub fn render_time_grid<W: Write + ?Sized>(
        &self,
        ctx: &BoardContext,
        date: NaiveDate,
        out: &mut W,
    ) -> io::Result<()> {
        let grid = TimeGrid::build(ctx, date);
        let mut headers = vec!["ROW".to_string()];
        headers.extend(self.data.day_headers(&grid.window.days()));
        let rows = self.data.time_grid_rows(&grid);
        self.printer.render_table(
            &format!(
                "Time grid {} ({:.0}px/h)",
                self.week_title(&grid.window),
                grid.pixels_per_hour
            ),
            &as_strs(&headers),
            &rows,
            None,
            None,
            out,
        )
    }

    pub fn render_kanban<W: Write + ?Sized>(
        &self,
        ctx: &BoardContext,
        date: NaiveDate,
        out: &mut W,
    ) -> io::Result<()> {
        let window = CalendarView::week_containing(date);
        let board = KanbanBoard::build(&ctx.appointments, &window);
        let headers: Vec<String> = board
            .columns
            .iter()
            .map(|c| c.status.label().to_uppercase())
            .collect();
        let rows = self.data.kanban_rows(&board);
        self.printer.render_table(
            &format!("Kanban {}", self.week_title(&window)),
            &as_strs(&headers),
            &rows,
            Some("No appointments this week."),
            None,
            out,
        )
    }

    pub fn render_orders<W: Write + ?Sized>(
        &self,
        ctx: &BoardContext,
        date: NaiveDate,
        out: &mut W,
    ) -> io::Result<()> {
        let calendar = OrdersCalendar::build(ctx, date);
        let mut headers = vec!["ORDER".to_string(), "HOURS".to_string()];
        headers.extend(self.data.day_headers(&calendar.window.days()));
        let rows = self.data.order_rows(&calendar);
        self.printer.render_table(
            &format!("Service orders {}", self.week_title(&calendar.window)),
            &as_strs(&headers),
            &rows,
            Some("No service orders."),
            None,
            out,
        )
    }

    fn week_title(&self, window: &CalendarView) -> String {
        format!(
            "Week {} - {}",
            window.start().format("%Y-%m-%d"),
            window.last_day().format("%Y-%m-%d")
        )
    }
}
