//! Post-completion summary table.

use chrono::TimeDelta;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ColumnConstraint, Table, Width};
use owo_colors::{AnsiColors, OwoColorize};

use crate::bar::ProgressBar;
use crate::error::{BarError, BarResult};

/// Field column floor, sized for the widest row label.
const FIELD_WIDTH: u16 = 20;
/// Value column floor; RFC-1123-style timestamps need the room.
const MIN_VALUE_WIDTH: u16 = 32;

/// RFC 1123 with the zone abbreviation, e.g. `Tue, 05 Aug 2026 09:41:07 CST`.
const TIME_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %Z";

impl ProgressBar {
    /// Print the bordered summary table for a completed bar.
    ///
    /// `value_width` is a lower bound on the value column, clamped to at
    /// least 32 so the timestamps fit. Before
    /// [`complete`](ProgressBar::complete) this returns
    /// [`BarError::NotComplete`] and prints nothing.
    pub fn report(&self, value_width: u16) -> BarResult<()> {
        let Some(end_time) = self.end_time() else {
            return Err(BarError::NotComplete);
        };
        let elapsed = end_time - self.start_time;
        let value_width = value_width.max(MIN_VALUE_WIDTH);

        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec![
            Cell::new("Field").fg(Color::Red),
            Cell::new("Value").fg(Color::Red),
        ]);
        let rows = [
            ("Task Name", self.name.clone()),
            ("Start Time", self.start_time.format(TIME_FORMAT).to_string()),
            ("End Time", end_time.format(TIME_FORMAT).to_string()),
            ("Elapsed Time", format_elapsed(elapsed)),
            ("Total Tasks", self.total().to_string()),
            ("Completed Tasks", self.current().to_string()),
        ];
        for (field, value) in rows {
            table.add_row(vec![
                Cell::new(field).fg(Color::DarkYellow),
                Cell::new(value).fg(Color::DarkYellow),
            ]);
        }
        if let Some(column) = table.column_mut(0) {
            column.set_constraint(ColumnConstraint::LowerBoundary(Width::Fixed(FIELD_WIDTH)));
        }
        if let Some(column) = table.column_mut(1) {
            column.set_constraint(ColumnConstraint::LowerBoundary(Width::Fixed(value_width)));
        }

        println!("{}", "Progress Bar Report".color(AnsiColors::BrightMagenta));
        println!("{table}");
        Ok(())
    }
}

/// Render an elapsed duration the way Go prints them: `1h2m3.004s`.
fn format_elapsed(elapsed: TimeDelta) -> String {
    let ms = elapsed.num_milliseconds().max(0);
    let hours = ms / 3_600_000;
    let minutes = ms % 3_600_000 / 60_000;
    let seconds = ms % 60_000 / 1_000;
    let millis = ms % 1_000;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if minutes > 0 || hours > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&format!("{seconds}.{millis:03}s"));
    out
}
