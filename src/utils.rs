///! Some utility functions

use crate::calendar::{CalendarView, Cell, WEEKDAY_HEADERS};

/// Pads a number to two digits, the way months and days are written in dates
pub fn pad2(n: u8) -> String {
    format!("{:02}", n)
}

/// Lays out a month as text, one week per line. Today is marked with a `*`
pub fn format_month_grid(view: &CalendarView) -> String {
    let mut out = format!("{} {}\n", view.month_name(), view.year());
    out.push_str(&WEEKDAY_HEADERS.iter().map(|h| format!("{:>3} ", h)).collect::<String>());
    let header_len = out.trim_end().len();
    out.truncate(header_len);
    out.push('\n');

    for week in view.cells().chunks(7) {
        let line: String = week.iter()
            .map(|cell| match cell {
                Cell::Blank => String::from("    "),
                Cell::Day { day, today: true } => format!("{:>3}*", day),
                Cell::Day { day, today: false } => format!("{:>3} ", day),
            })
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// A debug utility that pretty-prints a month
pub fn print_month(view: &CalendarView) {
    print!("{}", format_month_grid(view));
}
