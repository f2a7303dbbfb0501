//! The month grid displayed by the picker

use std::error::Error;

use chrono::Datelike;
use serde::Serialize;

use crate::date::JalaliDate;
use crate::traits::DateConverter;

/// Jalali month names, in Persian
pub const MONTH_NAMES: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Column headers of the grid. The week starts on Saturday
pub const WEEKDAY_HEADERS: [&str; 7] = ["ش", "ی", "د", "س", "چ", "پ", "ج"];

/// Returns the Persian name of a month (1 to 12). Out-of-range months give an empty string
pub fn month_name(month: u8) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[month as usize - 1],
        _ => "",
    }
}

/// Maps a weekday counted from Sunday (0 = Sunday, 6 = Saturday) to its column in the grid
pub fn leading_offset(weekday_from_sunday: u32) -> u8 {
    if weekday_from_sunday == 6 {
        0
    } else {
        (weekday_from_sunday + 1) as u8
    }
}

/// One cell of the day grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Cell {
    /// Padding before the first day of the month
    Blank,
    Day { day: u8, today: bool },
}

/// A month, ready to be displayed
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CalendarView {
    year: i32,
    month: u8,
    days_in_month: u8,
    leading_blanks: u8,
    /// The day of this month that should be highlighted, if today is within this month
    today: Option<u8>,
}

impl CalendarView {
    /// Lay out `year`/`month`. `today` is highlighted in case it belongs to this month
    pub fn new<C: DateConverter + ?Sized>(converter: &C, year: i32, month: u8, today: JalaliDate) -> Result<Self, Box<dyn Error>> {
        let days_in_month = converter.month_length(year, month)?;

        let first_day = converter.to_gregorian(JalaliDate::new(year, month, 1)?)?;
        let leading_blanks = leading_offset(first_day.weekday().num_days_from_sunday());

        let today = if today.year() == year && today.month() == month && today.day() <= days_in_month {
            Some(today.day())
        } else {
            None
        };

        Ok(Self { year, month, days_in_month, leading_blanks, today })
    }

    /// Lay out the month `today` belongs to
    pub fn current<C: DateConverter + ?Sized>(converter: &C, today: JalaliDate) -> Result<Self, Box<dyn Error>> {
        Self::new(converter, today.year(), today.month(), today)
    }

    pub fn year(&self) -> i32 { self.year }
    pub fn month(&self) -> u8 { self.month }
    pub fn days_in_month(&self) -> u8 { self.days_in_month }
    pub fn leading_blanks(&self) -> u8 { self.leading_blanks }
    pub fn today(&self) -> Option<u8> { self.today }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }

    /// Returns the date of a day of this month, or `None` if this month has no such day
    pub fn date_of(&self, day: u8) -> Option<JalaliDate> {
        if day < 1 || day > self.days_in_month {
            return None;
        }
        JalaliDate::new(self.year, self.month, day).ok()
    }

    /// Every cell of the grid, blanks first
    pub fn cells(&self) -> Vec<Cell> {
        let blanks = (0..self.leading_blanks).map(|_| Cell::Blank);
        let days = (1..=self.days_in_month).map(|day| Cell::Day { day, today: self.today == Some(day) });
        blanks.chain(days).collect()
    }
}
