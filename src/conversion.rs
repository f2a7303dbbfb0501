//! Gregorian <-> Jalali conversion
//!
//! Jalali arithmetic is done by the [`jelal`] crate. Both calendars are bridged through the number
//! of days since the Unix epoch, which `jelal` and `chrono` both know about.

use std::error::Error;

use chrono::{Duration, NaiveDate};
use jelal::{IDayDiff, IYear, MonthDay, Ordinal, UMonth, UMonthDay, Year};

use crate::date::JalaliDate;
use crate::traits::DateConverter;

/// The lowest supported Jalali year
pub const MIN_YEAR: i32 = 1;
/// The highest supported Jalali year
pub const MAX_YEAR: i32 = 3177;

fn check_year(year: i32) -> Result<(), Box<dyn Error>> {
    if year < MIN_YEAR || year > MAX_YEAR {
        return Err(format!("Invalid Jalali year {} (supported range is {}..={})", year, MIN_YEAR, MAX_YEAR).into());
    }
    Ok(())
}

fn unix_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN)
}


/// The built-in [`DateConverter`]
#[derive(Clone, Copy, Debug, Default)]
pub struct Jalaali;

impl Jalaali {
    pub fn new() -> Self {
        Self
    }

    /// Whether a Jalali year has 366 days
    pub fn is_leap_year(&self, year: i32) -> Result<bool, Box<dyn Error>> {
        check_year(year)?;
        Ok(Year::from(year as IYear).is_leap())
    }
}

impl DateConverter for Jalaali {
    fn to_jalali(&self, date: NaiveDate) -> Result<JalaliDate, Box<dyn Error>> {
        let days = (date - unix_epoch()).num_days();
        let converted = jelal::Date::EPOCH.add_days(days as IDayDiff);

        let (year, month_day): (Year, MonthDay) = converted.into();
        let year = year.get() as i32;
        check_year(year)
            .map_err(|err| format!("{} is out of the supported range: {}", date, err))?;

        JalaliDate::new(year, month_day.month().get() as u8, month_day.day() as u8)
    }

    fn to_gregorian(&self, date: JalaliDate) -> Result<NaiveDate, Box<dyn Error>> {
        let days = self.month_length(date.year(), date.month())?;
        if date.day() > days {
            return Err(format!("{} does not exist (this month only has {} days)", date, days).into());
        }

        let ordinal = Ordinal::from(MonthDay::from((date.month() as UMonth, date.day() as UMonthDay)));
        let converted = jelal::Date::from((Year::from(date.year() as IYear), ordinal));
        let days = converted.diff_epoch() as i64;

        unix_epoch()
            .checked_add_signed(Duration::days(days))
            .ok_or_else(|| format!("{} is out of the Gregorian range", date).into())
    }

    fn month_length(&self, year: i32, month: u8) -> Result<u8, Box<dyn Error>> {
        match month {
            1..=6 => { check_year(year)?; Ok(31) },
            7..=11 => { check_year(year)?; Ok(30) },
            12 => {
                if self.is_leap_year(year)? { Ok(30) } else { Ok(29) }
            },
            _ => Err(format!("Invalid Jalali month {}", month).into()),
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn jymd(y: i32, m: u8, d: u8) -> JalaliDate {
        JalaliDate::new(y, m, d).unwrap()
    }

    /// Walks consecutive Gregorian days, checking each one converts back and forth, and that Jalali days follow each other
    fn walk(conv: &Jalaali, from: NaiveDate, until: NaiveDate) {
        let mut day = from;
        let mut previous: Option<JalaliDate> = None;
        while day <= until {
            let jal = conv.to_jalali(day).unwrap();
            assert_eq!(conv.to_gregorian(jal).unwrap(), day, "converting {} back", jal);
            if let Some(prev) = previous {
                assert!(prev < jal, "{} should come after {}", jal, prev);
            }
            previous = Some(jal);
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_known_dates() {
        let conv = Jalaali::new();
        let known = [
            (ymd(2024, 3, 20), jymd(1403, 1, 1)),
            (ymd(2024, 10, 1), jymd(1403, 7, 10)),
            (ymd(2024, 9, 22), jymd(1403, 7, 1)),
            (ymd(2025, 3, 20), jymd(1403, 12, 30)),
            (ymd(2025, 3, 21), jymd(1404, 1, 1)),
            (ymd(2023, 3, 21), jymd(1402, 1, 1)),
            (ymd(2024, 3, 19), jymd(1402, 12, 29)),
            (ymd(2024, 1, 1), jymd(1402, 10, 11)),
            (ymd(1970, 1, 1), jymd(1348, 10, 11)),
            (ymd(1979, 2, 11), jymd(1357, 11, 22)),
            (ymd(2016, 4, 11), jymd(1395, 1, 23)),
        ];

        for (greg, jal) in known.iter() {
            assert_eq!(conv.to_jalali(*greg).unwrap(), *jal, "converting {}", greg);
            assert_eq!(conv.to_gregorian(*jal).unwrap(), *greg, "converting {}", jal);
        }
    }

    #[test]
    fn test_month_lengths() {
        let conv = Jalaali::new();
        for month in 1..=6 {
            assert_eq!(conv.month_length(1402, month).unwrap(), 31);
        }
        for month in 7..=11 {
            assert_eq!(conv.month_length(1402, month).unwrap(), 30);
        }
        assert_eq!(conv.month_length(1402, 12).unwrap(), 29);
        assert_eq!(conv.month_length(1403, 12).unwrap(), 30);
        assert_eq!(conv.month_length(1399, 12).unwrap(), 30);
        assert!(conv.month_length(1403, 0).is_err());
        assert!(conv.month_length(1403, 13).is_err());
    }

    #[test]
    fn test_leap_years() {
        let conv = Jalaali::new();
        let leaps: Vec<i32> = (1390..1410).filter(|y| conv.is_leap_year(*y).unwrap()).collect();
        assert_eq!(leaps, vec![1391, 1395, 1399, 1403, 1408]);
    }

    #[test]
    fn test_invalid_dates() {
        let conv = Jalaali::new();
        assert!(conv.to_gregorian(jymd(1402, 12, 30)).is_err());
        assert!(conv.to_gregorian(jymd(1403, 7, 31)).is_err());
        assert!(conv.to_gregorian(jymd(MAX_YEAR + 1, 1, 1)).is_err());
        assert!(conv.to_gregorian(jymd(MIN_YEAR - 1, 1, 1)).is_err());
        assert!(conv.month_length(MIN_YEAR - 1, 12).is_err());
        assert!(conv.month_length(MAX_YEAR + 1, 1).is_err());
    }

    #[test]
    fn test_every_day_of_a_year_round_trips() {
        let conv = Jalaali::new();
        walk(&conv, ymd(2024, 3, 20), ymd(2025, 3, 20));
    }

    #[test]
    fn test_range_boundaries() {
        let conv = Jalaali::new();

        let first = conv.to_gregorian(jymd(MIN_YEAR, 1, 1)).unwrap();
        let last_month = conv.month_length(MAX_YEAR, 12).unwrap();
        let last = conv.to_gregorian(jymd(MAX_YEAR, 12, last_month)).unwrap();

        // Both ends of the range, including the January-to-March part of the last Jalali year
        walk(&conv, first, first + Duration::days(400));
        walk(&conv, last - Duration::days(400), last);
        assert_eq!(conv.to_jalali(first).unwrap(), jymd(MIN_YEAR, 1, 1));
        assert_eq!(conv.to_jalali(last).unwrap(), jymd(MAX_YEAR, 12, last_month));

        // One day further on each side is rejected rather than producing an out-of-range date
        assert!(conv.to_jalali(first.pred_opt().unwrap()).is_err());
        assert!(conv.to_jalali(last.succ_opt().unwrap()).is_err());
    }
}
