//! Jalali (Persian) calendar dates

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::utils::pad2;

/// A day in the Jalali calendar.
///
/// Only the structural ranges are checked here (month `1..=12`, day `1..=31`).
/// Whether a day actually exists in its month is a question for a [`DateConverter`](crate::traits::DateConverter).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JalaliDate {
    year: i32,
    month: u8,
    day: u8,
}

impl JalaliDate {
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, Box<dyn Error>> {
        if month < 1 || month > 12 {
            return Err(format!("Invalid Jalali month {}", month).into());
        }
        if day < 1 || day > 31 {
            return Err(format!("Invalid Jalali day {}", day).into());
        }
        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> i32 { self.year }
    pub fn month(&self) -> u8 { self.month }
    pub fn day(&self) -> u8 { self.day }

    /// The month name, in Persian
    pub fn month_name(&self) -> &'static str {
        crate::calendar::month_name(self.month)
    }
}

impl Display for JalaliDate {
    /// Formats as `YYYY/MM/DD`: the year is not padded, month and day are padded to two digits
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}/{}/{}", self.year, pad2(self.month), pad2(self.day))
    }
}

impl FromStr for JalaliDate {
    type Err = Box<dyn Error>;

    /// Parses the `YYYY/MM/DD` form written by the picker
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        let (year, month, day) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(y), Some(m), Some(d), None) => (y, m, d),
            _ => return Err(format!("Expected a YYYY/MM/DD date, got {:?}", s).into()),
        };

        let year: i32 = year.parse()?;
        let month: u8 = month.parse()?;
        let day: u8 = day.parse()?;
        Self::new(year, month, day)
    }
}

/// Used to support serde
impl Serialize for JalaliDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for JalaliDate {
    fn deserialize<D>(deserializer: D) -> Result<JalaliDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<JalaliDate>().map_err(serde::de::Error::custom)
    }
}
