//! Clock injection, Japanese era conversion and age calculation.

use chrono::{Datelike, Local, NaiveDate};
use std::fmt;

/// Source of "today" for everything that depends on the render date.
///
/// The `現在` timeline sentinel, the "as of" date on the title and the age
/// next to the birth date all read from this, so a fixed clock makes a
/// render reproducible.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Reads the local system date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// How years are written on the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateStyle {
    /// Gregorian years, e.g. `2020`.
    #[default]
    Western,
    /// Japanese era years, e.g. `令和2`.
    JapaneseEra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Era {
    Meiji,
    Taisho,
    Showa,
    Heisei,
    Reiwa,
}

impl Era {
    pub fn name(self) -> &'static str {
        match self {
            Era::Meiji => "明治",
            Era::Taisho => "大正",
            Era::Showa => "昭和",
            Era::Heisei => "平成",
            Era::Reiwa => "令和",
        }
    }

    /// First day of the era.
    pub fn start(self) -> NaiveDate {
        let (y, m, d) = match self {
            Era::Meiji => (1868, 10, 23),
            Era::Taisho => (1912, 7, 30),
            Era::Showa => (1926, 12, 25),
            Era::Heisei => (1989, 1, 8),
            Era::Reiwa => (2019, 5, 1),
        };
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
    }
}

const ERAS_NEWEST_FIRST: [Era; 5] = [
    Era::Reiwa,
    Era::Heisei,
    Era::Showa,
    Era::Taisho,
    Era::Meiji,
];

/// A year expressed in a Japanese era.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraYear {
    pub era: Era,
    pub year: i32,
}

impl fmt::Display for EraYear {
    /// Writes `令和2`, or `令和元` for the first year of an era.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year == 1 {
            write!(f, "{}元", self.era.name())
        } else {
            write!(f, "{}{}", self.era.name(), self.year)
        }
    }
}

/// Converts a date to its era year. Dates before Meiji have no era year.
pub fn japanese_era(date: NaiveDate) -> Option<EraYear> {
    ERAS_NEWEST_FIRST
        .iter()
        .find(|era| date >= era.start())
        .map(|&era| EraYear {
            era,
            year: date.year() - era.start().year() + 1,
        })
}

/// Writes a year in the requested style. Year and month are used together
/// because eras change mid-year; the first day of the month decides.
pub fn display_year(year: i32, month: u32, style: DateStyle) -> String {
    match style {
        DateStyle::Western => year.to_string(),
        DateStyle::JapaneseEra => NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(japanese_era)
            .map(|era_year| era_year.to_string())
            .unwrap_or_else(|| year.to_string()),
    }
}

/// Full years elapsed between `birth` and `today` (満年齢).
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    if today < birth {
        return 0;
    }
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age.max(0) as u32
}
