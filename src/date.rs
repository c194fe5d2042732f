use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::{LibraryError, Result};

/// earliest year accepted by the catalog calendar
pub const MIN_YEAR: u32 = 1900;

/// latest year accepted, the last one that fits `YYYY-MM-DD`
pub const MAX_YEAR: u32 = 9999;

const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// a validated calendar day used as the circulation clock.
///
/// Field order matters: the derived ordering compares year, then month, then day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    year: u32,
    month: u8,
    day: u8,
}

/// gregorian leap year rule
pub fn is_leap_year(year: u32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// number of days in `month` of `year`.
///
/// Returns 0 for a month outside 1..=12 instead of failing; callers are
/// expected to pass a valid month.
pub fn days_in_month(month: u32, year: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        1..=12 => DAYS_IN_MONTH[(month - 1) as usize],
        _ => 0,
    }
}

impl CalendarDate {
    /// 2024-01-28, the day a fresh registry clock starts on
    pub const SEED: CalendarDate = CalendarDate {
        year: 2024,
        month: 1,
        day: 28,
    };

    /// 9999-12-31, where `advance` stops
    pub const MAX: CalendarDate = CalendarDate {
        year: MAX_YEAR,
        month: 12,
        day: 31,
    };

    /// create a date, rejecting triples that are not a real calendar day
    pub fn new(day: u32, month: u32, year: u32) -> Result<Self> {
        let valid = (MIN_YEAR..=MAX_YEAR).contains(&year)
            && (1..=12).contains(&month)
            && day >= 1
            && day <= days_in_month(month, year);

        if !valid {
            return Err(LibraryError::InvalidDate {
                day,
                month,
                year: year.into(),
            });
        }

        Ok(Self {
            year,
            month: month as u8,
            day: day as u8,
        })
    }

    pub fn day(&self) -> u32 {
        self.day as u32
    }

    pub fn month(&self) -> u32 {
        self.month as u32
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    /// move forward `days` calendar days, one day at a time.
    ///
    /// Saturates at [`CalendarDate::MAX`].
    pub fn advance(&self, days: u32) -> Self {
        let mut result = *self;
        for _ in 0..days {
            if result == Self::MAX {
                break;
            }
            result.day += 1;
            if result.day() > days_in_month(result.month(), result.year) {
                result.day = 1;
                result.month += 1;
                if result.month > 12 {
                    result.month = 1;
                    result.year += 1;
                }
            }
        }
        result
    }

    /// approximate distance in days from `other` to `self`.
    ///
    /// Uses a flat 365-day year and 30-day month, so the result is only exact
    /// within a single month. Fine amounts are defined in terms of this value.
    pub fn days_between(&self, other: &CalendarDate) -> i64 {
        self.linear_days() - other.linear_days()
    }

    fn linear_days(&self) -> i64 {
        self.year as i64 * 365 + self.month as i64 * 30 + self.day as i64
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDate {
    type Err = LibraryError;

    /// parse `YYYY-MM-DD`
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let format_error = || LibraryError::InvalidDateFormat {
            input: s.to_string(),
        };

        let mut parts = trimmed.split('-');
        let (Some(year), Some(month), Some(day), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(format_error());
        };

        if year.len() != 4 || month.len() != 2 || day.len() != 2 {
            return Err(format_error());
        }

        let year: u32 = year.parse().map_err(|_| format_error())?;
        let month: u32 = month.parse().map_err(|_| format_error())?;
        let day: u32 = day.parse().map_err(|_| format_error())?;

        CalendarDate::new(day, month, year)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(date: CalendarDate) -> Self {
        // years stop at MAX_YEAR, well inside chrono's range
        NaiveDate::from_ymd_opt(date.year as i32, date.month(), date.day())
            .unwrap_or(NaiveDate::MAX)
    }
}

impl TryFrom<NaiveDate> for CalendarDate {
    type Error = LibraryError;

    fn try_from(date: NaiveDate) -> Result<Self> {
        let year = u32::try_from(date.year()).map_err(|_| LibraryError::InvalidDate {
            day: date.day(),
            month: date.month(),
            year: date.year().into(),
        })?;
        CalendarDate::new(date.day(), date.month(), year)
    }
}
