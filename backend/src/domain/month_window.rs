//! Calendar arithmetic for month-based queries.

use chrono::NaiveDate;

use crate::domain::errors::DomainError;

/// Years accepted from callers; keeps stored dates at four digits
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// Reject years outside the supported range
pub fn check_year(year: i32) -> Result<(), DomainError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(DomainError::validation(format!(
            "Year must be between {} and {}, got {}",
            MIN_YEAR, MAX_YEAR, year
        )));
    }
    Ok(())
}

/// A validated (month, year) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthPeriod {
    month: u32,
    year: i32,
}

impl MonthPeriod {
    pub fn new(month: u32, year: i32) -> Result<Self, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        check_year(year)?;
        Ok(Self { month, year })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The period immediately before this one; January rolls back to December
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                month: 12,
                year: self.year - 1,
            }
        } else {
            Self {
                month: self.month - 1,
                year: self.year,
            }
        }
    }

    /// First through last calendar day of the month
    pub fn window(&self) -> Result<MonthWindow, DomainError> {
        let out_of_range =
            || DomainError::validation(format!("{}/{} is not a valid month", self.month, self.year));

        let start = NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or_else(out_of_range)?;
        let end = NaiveDate::from_ymd_opt(self.year, self.month, days_in_month(self.month, self.year))
            .ok_or_else(out_of_range)?;

        Ok(MonthWindow { start, end })
    }
}

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

pub fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}
