//! Working-day calendar computations.
//!
//! This module counts the working days of a month: days that are neither
//! Saturday/Sunday nor a declared holiday.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{EngineError, EngineResult};

/// Returns true if the date falls on a Saturday or Sunday.
///
/// # Example
///
/// ```
/// use attendance_payroll::calculation::is_weekend;
/// use chrono::NaiveDate;
///
/// assert!(is_weekend(NaiveDate::from_ymd_opt(2026, 1, 17).unwrap())); // Saturday
/// assert!(!is_weekend(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())); // Thursday
/// ```
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Returns the first and last day of a month.
///
/// Fails with [`EngineError::InvalidPeriod`] when the month is outside 1-12
/// or the year is outside chrono's supported range.
pub fn month_bounds(year: i32, month: u32) -> EngineResult<(NaiveDate, NaiveDate)> {
    let invalid = || EngineError::InvalidPeriod { month, year };

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = next_month_first.pred_opt().ok_or_else(invalid)?;

    Ok((first, last))
}

/// Counts the working days in a month.
///
/// A working day is any day that is neither a weekend day nor contained in
/// `holidays`. Holidays outside the month, or falling on a weekend, do not
/// change the count.
///
/// # Example
///
/// ```
/// use attendance_payroll::calculation::count_working_days;
/// use chrono::NaiveDate;
/// use std::collections::HashSet;
///
/// // January 2026 has 22 weekdays; Republic Day falls on a Monday.
/// let holidays: HashSet<NaiveDate> =
///     [NaiveDate::from_ymd_opt(2026, 1, 26).unwrap()].into_iter().collect();
/// assert_eq!(count_working_days(2026, 1, &holidays).unwrap(), 21);
/// ```
pub fn count_working_days(
    year: i32,
    month: u32,
    holidays: &HashSet<NaiveDate>,
) -> EngineResult<u32> {
    let (first, last) = month_bounds(year, month)?;

    let count = first
        .iter_days()
        .take_while(|day| *day <= last)
        .filter(|day| !is_weekend(*day) && !holidays.contains(day))
        .count();

    Ok(count as u32)
}
