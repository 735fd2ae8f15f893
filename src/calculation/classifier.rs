//! Attendance classification.
//!
//! This module maps one employee-day of punch entries, together with its
//! calendar and leave context, to a single [`AttendanceStatus`] and the
//! derived punch metrics.
//!
//! Rules are evaluated in a fixed order and the first match wins:
//!
//! 1. weekend -> `WEEKEND`
//! 2. holiday -> `HOLIDAY`
//! 3. approved leave -> `CASUAL_LEAVE`
//! 4. worked hours against the thresholds -> `PRESENT`, `HALF_DAY` or `ABSENT`
//!
//! The order is payroll policy and does not depend on the punches.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ClassificationThresholds;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceStatus, AuditStep, RawPunchEntry};

/// Longest duration a single punch pair may carry.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Calendar and leave facts about the day being classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayContext {
    /// The date is a Saturday or Sunday.
    pub is_weekend: bool,
    /// The date is a declared holiday.
    pub is_holiday: bool,
    /// An approved leave application covers the date.
    pub has_approved_leave: bool,
}

/// The result of classifying one employee-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyClassification {
    /// The resolved status.
    pub status: AttendanceStatus,
    /// Earliest in-time across the day's entries.
    pub first_in: Option<NaiveTime>,
    /// Latest out-time across the day's entries.
    pub last_out: Option<NaiveTime>,
    /// Sum of entry durations in minutes.
    pub total_duration_minutes: i64,
    /// The audit step recording which rule fired.
    pub audit_step: AuditStep,
}

/// Maps worked hours to a status using the hour thresholds alone.
///
/// # Examples
///
/// ```
/// use attendance_payroll::calculation::classify_worked_hours;
/// use attendance_payroll::config::ClassificationThresholds;
/// use attendance_payroll::models::AttendanceStatus;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let thresholds = ClassificationThresholds::default();
/// let hours = |s: &str| Decimal::from_str(s).unwrap();
///
/// assert_eq!(classify_worked_hours(hours("8.0"), &thresholds), AttendanceStatus::Present);
/// assert_eq!(classify_worked_hours(hours("4.0"), &thresholds), AttendanceStatus::HalfDay);
/// assert_eq!(classify_worked_hours(hours("3.999"), &thresholds), AttendanceStatus::Absent);
/// ```
pub fn classify_worked_hours(
    hours: Decimal,
    thresholds: &ClassificationThresholds,
) -> AttendanceStatus {
    if hours >= thresholds.present_hours {
        AttendanceStatus::Present
    } else if hours >= thresholds.half_day_hours {
        AttendanceStatus::HalfDay
    } else {
        AttendanceStatus::Absent
    }
}

/// Classifies one employee-day.
///
/// Punch metrics are computed from `entries` whatever rule fires, so a
/// weekend or holiday record still carries the time actually worked.
/// Entries may arrive in any order; the first-in and last-out are the
/// earliest and latest times across all entries, not the first and last
/// elements.
///
/// # Errors
///
/// Returns [`EngineError::InvalidPunch`] if an entry has a negative duration
/// or belongs to a different date.
///
/// # Example
///
/// ```
/// use attendance_payroll::calculation::{classify_day, DayContext};
/// use attendance_payroll::config::ClassificationThresholds;
/// use attendance_payroll::models::AttendanceStatus;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let result = classify_day(
///     "E001",
///     date,
///     &[],
///     DayContext::default(),
///     &ClassificationThresholds::default(),
/// )
/// .unwrap();
///
/// assert_eq!(result.status, AttendanceStatus::Absent);
/// assert_eq!(result.total_duration_minutes, 0);
/// assert!(result.first_in.is_none());
/// ```
pub fn classify_day(
    employee_code: &str,
    date: NaiveDate,
    entries: &[RawPunchEntry],
    context: DayContext,
    thresholds: &ClassificationThresholds,
) -> EngineResult<DailyClassification> {
    for entry in entries {
        if entry.duration_minutes < 0 {
            return Err(EngineError::InvalidPunch {
                employee_code: employee_code.to_string(),
                date,
                message: format!("negative duration of {} minutes", entry.duration_minutes),
            });
        }
        if entry.duration_minutes > MINUTES_PER_DAY {
            return Err(EngineError::InvalidPunch {
                employee_code: employee_code.to_string(),
                date,
                message: format!(
                    "duration of {} minutes exceeds a day",
                    entry.duration_minutes
                ),
            });
        }
        if entry.date != date {
            return Err(EngineError::InvalidPunch {
                employee_code: employee_code.to_string(),
                date,
                message: format!("entry dated {} grouped under {}", entry.date, date),
            });
        }
    }

    let first_in = entries.iter().filter_map(|e| e.in_time).min();
    let last_out = entries.iter().filter_map(|e| e.out_time).max();
    let total_duration_minutes = entries
        .iter()
        .try_fold(0i64, |total, e| total.checked_add(e.duration_minutes))
        .ok_or_else(|| EngineError::InvalidPunch {
            employee_code: employee_code.to_string(),
            date,
            message: "total duration overflows".to_string(),
        })?;
    let worked_hours = Decimal::from(total_duration_minutes) / Decimal::from(60);

    let (status, rule_id, reasoning) = if context.is_weekend {
        (
            AttendanceStatus::Weekend,
            "weekend",
            format!("{} falls on a weekend", date),
        )
    } else if context.is_holiday {
        (
            AttendanceStatus::Holiday,
            "holiday",
            format!("{} is a declared holiday", date),
        )
    } else if context.has_approved_leave {
        (
            AttendanceStatus::CasualLeave,
            "approved_leave",
            format!("Approved leave covers {}", date),
        )
    } else {
        let status = classify_worked_hours(worked_hours, thresholds);
        let reasoning = match status {
            AttendanceStatus::Present => format!(
                "{} hours worked meets the {} hour full-day threshold",
                worked_hours.round_dp(2).normalize(),
                thresholds.present_hours.normalize()
            ),
            AttendanceStatus::HalfDay => format!(
                "{} hours worked meets the {} hour half-day threshold but not the {} hour full day",
                worked_hours.round_dp(2).normalize(),
                thresholds.half_day_hours.normalize(),
                thresholds.present_hours.normalize()
            ),
            _ => format!(
                "{} hours worked is below the {} hour half-day threshold",
                worked_hours.round_dp(2).normalize(),
                thresholds.half_day_hours.normalize()
            ),
        };
        (status, "worked_hours", reasoning)
    };

    let audit_step = AuditStep {
        step_number: 1,
        rule_id: format!("attendance_{}", rule_id),
        rule_name: "Attendance Classification".to_string(),
        input: serde_json::json!({
            "employee_code": employee_code,
            "date": date.to_string(),
            "entries": entries.len(),
            "total_duration_minutes": total_duration_minutes,
            "is_weekend": context.is_weekend,
            "is_holiday": context.is_holiday,
            "has_approved_leave": context.has_approved_leave
        }),
        output: serde_json::json!({
            "status": status.as_str(),
            "first_in": first_in.map(|t| t.to_string()),
            "last_out": last_out.map(|t| t.to_string())
        }),
        reasoning,
    };

    Ok(DailyClassification {
        status,
        first_in,
        last_out,
        total_duration_minutes,
        audit_step,
    })
}
