//! Holiday and leave models.
//!
//! This module contains the [`Holiday`] and [`LeaveApplication`] types used as
//! read-only calendar context for classification and working-day counts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a declared holiday.
///
/// # Example
///
/// ```
/// use attendance_payroll::models::Holiday;
/// use chrono::NaiveDate;
///
/// let holiday = Holiday {
///     date: NaiveDate::from_ymd_opt(2026, 1, 26).unwrap(),
///     name: "Republic Day".to_string(),
/// };
/// assert_eq!(holiday.name, "Republic Day");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday.
    pub name: String,
}

/// Approval state of a leave application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved; covers the attendance of its date range.
    Approved,
    /// Rejected; has no effect on attendance.
    Rejected,
}

/// A leave application over an inclusive date range.
///
/// # Example
///
/// ```
/// use attendance_payroll::models::{LeaveApplication, LeaveStatus};
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// let leave = LeaveApplication {
///     id: Uuid::new_v4(),
///     employee_id: Uuid::new_v4(),
///     start_date: NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 1, 14).unwrap(),
///     status: LeaveStatus::Approved,
/// };
///
/// assert!(leave.covers(NaiveDate::from_ymd_opt(2026, 1, 14).unwrap()));
/// assert!(!leave.covers(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplication {
    /// Unique identifier of the application.
    pub id: Uuid,
    /// The applicant.
    pub employee_id: Uuid,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Approval state.
    pub status: LeaveStatus,
}

impl LeaveApplication {
    /// Returns true if the application is approved and the date lies within
    /// its range, inclusive of both ends.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.status == LeaveStatus::Approved && date >= self.start_date && date <= self.end_date
    }
}
