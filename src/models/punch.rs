//! Raw punch entries and their persisted log form.
//!
//! Punch entries arrive already parsed from the time-clock device. Each entry
//! is persisted as a [`PunchLog`] so that reprocessing stays auditable.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single punch pair reported by a time-clock device.
///
/// # Example
///
/// ```
/// use attendance_payroll::models::RawPunchEntry;
/// use chrono::{NaiveDate, NaiveTime};
///
/// let entry = RawPunchEntry {
///     employee_code: "E001".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
///     in_time: NaiveTime::from_hms_opt(9, 0, 0),
///     out_time: NaiveTime::from_hms_opt(17, 0, 0),
///     in_door: Some("Main Gate".to_string()),
///     out_door: Some("Main Gate".to_string()),
///     duration_minutes: 480,
/// };
/// assert_eq!(entry.duration_minutes, 480);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPunchEntry {
    /// Device-side employee identifier (usually the employee number).
    pub employee_code: String,
    /// The calendar date the punch belongs to.
    pub date: NaiveDate,
    /// Time the employee punched in, if recorded.
    #[serde(default)]
    pub in_time: Option<NaiveTime>,
    /// Time the employee punched out, if recorded.
    #[serde(default)]
    pub out_time: Option<NaiveTime>,
    /// Door or location label of the in-punch.
    #[serde(default)]
    pub in_door: Option<String>,
    /// Door or location label of the out-punch.
    #[serde(default)]
    pub out_door: Option<String>,
    /// Worked duration of this punch pair in minutes.
    pub duration_minutes: i64,
}

/// A raw punch entry persisted for audit, tagged with its processing state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchLog {
    /// Unique identifier of the log row.
    pub id: Uuid,
    /// The resolved employee the punch belongs to.
    pub employee_id: Uuid,
    /// The punch as received from the device.
    pub entry: RawPunchEntry,
    /// Whether reconciliation has consumed this punch.
    pub processed: bool,
    /// When the log row was written.
    pub created_at: DateTime<Utc>,
}

impl PunchLog {
    /// Creates an unprocessed log row for the given entry.
    pub fn unprocessed(employee_id: Uuid, entry: RawPunchEntry) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id,
            entry,
            processed: false,
            created_at: Utc::now(),
        }
    }
}
