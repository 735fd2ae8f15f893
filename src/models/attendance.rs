//! Attendance status and daily attendance records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

/// The canonical attendance status of an employee for one day.
///
/// # Example
///
/// ```
/// use attendance_payroll::models::AttendanceStatus;
///
/// let status: AttendanceStatus = "HD".parse().unwrap();
/// assert_eq!(status, AttendanceStatus::HalfDay);
/// assert_eq!(status.to_string(), "HALF_DAY");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    /// Worked at least the full-day threshold.
    Present,
    /// Worked less than the half-day threshold (loss of pay).
    Absent,
    /// Worked at least the half-day threshold but less than a full day.
    HalfDay,
    /// Covered by an approved leave application.
    CasualLeave,
    /// Saturday or Sunday.
    Weekend,
    /// Declared holiday.
    Holiday,
}

impl AttendanceStatus {
    /// Returns the canonical upper-case name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "PRESENT",
            AttendanceStatus::Absent => "ABSENT",
            AttendanceStatus::HalfDay => "HALF_DAY",
            AttendanceStatus::CasualLeave => "CASUAL_LEAVE",
            AttendanceStatus::Weekend => "WEEKEND",
            AttendanceStatus::Holiday => "HOLIDAY",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = EngineError;

    /// Parses canonical names (case-insensitive) and the short codes
    /// `P`, `A`, `HD`, `CL`, `WO` and `H`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PRESENT" | "P" => Ok(AttendanceStatus::Present),
            "ABSENT" | "A" => Ok(AttendanceStatus::Absent),
            "HALF_DAY" | "HD" => Ok(AttendanceStatus::HalfDay),
            "CASUAL_LEAVE" | "CL" => Ok(AttendanceStatus::CasualLeave),
            "WEEKEND" | "WO" => Ok(AttendanceStatus::Weekend),
            "HOLIDAY" | "H" => Ok(AttendanceStatus::Holiday),
            _ => Err(EngineError::UnknownStatus {
                code: s.to_string(),
            }),
        }
    }
}

/// The authoritative attendance of one employee on one date.
///
/// At most one record exists per (employee, date); stores enforce this by
/// upserting on that key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier of the record.
    pub id: Uuid,
    /// The employee the record belongs to.
    pub employee_id: Uuid,
    /// The calendar date.
    pub date: NaiveDate,
    /// The reconciled status.
    pub status: AttendanceStatus,
    /// Earliest in-punch of the day.
    pub first_in: Option<NaiveTime>,
    /// Latest out-punch of the day.
    pub last_out: Option<NaiveTime>,
    /// Sum of punch durations in minutes.
    pub total_duration_minutes: i64,
    /// True when produced by biometric reconciliation.
    pub synced: bool,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl AttendanceRecord {
    /// Returns true if two records carry the same attendance facts,
    /// ignoring the write timestamp.
    pub fn same_facts(&self, other: &AttendanceRecord) -> bool {
        self.employee_id == other.employee_id
            && self.date == other.date
            && self.status == other.status
            && self.first_in == other.first_in
            && self.last_out == other.last_out
            && self.total_duration_minutes == other.total_duration_minutes
            && self.synced == other.synced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::HalfDay).unwrap(),
            "\"HALF_DAY\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::CasualLeave).unwrap(),
            "\"CASUAL_LEAVE\""
        );
    }

    #[test]
    fn test_status_deserialization() {
        let status: AttendanceStatus = serde_json::from_str("\"WEEKEND\"").unwrap();
        assert_eq!(status, AttendanceStatus::Weekend);
    }

    #[test]
    fn test_parse_canonical_names_case_insensitive() {
        assert_eq!(
            "present".parse::<AttendanceStatus>().unwrap(),
            AttendanceStatus::Present
        );
        assert_eq!(
            " Casual_Leave ".parse::<AttendanceStatus>().unwrap(),
            AttendanceStatus::CasualLeave
        );
    }

    #[test]
    fn test_parse_short_codes() {
        assert_eq!("P".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::Present);
        assert_eq!("a".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::Absent);
        assert_eq!("WO".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::Weekend);
        assert_eq!("H".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::Holiday);
    }

    #[test]
    fn test_parse_unknown_code_is_error() {
        match "LATE".parse::<AttendanceStatus>() {
            Err(EngineError::UnknownStatus { code }) => assert_eq!(code, "LATE"),
            other => panic!("Expected UnknownStatus, got {:?}", other),
        }
    }

    #[test]
    fn test_display_matches_serialized_name() {
        for status in [
            AttendanceStatus::Present,
            AttendanceStatus::Absent,
            AttendanceStatus::HalfDay,
            AttendanceStatus::CasualLeave,
            AttendanceStatus::Weekend,
            AttendanceStatus::Holiday,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
    }

    #[test]
    fn test_same_facts_ignores_timestamp() {
        let record = AttendanceRecord {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            status: AttendanceStatus::Present,
            first_in: NaiveTime::from_hms_opt(9, 0, 0),
            last_out: NaiveTime::from_hms_opt(17, 0, 0),
            total_duration_minutes: 480,
            synced: true,
            updated_at: Utc::now(),
        };
        let mut later = record.clone();
        later.updated_at = record.updated_at + chrono::Duration::minutes(5);
        assert!(record.same_facts(&later));

        later.status = AttendanceStatus::HalfDay;
        assert!(!record.same_facts(&later));
    }
}
