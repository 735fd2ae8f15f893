//! Configuration types for attendance classification and payroll.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::Holiday;

/// Hour thresholds that split worked time into attendance statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationThresholds {
    /// Hours at or above which a day is PRESENT.
    pub present_hours: Decimal,
    /// Hours at or above which a day is HALF_DAY (below `present_hours`).
    pub half_day_hours: Decimal,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            present_hours: Decimal::new(8, 0),
            half_day_hours: Decimal::new(4, 0),
        }
    }
}

/// How prorated gross earnings are rounded to a whole unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Midpoints round away from zero (20.5 -> 21).
    #[default]
    HalfUp,
    /// Midpoints round to the nearest even number (20.5 -> 20, 21.5 -> 22).
    HalfEven,
}

impl RoundingMode {
    /// Rounds a value to zero decimal places with this mode.
    ///
    /// ```
    /// use attendance_payroll::config::RoundingMode;
    /// use rust_decimal::Decimal;
    ///
    /// let value = Decimal::new(205, 1); // 20.5
    /// assert_eq!(RoundingMode::HalfUp.round(value), Decimal::new(21, 0));
    /// assert_eq!(RoundingMode::HalfEven.round(value), Decimal::new(20, 0));
    /// ```
    pub fn round(&self, value: Decimal) -> Decimal {
        let strategy = match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        };
        value.round_dp_with_strategy(0, strategy)
    }
}

/// Payroll generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPolicy {
    /// Rounding applied to gross earnings.
    #[serde(default)]
    pub rounding: RoundingMode,
    /// Author stamped on generated records when the caller gives none.
    #[serde(default = "default_author")]
    pub generated_by: String,
    /// Maximum employees generated concurrently in a batch.
    #[serde(default = "default_concurrency")]
    pub max_concurrency: usize,
}

impl Default for PayrollPolicy {
    fn default() -> Self {
        Self {
            rounding: RoundingMode::default(),
            generated_by: default_author(),
            max_concurrency: default_concurrency(),
        }
    }
}

/// Reconciliation run settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationPolicy {
    /// Maximum employee-day groups reconciled concurrently.
    #[serde(default = "default_concurrency")]
    pub max_concurrency: usize,
}

impl Default for ReconciliationPolicy {
    fn default() -> Self {
        Self {
            max_concurrency: default_concurrency(),
        }
    }
}

fn default_author() -> String {
    "system".to_string()
}

fn default_concurrency() -> usize {
    8
}

/// The policy file (`policy.yaml`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendancePolicy {
    /// Classification thresholds.
    #[serde(default)]
    pub thresholds: ClassificationThresholds,
    /// Payroll settings.
    #[serde(default)]
    pub payroll: PayrollPolicy,
    /// Reconciliation settings.
    #[serde(default)]
    pub reconciliation: ReconciliationPolicy,
}

/// A yearly holiday calendar file (`holidays/<year>.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayCalendarFile {
    /// The calendar year the file covers.
    pub year: i32,
    /// Holidays declared for the year.
    #[serde(default)]
    pub holidays: Vec<Holiday>,
}

/// The complete configuration loaded from a configuration directory.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Attendance and payroll policy.
    policy: AttendancePolicy,
    /// All holidays, sorted by date.
    holidays: Vec<Holiday>,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(policy: AttendancePolicy, holidays: Vec<Holiday>) -> Self {
        let mut sorted_holidays = holidays;
        sorted_holidays.sort_by(|a, b| a.date.cmp(&b.date));
        Self {
            policy,
            holidays: sorted_holidays,
        }
    }

    /// Returns the attendance and payroll policy.
    pub fn policy(&self) -> &AttendancePolicy {
        &self.policy
    }

    /// Returns all configured holidays, oldest first.
    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }
}
