//! Error types for the attendance and payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the reconciliation and payroll services can report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use attendance_payroll::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No employee exists with the given identifier.
    #[error("Employee not found: {employee}")]
    EmployeeNotFound {
        /// The employee id or code that was looked up.
        employee: String,
    },

    /// No payroll record exists with the given id.
    #[error("Payroll record not found: {id}")]
    PayrollNotFound {
        /// The payroll record id.
        id: Uuid,
    },

    /// A payroll record already exists for the employee and period.
    #[error("Payroll already generated for employee {employee_id} for {month:02}/{year}")]
    DuplicatePayroll {
        /// The employee the payroll belongs to.
        employee_id: Uuid,
        /// The payroll month (1-12).
        month: u32,
        /// The payroll year.
        year: i32,
    },

    /// The month has no working days, so salary cannot be prorated.
    #[error("No working days in {month:02}/{year}; cannot prorate salary")]
    ZeroWorkingDays {
        /// The payroll month (1-12).
        month: u32,
        /// The payroll year.
        year: i32,
    },

    /// Prorating the salary exceeded the decimal range.
    #[error("Salary calculation overflowed for employee {employee_id} for {month:02}/{year}")]
    CalculationOverflow {
        /// The employee whose salary was being prorated.
        employee_id: Uuid,
        /// The payroll month (1-12).
        month: u32,
        /// The payroll year.
        year: i32,
    },

    /// The year/month pair does not describe a calendar month.
    #[error("Invalid payroll period: {month}/{year}")]
    InvalidPeriod {
        /// The requested month.
        month: u32,
        /// The requested year.
        year: i32,
    },

    /// A punch entry carried inconsistent data.
    #[error("Invalid punch for '{employee_code}' on {date}: {message}")]
    InvalidPunch {
        /// The device-side employee code of the punch.
        employee_code: String,
        /// The punch date.
        date: NaiveDate,
        /// What made the punch invalid.
        message: String,
    },

    /// An attendance status code could not be recognised.
    #[error("Unknown attendance status code: {code}")]
    UnknownStatus {
        /// The unrecognised code.
        code: String,
    },

    /// A payment status change is not allowed from the current status.
    #[error("Cannot move payroll {id} from {from} to {to}")]
    InvalidStatusTransition {
        /// The payroll record id.
        id: Uuid,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },

    /// The persistence layer reported a failure.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

/// Coarse classification of an [`EngineError`] for callers that need to
/// surface conflicts separately from generic failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The referenced entity does not exist.
    NotFound,
    /// The operation was already done (e.g. duplicate payroll).
    Conflict,
    /// The input was rejected.
    Validation,
    /// The persistence layer failed.
    Storage,
    /// Configuration could not be loaded.
    Config,
}

impl EngineError {
    /// Returns the coarse [`ErrorKind`] of this error.
    ///
    /// ```
    /// use attendance_payroll::error::{EngineError, ErrorKind};
    /// use uuid::Uuid;
    ///
    /// let error = EngineError::DuplicatePayroll { employee_id: Uuid::nil(), month: 1, year: 2026 };
    /// assert_eq!(error.kind(), ErrorKind::Conflict);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ErrorKind::Config
            }
            EngineError::EmployeeNotFound { .. } | EngineError::PayrollNotFound { .. } => {
                ErrorKind::NotFound
            }
            EngineError::DuplicatePayroll { .. } => ErrorKind::Conflict,
            EngineError::ZeroWorkingDays { .. }
            | EngineError::CalculationOverflow { .. }
            | EngineError::InvalidPeriod { .. }
            | EngineError::InvalidPunch { .. }
            | EngineError::UnknownStatus { .. }
            | EngineError::InvalidStatusTransition { .. } => ErrorKind::Validation,
            EngineError::Storage { .. } => ErrorKind::Storage,
        }
    }

    /// Returns true if this error signals an already-existing record.
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
