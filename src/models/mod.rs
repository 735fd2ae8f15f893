//! Core data models for the attendance and payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod audit;
mod calendar;
mod employee;
mod payroll;
mod punch;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use audit::AuditStep;
pub use calendar::{Holiday, LeaveApplication, LeaveStatus};
pub use employee::{Employee, EmployeeSnapshot};
pub use payroll::{PaymentStatus, PayrollBreakdown, PayrollFilter, PayrollRecord};
pub use punch::{PunchLog, RawPunchEntry};
