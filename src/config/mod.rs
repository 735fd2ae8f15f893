//! Configuration loading and management.
//!
//! This module provides functionality to load the attendance policy and holiday
//! calendars from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use attendance_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Full day: {} hours", config.policy().thresholds.present_hours);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AttendancePolicy, ClassificationThresholds, EngineConfig, HolidayCalendarFile, PayrollPolicy,
    ReconciliationPolicy, RoundingMode,
};
