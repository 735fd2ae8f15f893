//! Attendance reconciliation and monthly payroll engine
//!
//! This crate reconciles raw time-clock punches into one canonical attendance
//! status per employee and day, and prorates monthly salaries from those
//! statuses over the month's working days.
//!
//! Pure rules live in [`calculation`]; [`services`] wires them to the
//! persistence traits in [`store`]. Policy and holiday calendars are loaded
//! from YAML through [`config`].

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
