//! Pure calculation logic for attendance and payroll.
//!
//! This module contains the working-day calendar, the attendance classifier
//! that turns a day of punches into a status, and the salary proration that
//! turns a month of statuses into a payroll breakdown. Nothing here touches
//! persistence.

mod classifier;
mod proration;
mod working_days;

pub use classifier::{
    DailyClassification, DayContext, MINUTES_PER_DAY, classify_day, classify_worked_hours,
};
pub use proration::{
    AttendanceTally, HALF_DAY_CREDIT, ProrationInput, prorate_salary, tally_attendance,
};
pub use working_days::{count_working_days, is_weekend, month_bounds};
