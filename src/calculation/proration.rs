//! Salary proration from monthly attendance.
//!
//! This module tallies a month of attendance records into pay-day
//! equivalents and prorates the base salary over the month's working days.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::RoundingMode;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, AttendanceStatus, AuditStep, PayrollBreakdown};

/// Pay-day credit of a half day.
pub const HALF_DAY_CREDIT: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Count of attendance days per status for one month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceTally {
    /// Days with status PRESENT.
    pub present_days: u32,
    /// Days with status CASUAL_LEAVE.
    pub casual_leave_days: u32,
    /// Days with status HALF_DAY.
    pub half_days: u32,
    /// Days with status ABSENT.
    pub loss_of_pay_days: u32,
    /// Days with status WEEKEND (not credited).
    pub weekend_days: u32,
    /// Days with status HOLIDAY (not credited).
    pub holiday_days: u32,
}

impl AttendanceTally {
    /// Returns `present + casual_leave + 0.5 * half_days`.
    ///
    /// ```
    /// use attendance_payroll::calculation::AttendanceTally;
    /// use rust_decimal::Decimal;
    ///
    /// let tally = AttendanceTally { present_days: 18, half_days: 4, ..Default::default() };
    /// assert_eq!(tally.total_pay_days(), Decimal::new(20, 0));
    /// ```
    pub fn total_pay_days(&self) -> Decimal {
        Decimal::from(self.present_days + self.casual_leave_days)
            + Decimal::from(self.half_days) * HALF_DAY_CREDIT
    }
}

/// Counts attendance records by status.
pub fn tally_attendance(records: &[AttendanceRecord]) -> AttendanceTally {
    records
        .iter()
        .fold(AttendanceTally::default(), |mut tally, record| {
            match record.status {
                AttendanceStatus::Present => tally.present_days += 1,
                AttendanceStatus::CasualLeave => tally.casual_leave_days += 1,
                AttendanceStatus::HalfDay => tally.half_days += 1,
                AttendanceStatus::Absent => tally.loss_of_pay_days += 1,
                AttendanceStatus::Weekend => tally.weekend_days += 1,
                AttendanceStatus::Holiday => tally.holiday_days += 1,
            }
            tally
        })
}

/// Inputs to [`prorate_salary`] for one employee and month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProrationInput {
    /// The employee the breakdown is for.
    pub employee_id: Uuid,
    /// The payroll year.
    pub year: i32,
    /// The payroll month (1-12).
    pub month: u32,
    /// Base monthly salary.
    pub base_salary: Decimal,
    /// Working days in the month.
    pub working_days: u32,
    /// Attendance tally for the month.
    pub tally: AttendanceTally,
}

/// Computes the salary breakdown for a month.
///
/// `gross = round(total_pay_days * base_salary / working_days)`, multiplied
/// before dividing so that exact ratios stay exact. Deductions and
/// reimbursements are zero.
///
/// # Errors
///
/// Returns [`EngineError::ZeroWorkingDays`] when `working_days` is zero, and
/// [`EngineError::CalculationOverflow`] when the result leaves the decimal range.
///
/// # Example
///
/// ```
/// use attendance_payroll::calculation::{prorate_salary, AttendanceTally, ProrationInput};
/// use attendance_payroll::config::RoundingMode;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let breakdown = prorate_salary(
///     ProrationInput {
///         employee_id: Uuid::new_v4(),
///         year: 2026,
///         month: 3,
///         base_salary: Decimal::new(22000, 0),
///         working_days: 22,
///         tally: AttendanceTally { present_days: 18, half_days: 4, ..Default::default() },
///     },
///     RoundingMode::HalfUp,
/// )
/// .unwrap();
///
/// assert_eq!(breakdown.gross_earnings, Decimal::new(20000, 0));
/// ```
pub fn prorate_salary(
    input: ProrationInput,
    rounding: RoundingMode,
) -> EngineResult<PayrollBreakdown> {
    if input.working_days == 0 {
        return Err(EngineError::ZeroWorkingDays {
            month: input.month,
            year: input.year,
        });
    }

    let tally = input.tally;
    let total_pay_days = tally.total_pay_days();
    let unrounded = total_pay_days
        .checked_mul(input.base_salary)
        .and_then(|product| product.checked_div(Decimal::from(input.working_days)))
        .ok_or(EngineError::CalculationOverflow {
            employee_id: input.employee_id,
            month: input.month,
            year: input.year,
        })?;
    let gross_earnings = rounding.round(unrounded);
    let deductions = Decimal::ZERO;
    let reimbursements = Decimal::ZERO;
    let net_salary = gross_earnings - deductions + reimbursements;

    let audit_steps = vec![
        AuditStep {
            step_number: 1,
            rule_id: "attendance_tally".to_string(),
            rule_name: "Attendance Tally".to_string(),
            input: serde_json::json!({
                "year": input.year,
                "month": input.month
            }),
            output: serde_json::json!({
                "present_days": tally.present_days,
                "casual_leave_days": tally.casual_leave_days,
                "half_days": tally.half_days,
                "loss_of_pay_days": tally.loss_of_pay_days,
                "total_pay_days": total_pay_days.normalize().to_string()
            }),
            reasoning: format!(
                "{} present + {} casual leave + 0.5 x {} half days = {} pay days",
                tally.present_days,
                tally.casual_leave_days,
                tally.half_days,
                total_pay_days.normalize()
            ),
        },
        AuditStep {
            step_number: 2,
            rule_id: "salary_proration".to_string(),
            rule_name: "Salary Proration".to_string(),
            input: serde_json::json!({
                "base_salary": input.base_salary.normalize().to_string(),
                "working_days": input.working_days,
                "total_pay_days": total_pay_days.normalize().to_string(),
                "rounding": rounding
            }),
            output: serde_json::json!({
                "unrounded": unrounded.normalize().to_string(),
                "gross_earnings": gross_earnings.normalize().to_string(),
                "net_salary": net_salary.normalize().to_string()
            }),
            reasoning: format!(
                "{} pay days / {} working days x {} = {} (rounded to {})",
                total_pay_days.normalize(),
                input.working_days,
                input.base_salary.normalize(),
                unrounded.normalize(),
                gross_earnings.normalize()
            ),
        },
    ];

    Ok(PayrollBreakdown {
        employee_id: input.employee_id,
        month: input.month,
        year: input.year,
        base_salary: input.base_salary,
        working_days: input.working_days,
        present_days: tally.present_days,
        casual_leave_days: tally.casual_leave_days,
        half_days: tally.half_days,
        loss_of_pay_days: tally.loss_of_pay_days,
        total_pay_days,
        gross_earnings,
        deductions,
        reimbursements,
        net_salary,
        audit_steps,
    })
}
