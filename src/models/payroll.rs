//! Payroll breakdowns and persisted payroll records.
//!
//! A [`PayrollBreakdown`] is the pure output of the payroll calculator. The
//! orchestrator turns it into a [`PayrollRecord`] that is unique per
//! (employee, month, year) and immutable apart from its payment status.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuditStep, EmployeeSnapshot};

/// Payment state of a payroll record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Freshly generated, not yet submitted for payment.
    Draft,
    /// Submitted for payment.
    Pending,
    /// Paid out.
    Paid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Draft => write!(f, "DRAFT"),
            PaymentStatus::Pending => write!(f, "PENDING"),
            PaymentStatus::Paid => write!(f, "PAID"),
        }
    }
}

/// Salary breakdown for one employee and month.
///
/// `total_pay_days = present_days + casual_leave_days + 0.5 * half_days` and
/// `gross_earnings = round(total_pay_days * base_salary / working_days)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollBreakdown {
    /// The employee the breakdown is for.
    pub employee_id: Uuid,
    /// The payroll month (1-12).
    pub month: u32,
    /// The payroll year.
    pub year: i32,
    /// Base monthly salary used for proration.
    pub base_salary: Decimal,
    /// Weekdays in the month that are not holidays.
    pub working_days: u32,
    /// Days with status PRESENT.
    pub present_days: u32,
    /// Days with status CASUAL_LEAVE.
    pub casual_leave_days: u32,
    /// Days with status HALF_DAY.
    pub half_days: u32,
    /// Days with status ABSENT.
    pub loss_of_pay_days: u32,
    /// Pay-day equivalents credited toward salary.
    pub total_pay_days: Decimal,
    /// Prorated salary rounded to a whole unit.
    pub gross_earnings: Decimal,
    /// Deductions (currently always zero).
    pub deductions: Decimal,
    /// Reimbursements (currently always zero).
    pub reimbursements: Decimal,
    /// `gross_earnings - deductions + reimbursements`.
    pub net_salary: Decimal,
    /// The decisions that produced this breakdown.
    pub audit_steps: Vec<AuditStep>,
}

/// A persisted monthly payroll record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique identifier of the record.
    pub id: Uuid,
    /// The employee the record belongs to.
    pub employee_id: Uuid,
    /// Employee identity at generation time.
    pub employee: EmployeeSnapshot,
    /// The payroll month (1-12).
    pub month: u32,
    /// The payroll year.
    pub year: i32,
    /// Base salary snapshot.
    pub base_salary: Decimal,
    /// Working days in the month.
    pub working_days: u32,
    /// Days with status PRESENT.
    pub present_days: u32,
    /// Days with status CASUAL_LEAVE.
    pub casual_leave_days: u32,
    /// Days with status HALF_DAY.
    pub half_days: u32,
    /// Days with status ABSENT.
    pub loss_of_pay_days: u32,
    /// Pay-day equivalents.
    pub total_pay_days: Decimal,
    /// Prorated gross earnings.
    pub gross_earnings: Decimal,
    /// Deductions.
    pub deductions: Decimal,
    /// Reimbursements.
    pub reimbursements: Decimal,
    /// Net salary.
    pub net_salary: Decimal,
    /// Payment status.
    pub status: PaymentStatus,
    /// When the record was marked paid.
    pub payment_date: Option<DateTime<Utc>>,
    /// When the record was generated.
    pub generated_at: DateTime<Utc>,
    /// Who generated the record.
    pub generated_by: String,
}

impl PayrollRecord {
    /// Builds a new `DRAFT` record from a calculated breakdown.
    pub fn draft(
        breakdown: PayrollBreakdown,
        employee: EmployeeSnapshot,
        generated_by: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: breakdown.employee_id,
            employee,
            month: breakdown.month,
            year: breakdown.year,
            base_salary: breakdown.base_salary,
            working_days: breakdown.working_days,
            present_days: breakdown.present_days,
            casual_leave_days: breakdown.casual_leave_days,
            half_days: breakdown.half_days,
            loss_of_pay_days: breakdown.loss_of_pay_days,
            total_pay_days: breakdown.total_pay_days,
            gross_earnings: breakdown.gross_earnings,
            deductions: breakdown.deductions,
            reimbursements: breakdown.reimbursements,
            net_salary: breakdown.net_salary,
            status: PaymentStatus::Draft,
            payment_date: None,
            generated_at,
            generated_by: generated_by.into(),
        }
    }
}

/// Optional filters for listing payroll records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollFilter {
    /// Only records of this year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Only records of this month.
    #[serde(default)]
    pub month: Option<u32>,
    /// Only records of this employee.
    #[serde(default)]
    pub employee_id: Option<Uuid>,
}

impl PayrollFilter {
    /// Returns true if the record satisfies every set filter.
    pub fn matches(&self, record: &PayrollRecord) -> bool {
        self.year.is_none_or(|y| record.year == y)
            && self.month.is_none_or(|m| record.month == m)
            && self.employee_id.is_none_or(|id| record.employee_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_breakdown(employee_id: Uuid) -> PayrollBreakdown {
        PayrollBreakdown {
            employee_id,
            month: 1,
            year: 2026,
            base_salary: dec("22000"),
            working_days: 22,
            present_days: 18,
            casual_leave_days: 0,
            half_days: 4,
            loss_of_pay_days: 0,
            total_pay_days: dec("20.0"),
            gross_earnings: dec("20000"),
            deductions: Decimal::ZERO,
            reimbursements: Decimal::ZERO,
            net_salary: dec("20000"),
            audit_steps: vec![],
        }
    }

    fn create_snapshot(id: Uuid) -> EmployeeSnapshot {
        EmployeeSnapshot {
            id,
            employee_number: "E001".to_string(),
            full_name: "Asha Rao".to_string(),
        }
    }

    /// PR-001: draft records start unpaid
    #[test]
    fn test_draft_record_starts_unpaid() {
        let employee_id = Uuid::new_v4();
        let record = PayrollRecord::draft(
            create_breakdown(employee_id),
            create_snapshot(employee_id),
            "hr_admin",
            Utc::now(),
        );

        assert_eq!(record.status, PaymentStatus::Draft);
        assert!(record.payment_date.is_none());
        assert_eq!(record.generated_by, "hr_admin");
        assert_eq!(record.net_salary, dec("20000"));
        assert_eq!((record.employee_id, record.year, record.month), (employee_id, 2026, 1));
    }

    #[test]
    fn test_payment_status_serialization() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(PaymentStatus::Paid.to_string(), "PAID");
    }

    #[test]
    fn test_filter_matches_all_when_empty() {
        let employee_id = Uuid::new_v4();
        let record = PayrollRecord::draft(
            create_breakdown(employee_id),
            create_snapshot(employee_id),
            "system",
            Utc::now(),
        );
        assert!(PayrollFilter::default().matches(&record));
    }

    #[test]
    fn test_filter_rejects_other_month_and_employee() {
        let employee_id = Uuid::new_v4();
        let record = PayrollRecord::draft(
            create_breakdown(employee_id),
            create_snapshot(employee_id),
            "system",
            Utc::now(),
        );

        let by_month = PayrollFilter {
            month: Some(2),
            ..Default::default()
        };
        assert!(!by_month.matches(&record));

        let by_employee = PayrollFilter {
            employee_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(!by_employee.matches(&record));

        let exact = PayrollFilter {
            year: Some(2026),
            month: Some(1),
            employee_id: Some(employee_id),
        };
        assert!(exact.matches(&record));
    }

    #[test]
    fn test_decimal_fields_serialize_as_strings() {
        let employee_id = Uuid::new_v4();
        let record = PayrollRecord::draft(
            create_breakdown(employee_id),
            create_snapshot(employee_id),
            "system",
            Utc::now(),
        );
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"gross_earnings\":\"20000\""));
        assert!(json.contains("\"status\":\"DRAFT\""));
    }
}
