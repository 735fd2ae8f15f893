//! Monthly payroll calculation.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::calculation::{
    ProrationInput, count_working_days, month_bounds, prorate_salary, tally_attendance,
};
use crate::error::{EngineError, EngineResult};
use crate::models::PayrollBreakdown;

use super::PayrollContext;

/// Calculates the payroll breakdown of an employee for a month.
///
/// Working days come from the calendar's holidays in the month; pay days
/// come from the employee's stored attendance records in the month. Nothing
/// is persisted.
///
/// # Errors
///
/// - [`EngineError::EmployeeNotFound`] if the employee does not exist
/// - [`EngineError::InvalidPeriod`] if `month` is not 1-12
/// - [`EngineError::ZeroWorkingDays`] if the month has no working days
pub async fn calculate_payroll(
    ctx: &PayrollContext<'_>,
    employee_id: Uuid,
    year: i32,
    month: u32,
) -> EngineResult<PayrollBreakdown> {
    let employee = ctx
        .employees
        .find_by_id(employee_id)
        .await?
        .ok_or_else(|| EngineError::EmployeeNotFound {
            employee: employee_id.to_string(),
        })?;

    let (start, end) = month_bounds(year, month)?;
    let holidays: HashSet<NaiveDate> = ctx
        .calendar
        .holidays_between(start, end)
        .await?
        .into_iter()
        .map(|holiday| holiday.date)
        .collect();
    let working_days = count_working_days(year, month, &holidays)?;

    let records = ctx
        .attendance
        .attendance_between(employee.id, start, end)
        .await?;
    let tally = tally_attendance(&records);

    let breakdown = prorate_salary(
        ProrationInput {
            employee_id: employee.id,
            year,
            month,
            base_salary: employee.base_salary,
            working_days,
            tally,
        },
        ctx.policy.payroll.rounding,
    )?;

    debug!(
        employee_number = %employee.employee_number,
        year,
        month,
        working_days,
        total_pay_days = %breakdown.total_pay_days,
        gross_earnings = %breakdown.gross_earnings,
        "Calculated payroll"
    );
    Ok(breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AttendancePolicy, RoundingMode};
    use crate::models::{AttendanceRecord, AttendanceStatus, Employee, Holiday};
    use crate::store::{AttendanceStore, InMemoryStore};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn make_employee(salary: &str) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            employee_number: "E001".to_string(),
            full_name: "Asha Rao".to_string(),
            base_salary: dec(salary),
            is_active: true,
        }
    }

    async fn record(
        store: &InMemoryStore,
        employee_id: Uuid,
        date: NaiveDate,
        status: AttendanceStatus,
    ) {
        store
            .upsert_attendance(AttendanceRecord {
                id: Uuid::new_v4(),
                employee_id,
                date,
                status,
                first_in: None,
                last_out: None,
                total_duration_minutes: 0,
                synced: true,
                updated_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    /// Marks the first `present` weekdays of March 2026 PRESENT and the next
    /// `half` weekdays HALF_DAY.
    async fn seed_march(store: &InMemoryStore, employee_id: Uuid, present: usize, half: usize) {
        let weekdays: Vec<NaiveDate> = (1..=31)
            .filter_map(|day| NaiveDate::from_ymd_opt(2026, 3, day))
            .filter(|date| !crate::calculation::is_weekend(*date))
            .collect();
        for date in &weekdays[..present] {
            record(store, employee_id, *date, AttendanceStatus::Present).await;
        }
        for date in &weekdays[present..present + half] {
            record(store, employee_id, *date, AttendanceStatus::HalfDay).await;
        }
    }

    /// PC-001: 22000 base, 22 working days, 18 present + 4 half days.
    #[tokio::test]
    async fn test_reference_month() {
        let store = InMemoryStore::new();
        let employee = make_employee("22000");
        store.insert_employee(employee.clone()).await;
        seed_march(&store, employee.id, 18, 4).await;
        let policy = AttendancePolicy::default();
        let ctx = PayrollContext::from_store(&store, &policy);

        let breakdown = calculate_payroll(&ctx, employee.id, 2026, 3).await.unwrap();

        assert_eq!(breakdown.working_days, 22);
        assert_eq!(breakdown.present_days, 18);
        assert_eq!(breakdown.half_days, 4);
        assert_eq!(breakdown.total_pay_days, dec("20"));
        assert_eq!(breakdown.gross_earnings, dec("20000"));
        assert_eq!(breakdown.net_salary, dec("20000"));
    }

    /// PC-002: Holidays in the month reduce the working-day divisor.
    #[tokio::test]
    async fn test_holiday_reduces_working_days() {
        let store = InMemoryStore::with_holidays(vec![Holiday {
            date: make_date("2026-01-26"),
            name: "Republic Day".to_string(),
        }]);
        let employee = make_employee("21000");
        store.insert_employee(employee.clone()).await;
        let policy = AttendancePolicy::default();
        let ctx = PayrollContext::from_store(&store, &policy);

        let breakdown = calculate_payroll(&ctx, employee.id, 2026, 1).await.unwrap();

        assert_eq!(breakdown.working_days, 21);
        assert_eq!(breakdown.total_pay_days, Decimal::ZERO);
        assert_eq!(breakdown.gross_earnings, Decimal::ZERO);
    }

    /// PC-003: Records outside the month are not counted.
    #[tokio::test]
    async fn test_only_records_in_month_are_tallied() {
        let store = InMemoryStore::new();
        let employee = make_employee("22000");
        store.insert_employee(employee.clone()).await;
        record(&store, employee.id, make_date("2026-02-27"), AttendanceStatus::Present).await;
        record(&store, employee.id, make_date("2026-03-02"), AttendanceStatus::Present).await;
        record(&store, employee.id, make_date("2026-03-07"), AttendanceStatus::Weekend).await;
        record(&store, employee.id, make_date("2026-04-01"), AttendanceStatus::Present).await;
        let policy = AttendancePolicy::default();
        let ctx = PayrollContext::from_store(&store, &policy);

        let breakdown = calculate_payroll(&ctx, employee.id, 2026, 3).await.unwrap();

        assert_eq!(breakdown.present_days, 1);
        assert_eq!(breakdown.total_pay_days, dec("1"));
        assert_eq!(breakdown.gross_earnings, dec("1000"));
    }

    #[tokio::test]
    async fn test_unknown_employee_is_not_found() {
        let store = InMemoryStore::new();
        let policy = AttendancePolicy::default();
        let ctx = PayrollContext::from_store(&store, &policy);

        let result = calculate_payroll(&ctx, Uuid::new_v4(), 2026, 3).await;

        assert!(matches!(result, Err(EngineError::EmployeeNotFound { .. })));
    }

    #[tokio::test]
    async fn test_invalid_month_is_rejected() {
        let store = InMemoryStore::new();
        let employee = make_employee("22000");
        store.insert_employee(employee.clone()).await;
        let policy = AttendancePolicy::default();
        let ctx = PayrollContext::from_store(&store, &policy);

        let result = calculate_payroll(&ctx, employee.id, 2026, 13).await;

        assert!(matches!(result, Err(EngineError::InvalidPeriod { month: 13, .. })));
    }

    /// PC-004: A month where every weekday is a holiday cannot be prorated.
    #[tokio::test]
    async fn test_all_holiday_month_has_zero_working_days() {
        let holidays: Vec<Holiday> = (1..=28)
            .filter_map(|day| NaiveDate::from_ymd_opt(2026, 2, day))
            .map(|date| Holiday {
                date,
                name: "Closure".to_string(),
            })
            .collect();
        let store = InMemoryStore::with_holidays(holidays);
        let employee = make_employee("22000");
        store.insert_employee(employee.clone()).await;
        let policy = AttendancePolicy::default();
        let ctx = PayrollContext::from_store(&store, &policy);

        let result = calculate_payroll(&ctx, employee.id, 2026, 2).await;

        assert!(matches!(
            result,
            Err(EngineError::ZeroWorkingDays { month: 2, year: 2026 })
        ));
    }

    /// PC-005: The configured rounding mode applies to gross earnings.
    #[tokio::test]
    async fn test_configured_rounding_mode_is_used() {
        let store = InMemoryStore::new();
        // 0.5 pay days * 500 / 20 working days = 12.5
        let employee = make_employee("500");
        store.insert_employee(employee.clone()).await;
        record(&store, employee.id, make_date("2026-02-02"), AttendanceStatus::HalfDay).await;

        let mut policy = AttendancePolicy::default();
        let ctx = PayrollContext::from_store(&store, &policy);
        let half_up = calculate_payroll(&ctx, employee.id, 2026, 2).await.unwrap();

        policy.payroll.rounding = RoundingMode::HalfEven;
        let ctx = PayrollContext::from_store(&store, &policy);
        let half_even = calculate_payroll(&ctx, employee.id, 2026, 2).await.unwrap();

        assert_eq!(half_up.gross_earnings, dec("13"));
        assert_eq!(half_even.gross_earnings, dec("12"));
    }
}
