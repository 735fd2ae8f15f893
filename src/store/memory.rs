//! In-memory implementation of every store trait.
//!
//! Tables live behind a single `tokio::sync::RwLock`, so check-then-write
//! sequences such as the payroll uniqueness guard run under one write lock.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, Employee, Holiday, LeaveApplication, PaymentStatus, PayrollFilter,
    PayrollRecord, PunchLog,
};

use super::{AttendanceStore, CalendarLookup, EmployeeDirectory, PayrollStore, UpsertOutcome};

#[derive(Debug, Default)]
struct Tables {
    employees: HashMap<Uuid, Employee>,
    punch_logs: Vec<PunchLog>,
    attendance: HashMap<(Uuid, NaiveDate), AttendanceRecord>,
    holidays: BTreeMap<NaiveDate, Holiday>,
    leaves: Vec<LeaveApplication>,
    payrolls: HashMap<Uuid, PayrollRecord>,
    payroll_keys: HashMap<(Uuid, i32, u32), Uuid>,
}

/// A process-local store implementing [`EmployeeDirectory`],
/// [`AttendanceStore`], [`CalendarLookup`] and [`PayrollStore`].
///
/// # Example
///
/// ```
/// use attendance_payroll::store::{EmployeeDirectory, InMemoryStore};
/// use attendance_payroll::models::Employee;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = InMemoryStore::new();
/// store
///     .insert_employee(Employee {
///         id: Uuid::new_v4(),
///         employee_number: "E001".to_string(),
///         full_name: "Asha Rao".to_string(),
///         base_salary: Decimal::new(22000, 0),
///         is_active: true,
///     })
///     .await;
///
/// assert!(store.find_by_code("E001").await.unwrap().is_some());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with the given holidays.
    pub fn with_holidays(holidays: impl IntoIterator<Item = Holiday>) -> Self {
        let tables = Tables {
            holidays: holidays.into_iter().map(|h| (h.date, h)).collect(),
            ..Default::default()
        };
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Creates a store preloaded with the configured holiday calendar.
    pub fn from_config(config: &ConfigLoader) -> Self {
        Self::with_holidays(config.holidays().iter().cloned())
    }

    /// Adds or replaces an employee.
    pub async fn insert_employee(&self, employee: Employee) {
        self.tables
            .write()
            .await
            .employees
            .insert(employee.id, employee);
    }

    /// Adds or replaces a holiday.
    pub async fn insert_holiday(&self, holiday: Holiday) {
        self.tables
            .write()
            .await
            .holidays
            .insert(holiday.date, holiday);
    }

    /// Adds a leave application.
    pub async fn insert_leave(&self, leave: LeaveApplication) {
        self.tables.write().await.leaves.push(leave);
    }

    /// Returns every punch log, processed or not, in insertion order.
    pub async fn punch_logs(&self) -> Vec<PunchLog> {
        self.tables.read().await.punch_logs.clone()
    }

    /// Returns every attendance record ordered by (date, employee).
    pub async fn all_attendance(&self) -> Vec<AttendanceRecord> {
        let tables = self.tables.read().await;
        let mut records: Vec<AttendanceRecord> = tables.attendance.values().cloned().collect();
        records.sort_by_key(|r| (r.date, r.employee_id));
        records
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryStore {
    async fn find_by_code(&self, employee_code: &str) -> EngineResult<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables
            .employees
            .values()
            .find(|e| e.employee_number == employee_code)
            .cloned())
    }

    async fn find_by_id(&self, employee_id: Uuid) -> EngineResult<Option<Employee>> {
        Ok(self.tables.read().await.employees.get(&employee_id).cloned())
    }

    async fn active_employees(&self) -> EngineResult<Vec<Employee>> {
        let tables = self.tables.read().await;
        let mut employees: Vec<Employee> = tables
            .employees
            .values()
            .filter(|e| e.is_active)
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.employee_number.cmp(&b.employee_number));
        Ok(employees)
    }
}

#[async_trait]
impl AttendanceStore for InMemoryStore {
    async fn insert_punch_log(&self, log: PunchLog) -> EngineResult<()> {
        self.tables.write().await.punch_logs.push(log);
        Ok(())
    }

    async fn unprocessed_punch_logs(&self, date: Option<NaiveDate>) -> EngineResult<Vec<PunchLog>> {
        let tables = self.tables.read().await;
        Ok(tables
            .punch_logs
            .iter()
            .filter(|log| !log.processed && date.is_none_or(|d| log.entry.date == d))
            .cloned()
            .collect())
    }

    async fn mark_punch_logs_processed(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> EngineResult<usize> {
        let mut tables = self.tables.write().await;
        let mut changed = 0;
        for log in tables.punch_logs.iter_mut().filter(|log| {
            !log.processed && log.employee_id == employee_id && log.entry.date == date
        }) {
            log.processed = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn upsert_attendance(&self, record: AttendanceRecord) -> EngineResult<UpsertOutcome> {
        let mut tables = self.tables.write().await;
        match tables.attendance.entry((record.employee_id, record.date)) {
            Entry::Occupied(mut slot) => {
                let id = slot.get().id;
                slot.insert(AttendanceRecord { id, ..record });
                Ok(UpsertOutcome::Updated)
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(UpsertOutcome::Created)
            }
        }
    }

    async fn attendance_between(
        &self,
        employee_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        let tables = self.tables.read().await;
        let mut records: Vec<AttendanceRecord> = tables
            .attendance
            .values()
            .filter(|r| r.employee_id == employee_id && r.date >= start && r.date <= end)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }
}

#[async_trait]
impl CalendarLookup for InMemoryStore {
    async fn holidays_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<Holiday>> {
        if start > end {
            return Ok(Vec::new());
        }
        let tables = self.tables.read().await;
        Ok(tables
            .holidays
            .range(start..=end)
            .map(|(_, h)| h.clone())
            .collect())
    }

    async fn has_approved_leave(&self, employee_id: Uuid, date: NaiveDate) -> EngineResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .leaves
            .iter()
            .any(|leave| leave.employee_id == employee_id && leave.covers(date)))
    }
}

#[async_trait]
impl PayrollStore for InMemoryStore {
    async fn find_payroll(
        &self,
        employee_id: Uuid,
        year: i32,
        month: u32,
    ) -> EngineResult<Option<PayrollRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .payroll_keys
            .get(&(employee_id, year, month))
            .and_then(|id| tables.payrolls.get(id))
            .cloned())
    }

    async fn insert_payroll(&self, record: PayrollRecord) -> EngineResult<PayrollRecord> {
        let mut tables = self.tables.write().await;
        let key = (record.employee_id, record.year, record.month);
        if tables.payroll_keys.contains_key(&key) {
            return Err(EngineError::DuplicatePayroll {
                employee_id: record.employee_id,
                month: record.month,
                year: record.year,
            });
        }
        tables.payroll_keys.insert(key, record.id);
        tables.payrolls.insert(record.id, record.clone());
        Ok(record)
    }

    async fn payroll_by_id(&self, id: Uuid) -> EngineResult<Option<PayrollRecord>> {
        Ok(self.tables.read().await.payrolls.get(&id).cloned())
    }

    async fn list_payrolls(&self, filter: &PayrollFilter) -> EngineResult<Vec<PayrollRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .payrolls
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn update_payment_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
        payment_date: Option<DateTime<Utc>>,
    ) -> EngineResult<PayrollRecord> {
        let mut tables = self.tables.write().await;
        let record = tables
            .payrolls
            .get_mut(&id)
            .ok_or(EngineError::PayrollNotFound { id })?;
        record.status = status;
        record.payment_date = payment_date;
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, EmployeeSnapshot, LeaveStatus, RawPunchEntry};
    use rust_decimal::Decimal;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn make_employee(number: &str, active: bool) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            employee_number: number.to_string(),
            full_name: format!("Employee {}", number),
            base_salary: Decimal::new(22000, 0),
            is_active: active,
        }
    }

    fn make_record(employee_id: Uuid, date: &str, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: Uuid::new_v4(),
            employee_id,
            date: make_date(date),
            status,
            first_in: None,
            last_out: None,
            total_duration_minutes: 0,
            synced: true,
            updated_at: Utc::now(),
        }
    }

    fn make_payroll(employee: &Employee, year: i32, month: u32) -> PayrollRecord {
        PayrollRecord {
            id: Uuid::new_v4(),
            employee_id: employee.id,
            employee: EmployeeSnapshot {
                id: employee.id,
                employee_number: employee.employee_number.clone(),
                full_name: employee.full_name.clone(),
            },
            month,
            year,
            base_salary: employee.base_salary,
            working_days: 22,
            present_days: 22,
            casual_leave_days: 0,
            half_days: 0,
            loss_of_pay_days: 0,
            total_pay_days: Decimal::new(22, 0),
            gross_earnings: employee.base_salary,
            deductions: Decimal::ZERO,
            reimbursements: Decimal::ZERO,
            net_salary: employee.base_salary,
            status: PaymentStatus::Draft,
            payment_date: None,
            generated_at: Utc::now(),
            generated_by: "system".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates_keeping_id() {
        let store = InMemoryStore::new();
        let employee_id = Uuid::new_v4();
        let first = make_record(employee_id, "2026-01-15", AttendanceStatus::Absent);
        let first_id = first.id;

        assert_eq!(
            store.upsert_attendance(first).await.unwrap(),
            UpsertOutcome::Created
        );
        assert_eq!(
            store
                .upsert_attendance(make_record(employee_id, "2026-01-15", AttendanceStatus::Present))
                .await
                .unwrap(),
            UpsertOutcome::Updated
        );

        let records = store.all_attendance().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, first_id);
        assert_eq!(records[0].status, AttendanceStatus::Present);
    }

    #[tokio::test]
    async fn test_attendance_between_is_inclusive_and_sorted() {
        let store = InMemoryStore::new();
        let employee_id = Uuid::new_v4();
        for date in ["2026-02-01", "2026-01-31", "2026-01-01", "2025-12-31"] {
            store
                .upsert_attendance(make_record(employee_id, date, AttendanceStatus::Present))
                .await
                .unwrap();
        }

        let records = store
            .attendance_between(employee_id, make_date("2026-01-01"), make_date("2026-01-31"))
            .await
            .unwrap();
        let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![make_date("2026-01-01"), make_date("2026-01-31")]);
    }

    #[tokio::test]
    async fn test_mark_processed_only_touches_matching_logs() {
        let store = InMemoryStore::new();
        let employee_id = Uuid::new_v4();
        let entry = |date: &str| RawPunchEntry {
            employee_code: "E001".to_string(),
            date: make_date(date),
            in_time: None,
            out_time: None,
            in_door: None,
            out_door: None,
            duration_minutes: 0,
        };
        store
            .insert_punch_log(PunchLog::unprocessed(employee_id, entry("2026-01-15")))
            .await
            .unwrap();
        store
            .insert_punch_log(PunchLog::unprocessed(employee_id, entry("2026-01-16")))
            .await
            .unwrap();

        let changed = store
            .mark_punch_logs_processed(employee_id, make_date("2026-01-15"))
            .await
            .unwrap();
        assert_eq!(changed, 1);

        let remaining = store.unprocessed_punch_logs(None).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].entry.date, make_date("2026-01-16"));
        assert!(
            store
                .unprocessed_punch_logs(Some(make_date("2026-01-15")))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_active_employees_excludes_inactive() {
        let store = InMemoryStore::new();
        store.insert_employee(make_employee("E002", true)).await;
        store.insert_employee(make_employee("E001", true)).await;
        store.insert_employee(make_employee("E003", false)).await;

        let active = store.active_employees().await.unwrap();
        let numbers: Vec<&str> = active.iter().map(|e| e.employee_number.as_str()).collect();
        assert_eq!(numbers, vec!["E001", "E002"]);
    }

    #[tokio::test]
    async fn test_insert_payroll_rejects_duplicate_key() {
        let store = InMemoryStore::new();
        let employee = make_employee("E001", true);

        store.insert_payroll(make_payroll(&employee, 2026, 3)).await.unwrap();
        let duplicate = store.insert_payroll(make_payroll(&employee, 2026, 3)).await;

        assert!(matches!(duplicate, Err(EngineError::DuplicatePayroll { .. })));
        assert_eq!(
            store.list_payrolls(&PayrollFilter::default()).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_update_payment_status_unknown_id() {
        let store = InMemoryStore::new();
        let result = store
            .update_payment_status(Uuid::new_v4(), PaymentStatus::Paid, Some(Utc::now()))
            .await;
        assert!(matches!(result, Err(EngineError::PayrollNotFound { .. })));
    }

    #[tokio::test]
    async fn test_holiday_and_leave_lookups() {
        let store = InMemoryStore::with_holidays(vec![Holiday {
            date: make_date("2026-01-26"),
            name: "Republic Day".to_string(),
        }]);
        let employee_id = Uuid::new_v4();
        store
            .insert_leave(LeaveApplication {
                id: Uuid::new_v4(),
                employee_id,
                start_date: make_date("2026-01-12"),
                end_date: make_date("2026-01-13"),
                status: LeaveStatus::Approved,
            })
            .await;

        assert!(store.is_holiday(make_date("2026-01-26")).await.unwrap());
        assert!(!store.is_holiday(make_date("2026-01-27")).await.unwrap());
        assert!(
            store
                .has_approved_leave(employee_id, make_date("2026-01-13"))
                .await
                .unwrap()
        );
        assert!(
            !store
                .has_approved_leave(Uuid::new_v4(), make_date("2026-01-13"))
                .await
                .unwrap()
        );
    }
}
