//! Persistence and lookup interfaces.
//!
//! Services never hold state of their own: every read and write goes through
//! the traits in this module, which a database adapter implements. The
//! [`InMemoryStore`] adapter implements all of them over in-process maps.

mod memory;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{
    AttendanceRecord, Employee, Holiday, PaymentStatus, PayrollFilter, PayrollRecord, PunchLog,
};

pub use memory::InMemoryStore;

/// Whether an upsert created a new row or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record existed for the key; one was created.
    Created,
    /// A record existed for the key and was overwritten.
    Updated,
}

/// Read access to employees.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Finds an employee by device-side code (employee number).
    async fn find_by_code(&self, employee_code: &str) -> EngineResult<Option<Employee>>;

    /// Finds an employee by id.
    async fn find_by_id(&self, employee_id: Uuid) -> EngineResult<Option<Employee>>;

    /// Returns all active employees.
    async fn active_employees(&self) -> EngineResult<Vec<Employee>>;
}

/// Storage for punch logs and attendance records.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Persists a punch log row.
    async fn insert_punch_log(&self, log: PunchLog) -> EngineResult<()>;

    /// Returns unprocessed punch logs, optionally restricted to one date.
    async fn unprocessed_punch_logs(&self, date: Option<NaiveDate>) -> EngineResult<Vec<PunchLog>>;

    /// Marks every unprocessed log of (employee, date) as processed and
    /// returns how many rows changed.
    async fn mark_punch_logs_processed(
        &self,
        employee_id: Uuid,
        date: NaiveDate,
    ) -> EngineResult<usize>;

    /// Creates or overwrites the attendance record keyed by
    /// (employee, date). An overwrite keeps the stored record id.
    async fn upsert_attendance(&self, record: AttendanceRecord) -> EngineResult<UpsertOutcome>;

    /// Returns the employee's attendance records with dates in
    /// `start..=end`, ordered by date.
    async fn attendance_between(
        &self,
        employee_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>>;
}

/// Calendar and leave lookups.
#[async_trait]
pub trait CalendarLookup: Send + Sync {
    /// Returns holidays with dates in `start..=end`.
    async fn holidays_between(&self, start: NaiveDate, end: NaiveDate)
    -> EngineResult<Vec<Holiday>>;

    /// Returns true if an approved leave of the employee covers the date.
    async fn has_approved_leave(&self, employee_id: Uuid, date: NaiveDate) -> EngineResult<bool>;

    /// Returns true if the date is a holiday.
    async fn is_holiday(&self, date: NaiveDate) -> EngineResult<bool> {
        Ok(!self.holidays_between(date, date).await?.is_empty())
    }
}

/// Storage for payroll records.
///
/// Implementations must enforce uniqueness of (employee, month, year) in
/// [`PayrollStore::insert_payroll`] atomically, e.g. with a unique index,
/// and report a violation as [`crate::error::EngineError::DuplicatePayroll`].
#[async_trait]
pub trait PayrollStore: Send + Sync {
    /// Finds the record of an employee for a period.
    async fn find_payroll(
        &self,
        employee_id: Uuid,
        year: i32,
        month: u32,
    ) -> EngineResult<Option<PayrollRecord>>;

    /// Inserts a new record, failing on a duplicate (employee, month, year).
    async fn insert_payroll(&self, record: PayrollRecord) -> EngineResult<PayrollRecord>;

    /// Finds a record by id.
    async fn payroll_by_id(&self, id: Uuid) -> EngineResult<Option<PayrollRecord>>;

    /// Returns the records matching the filter, in no particular order.
    async fn list_payrolls(&self, filter: &PayrollFilter) -> EngineResult<Vec<PayrollRecord>>;

    /// Updates the payment status and date of a record.
    async fn update_payment_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
        payment_date: Option<DateTime<Utc>>,
    ) -> EngineResult<PayrollRecord>;
}
