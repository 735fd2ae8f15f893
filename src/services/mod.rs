//! Reconciliation and payroll services.
//!
//! Services are stateless async functions. Each call receives a borrowed
//! context of store trait objects plus the loaded policy, so the same
//! functions run against the [`InMemoryStore`](crate::store::InMemoryStore)
//! in tests and against a database adapter in production.

mod orchestrator;
mod payroll;
mod reconciliation;

use crate::config::AttendancePolicy;
use crate::store::{AttendanceStore, CalendarLookup, EmployeeDirectory, PayrollStore};

pub use orchestrator::{
    BatchFailure, BatchSummary, PayrollGeneration, PayrollGenerationRequest, generate,
    generate_payroll, generate_payroll_batch, get_payroll, list_payrolls, mark_as_paid,
    mark_as_pending,
};
pub use payroll::calculate_payroll;
pub use reconciliation::{
    AttendanceImportRow, ImportError, ImportSummary, ReconciliationError, ReconciliationSummary,
    UnprocessedPunch, import_attendance, list_unprocessed_punches, reconcile_date,
    reconcile_entries, yesterday,
};

/// Dependencies of the reconciliation service.
#[derive(Clone, Copy)]
pub struct ReconcileContext<'a> {
    /// Employee lookups.
    pub employees: &'a dyn EmployeeDirectory,
    /// Punch log and attendance storage.
    pub attendance: &'a dyn AttendanceStore,
    /// Holiday and leave lookups.
    pub calendar: &'a dyn CalendarLookup,
    /// Loaded policy.
    pub policy: &'a AttendancePolicy,
}

impl<'a> ReconcileContext<'a> {
    /// Builds a context whose stores are all served by one adapter.
    pub fn from_store<S>(store: &'a S, policy: &'a AttendancePolicy) -> Self
    where
        S: EmployeeDirectory + AttendanceStore + CalendarLookup,
    {
        Self {
            employees: store,
            attendance: store,
            calendar: store,
            policy,
        }
    }
}

/// Dependencies of the payroll calculator and orchestrator.
#[derive(Clone, Copy)]
pub struct PayrollContext<'a> {
    /// Employee lookups.
    pub employees: &'a dyn EmployeeDirectory,
    /// Attendance storage.
    pub attendance: &'a dyn AttendanceStore,
    /// Holiday lookups.
    pub calendar: &'a dyn CalendarLookup,
    /// Payroll record storage.
    pub payroll: &'a dyn PayrollStore,
    /// Loaded policy.
    pub policy: &'a AttendancePolicy,
}

impl<'a> PayrollContext<'a> {
    /// Builds a context whose stores are all served by one adapter.
    pub fn from_store<S>(store: &'a S, policy: &'a AttendancePolicy) -> Self
    where
        S: EmployeeDirectory + AttendanceStore + CalendarLookup + PayrollStore,
    {
        Self {
            employees: store,
            attendance: store,
            calendar: store,
            payroll: store,
            policy,
        }
    }
}
