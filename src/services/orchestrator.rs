//! Payroll generation and payment-status workflow.
//!
//! A payroll record is generated at most once per (employee, month, year).
//! The pre-check here gives a fast answer to the common case; the store's
//! insert is what actually enforces uniqueness, so two concurrent
//! generations for the same key still produce exactly one record.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult, ErrorKind};
use crate::models::{Employee, PaymentStatus, PayrollFilter, PayrollRecord};

use super::PayrollContext;
use super::payroll::calculate_payroll;

/// A generation request; a batch over all active employees when no
/// employee is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollGenerationRequest {
    /// The payroll year.
    pub year: i32,
    /// The payroll month (1-12).
    pub month: u32,
    /// Restricts generation to one employee.
    #[serde(default)]
    pub employee_id: Option<Uuid>,
    /// Author stamped on the records; the policy default when absent.
    #[serde(default)]
    pub generated_by: Option<String>,
}

/// One employee that failed during batch generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// The employee id.
    pub employee_id: Uuid,
    /// The employee number.
    pub employee_number: String,
    /// Why generation failed.
    pub reason: String,
    /// Failure class; `Conflict` means the record already existed.
    pub kind: ErrorKind,
}

/// Outcome of a batch generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Correlation id of the batch, also attached to its log lines.
    pub run_id: Uuid,
    /// Records created.
    pub success_count: usize,
    /// Employees that failed.
    pub failure_count: usize,
    /// Created records, ordered by employee number.
    pub results: Vec<PayrollRecord>,
    /// Failures, ordered by employee number.
    pub errors: Vec<BatchFailure>,
}

/// Result of [`generate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PayrollGeneration {
    /// One record for the requested employee.
    Single(PayrollRecord),
    /// Outcome over all active employees.
    Batch(BatchSummary),
}

/// Generates a `DRAFT` payroll record for one employee.
///
/// # Errors
///
/// - [`EngineError::DuplicatePayroll`] if a record already exists for the
///   period, including when a concurrent call won the insert
/// - any error of [`calculate_payroll`]
pub async fn generate_payroll(
    ctx: &PayrollContext<'_>,
    employee_id: Uuid,
    year: i32,
    month: u32,
    generated_by: &str,
) -> EngineResult<PayrollRecord> {
    if ctx
        .payroll
        .find_payroll(employee_id, year, month)
        .await?
        .is_some()
    {
        return Err(EngineError::DuplicatePayroll {
            employee_id,
            month,
            year,
        });
    }

    let employee = ctx
        .employees
        .find_by_id(employee_id)
        .await?
        .ok_or_else(|| EngineError::EmployeeNotFound {
            employee: employee_id.to_string(),
        })?;
    let breakdown = calculate_payroll(ctx, employee_id, year, month).await?;
    let record = PayrollRecord::draft(breakdown, employee.snapshot(), generated_by, Utc::now());

    let record = ctx.payroll.insert_payroll(record).await?;
    info!(
        payroll_id = %record.id,
        employee_number = %record.employee.employee_number,
        year,
        month,
        net_salary = %record.net_salary,
        "Generated payroll"
    );
    Ok(record)
}

/// Generates payroll for every active employee.
///
/// Employees are processed concurrently up to
/// `payroll.max_concurrency`. A failure for one employee, duplicates
/// included, is recorded and the rest of the batch continues.
pub async fn generate_payroll_batch(
    ctx: &PayrollContext<'_>,
    year: i32,
    month: u32,
    generated_by: &str,
) -> EngineResult<BatchSummary> {
    let run_id = Uuid::new_v4();
    let employees = ctx.employees.active_employees().await?;
    let concurrency = ctx.policy.payroll.max_concurrency.max(1);
    info!(
        run_id = %run_id,
        employees = employees.len(),
        year,
        month,
        "Starting payroll batch"
    );

    let outcomes: Vec<(Employee, EngineResult<PayrollRecord>)> = stream::iter(employees)
        .map(|employee| async move {
            let outcome = generate_payroll(ctx, employee.id, year, month, generated_by).await;
            (employee, outcome)
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let mut results = Vec::new();
    let mut errors = Vec::new();
    for (employee, outcome) in outcomes {
        match outcome {
            Ok(record) => results.push(record),
            Err(error) => {
                warn!(
                    run_id = %run_id,
                    employee_number = %employee.employee_number,
                    kind = ?error.kind(),
                    error = %error,
                    "Payroll generation failed"
                );
                errors.push(BatchFailure {
                    employee_id: employee.id,
                    employee_number: employee.employee_number,
                    reason: error.to_string(),
                    kind: error.kind(),
                });
            }
        }
    }
    results.sort_by(|a, b| a.employee.employee_number.cmp(&b.employee.employee_number));
    errors.sort_by(|a, b| a.employee_number.cmp(&b.employee_number));

    info!(
        run_id = %run_id,
        succeeded = results.len(),
        failed = errors.len(),
        "Payroll batch finished"
    );
    Ok(BatchSummary {
        run_id,
        success_count: results.len(),
        failure_count: errors.len(),
        results,
        errors,
    })
}

/// Generates one record when the request names an employee, otherwise a
/// batch over all active employees.
pub async fn generate(
    ctx: &PayrollContext<'_>,
    request: PayrollGenerationRequest,
) -> EngineResult<PayrollGeneration> {
    let generated_by = request
        .generated_by
        .as_deref()
        .unwrap_or(&ctx.policy.payroll.generated_by);

    match request.employee_id {
        Some(employee_id) => {
            generate_payroll(ctx, employee_id, request.year, request.month, generated_by)
                .await
                .map(PayrollGeneration::Single)
        }
        None => generate_payroll_batch(ctx, request.year, request.month, generated_by)
            .await
            .map(PayrollGeneration::Batch),
    }
}

/// Marks a record `PAID` and stamps the payment date with the current time.
///
/// Allowed from any status; paying an already paid record re-stamps the
/// date.
pub async fn mark_as_paid(ctx: &PayrollContext<'_>, id: Uuid) -> EngineResult<PayrollRecord> {
    let record = get_payroll(ctx, id).await?;
    let updated = ctx
        .payroll
        .update_payment_status(record.id, PaymentStatus::Paid, Some(Utc::now()))
        .await?;
    info!(payroll_id = %id, from = %record.status, "Marked payroll as paid");
    Ok(updated)
}

/// Moves a `DRAFT` record to `PENDING`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidStatusTransition`] from any other status.
pub async fn mark_as_pending(ctx: &PayrollContext<'_>, id: Uuid) -> EngineResult<PayrollRecord> {
    let record = get_payroll(ctx, id).await?;
    if record.status != PaymentStatus::Draft {
        return Err(EngineError::InvalidStatusTransition {
            id,
            from: record.status.to_string(),
            to: PaymentStatus::Pending.to_string(),
        });
    }
    let updated = ctx
        .payroll
        .update_payment_status(id, PaymentStatus::Pending, None)
        .await?;
    info!(payroll_id = %id, "Marked payroll as pending");
    Ok(updated)
}

/// Lists records matching the filter, newest period first and then by
/// employee number.
pub async fn list_payrolls(
    ctx: &PayrollContext<'_>,
    filter: &PayrollFilter,
) -> EngineResult<Vec<PayrollRecord>> {
    let mut records = ctx.payroll.list_payrolls(filter).await?;
    records.sort_by(|a, b| {
        b.year
            .cmp(&a.year)
            .then_with(|| b.month.cmp(&a.month))
            .then_with(|| a.employee.employee_number.cmp(&b.employee.employee_number))
    });
    Ok(records)
}

/// Fetches a record by id.
///
/// # Errors
///
/// Returns [`EngineError::PayrollNotFound`] if no record has the id.
pub async fn get_payroll(ctx: &PayrollContext<'_>, id: Uuid) -> EngineResult<PayrollRecord> {
    ctx.payroll
        .payroll_by_id(id)
        .await?
        .ok_or(EngineError::PayrollNotFound { id })
}
