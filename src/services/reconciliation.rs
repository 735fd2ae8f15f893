//! Biometric reconciliation.
//!
//! Turns raw punch entries into one attendance record per employee-day.
//! Entries are grouped by (employee code, date); each group is resolved,
//! logged, classified and upserted independently, so one bad group never
//! aborts the rest of the run. Re-running over the same punches rewrites the
//! same records.

use std::collections::{BTreeMap, HashMap};

use chrono::{Local, NaiveDate, NaiveTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{DayContext, classify_day, is_weekend};
use crate::error::EngineResult;
use crate::models::{AttendanceRecord, AttendanceStatus, EmployeeSnapshot, PunchLog, RawPunchEntry};

use super::ReconcileContext;

/// A failed employee-day group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationError {
    /// Device-side employee code of the group.
    pub employee_code: String,
    /// Date of the group.
    pub date: NaiveDate,
    /// Why the group failed.
    pub message: String,
}

/// Outcome counts of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    /// Correlation id of the run, also attached to its log lines.
    pub run_id: Uuid,
    /// Employee-days written to attendance.
    pub processed: usize,
    /// Employee-days whose code matched no employee.
    pub skipped: usize,
    /// Failed employee-days, ordered by (employee code, date).
    pub errors: Vec<ReconciliationError>,
}

impl ReconciliationSummary {
    fn empty(run_id: Uuid) -> Self {
        Self {
            run_id,
            processed: 0,
            skipped: 0,
            errors: Vec::new(),
        }
    }
}

/// An unprocessed punch log joined with its employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnprocessedPunch {
    /// The punch log.
    pub log: PunchLog,
    /// The employee the log was resolved to.
    pub employee: EmployeeSnapshot,
}

/// One row of a bulk attendance import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceImportRow {
    /// Employee number.
    pub employee_code: String,
    /// Calendar date.
    pub date: NaiveDate,
    /// Status name or short code (`P`, `A`, `HD`, `CL`, `WO`, `H`).
    pub status: String,
    /// First in-punch, if known.
    #[serde(default)]
    pub first_in: Option<NaiveTime>,
    /// Last out-punch, if known.
    #[serde(default)]
    pub last_out: Option<NaiveTime>,
}

/// A rejected import row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportError {
    /// One-based position of the row in the input.
    pub row: usize,
    /// Employee number of the row.
    pub employee_code: String,
    /// Date of the row.
    pub date: NaiveDate,
    /// Why the row was rejected.
    pub message: String,
}

/// Outcome counts of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Rows written to attendance.
    pub imported: usize,
    /// Rows whose employee code matched no employee.
    pub skipped: usize,
    /// Rejected rows.
    pub errors: Vec<ImportError>,
}

#[derive(Debug)]
struct DayGroup {
    employee_code: String,
    date: NaiveDate,
    // Set when the group was rebuilt from stored logs.
    employee_id: Option<Uuid>,
    entries: Vec<RawPunchEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupOutcome {
    Processed,
    Skipped,
}

/// Returns the day before `today`.
///
/// ```
/// use attendance_payroll::services::yesterday;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
/// assert_eq!(yesterday(today), NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
/// ```
pub fn yesterday(today: NaiveDate) -> NaiveDate {
    today.pred_opt().unwrap_or(today)
}

/// Reconciles a batch of raw punch entries.
///
/// Every entry of a resolved employee is persisted as an unprocessed punch
/// log before its group is classified, and marked processed once the
/// attendance record is written.
pub async fn reconcile_entries(
    ctx: &ReconcileContext<'_>,
    entries: Vec<RawPunchEntry>,
) -> ReconciliationSummary {
    let mut grouped: BTreeMap<(String, NaiveDate), Vec<RawPunchEntry>> = BTreeMap::new();
    for entry in entries {
        grouped
            .entry((entry.employee_code.clone(), entry.date))
            .or_default()
            .push(entry);
    }

    let groups = grouped
        .into_iter()
        .map(|((employee_code, date), entries)| DayGroup {
            employee_code,
            date,
            employee_id: None,
            entries,
        })
        .collect();

    run_groups(ctx, groups, true).await
}

/// Reconciles the stored unprocessed punch logs of one date.
///
/// `None` means yesterday in local time. The logs already exist, so they
/// are classified and marked processed without being persisted again. A
/// date with no unprocessed logs yields an empty summary.
pub async fn reconcile_date(
    ctx: &ReconcileContext<'_>,
    date: Option<NaiveDate>,
) -> EngineResult<ReconciliationSummary> {
    let date = date.unwrap_or_else(|| yesterday(Local::now().date_naive()));
    let logs = ctx.attendance.unprocessed_punch_logs(Some(date)).await?;

    if logs.is_empty() {
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, date = %date, "No unprocessed punch logs");
        return Ok(ReconciliationSummary::empty(run_id));
    }

    let mut grouped: BTreeMap<(Uuid, NaiveDate), Vec<RawPunchEntry>> = BTreeMap::new();
    for log in logs {
        grouped
            .entry((log.employee_id, log.entry.date))
            .or_default()
            .push(log.entry);
    }

    let groups = grouped
        .into_iter()
        .filter_map(|((employee_id, date), entries)| {
            let employee_code = entries.first()?.employee_code.clone();
            Some(DayGroup {
                employee_code,
                date,
                employee_id: Some(employee_id),
                entries,
            })
        })
        .collect();

    Ok(run_groups(ctx, groups, false).await)
}

async fn run_groups(
    ctx: &ReconcileContext<'_>,
    groups: Vec<DayGroup>,
    persist_logs: bool,
) -> ReconciliationSummary {
    let run_id = Uuid::new_v4();
    let concurrency = ctx.policy.reconciliation.max_concurrency.max(1);
    info!(
        run_id = %run_id,
        groups = groups.len(),
        concurrency,
        "Starting reconciliation run"
    );

    let outcomes: Vec<(String, NaiveDate, EngineResult<GroupOutcome>)> = stream::iter(groups)
        .map(|group| async move {
            let employee_code = group.employee_code.clone();
            let date = group.date;
            let outcome = reconcile_group(ctx, run_id, group, persist_logs).await;
            (employee_code, date, outcome)
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let mut summary = ReconciliationSummary::empty(run_id);
    for (employee_code, date, outcome) in outcomes {
        match outcome {
            Ok(GroupOutcome::Processed) => summary.processed += 1,
            Ok(GroupOutcome::Skipped) => summary.skipped += 1,
            Err(error) => {
                warn!(
                    run_id = %run_id,
                    employee_code = %employee_code,
                    date = %date,
                    error = %error,
                    "Failed to reconcile employee-day"
                );
                summary.errors.push(ReconciliationError {
                    employee_code,
                    date,
                    message: error.to_string(),
                });
            }
        }
    }
    summary.errors.sort_by(|a, b| {
        a.employee_code
            .cmp(&b.employee_code)
            .then_with(|| a.date.cmp(&b.date))
    });

    info!(
        run_id = %run_id,
        processed = summary.processed,
        skipped = summary.skipped,
        failed = summary.errors.len(),
        "Reconciliation run finished"
    );
    summary
}

async fn reconcile_group(
    ctx: &ReconcileContext<'_>,
    run_id: Uuid,
    group: DayGroup,
    persist_logs: bool,
) -> EngineResult<GroupOutcome> {
    let employee = match group.employee_id {
        Some(employee_id) => ctx.employees.find_by_id(employee_id).await?,
        None => ctx.employees.find_by_code(&group.employee_code).await?,
    };
    let Some(employee) = employee else {
        warn!(
            run_id = %run_id,
            employee_code = %group.employee_code,
            date = %group.date,
            "Employee not found; skipping punches"
        );
        return Ok(GroupOutcome::Skipped);
    };

    if persist_logs {
        for entry in &group.entries {
            ctx.attendance
                .insert_punch_log(PunchLog::unprocessed(employee.id, entry.clone()))
                .await?;
        }
    }

    let context = DayContext {
        is_weekend: is_weekend(group.date),
        is_holiday: ctx.calendar.is_holiday(group.date).await?,
        has_approved_leave: ctx
            .calendar
            .has_approved_leave(employee.id, group.date)
            .await?,
    };
    let classification = classify_day(
        &group.employee_code,
        group.date,
        &group.entries,
        context,
        &ctx.policy.thresholds,
    )?;

    let record = AttendanceRecord {
        id: Uuid::new_v4(),
        employee_id: employee.id,
        date: group.date,
        status: classification.status,
        first_in: classification.first_in,
        last_out: classification.last_out,
        total_duration_minutes: classification.total_duration_minutes,
        synced: true,
        updated_at: Utc::now(),
    };
    let upsert = ctx.attendance.upsert_attendance(record).await?;
    let marked = ctx
        .attendance
        .mark_punch_logs_processed(employee.id, group.date)
        .await?;

    debug!(
        run_id = %run_id,
        employee_code = %group.employee_code,
        date = %group.date,
        status = %classification.status,
        rule = %classification.audit_step.rule_id,
        upsert = ?upsert,
        marked,
        "Reconciled employee-day"
    );
    Ok(GroupOutcome::Processed)
}

/// Lists unprocessed punch logs with their employee, ordered by date and
/// then employee number. Logs whose employee no longer exists are left out.
pub async fn list_unprocessed_punches(
    ctx: &ReconcileContext<'_>,
) -> EngineResult<Vec<UnprocessedPunch>> {
    let logs = ctx.attendance.unprocessed_punch_logs(None).await?;

    let mut snapshots: HashMap<Uuid, Option<EmployeeSnapshot>> = HashMap::new();
    let mut rows = Vec::with_capacity(logs.len());
    for log in logs {
        if !snapshots.contains_key(&log.employee_id) {
            let snapshot = ctx
                .employees
                .find_by_id(log.employee_id)
                .await?
                .map(|employee| employee.snapshot());
            snapshots.insert(log.employee_id, snapshot);
        }
        if let Some(Some(employee)) = snapshots.get(&log.employee_id) {
            rows.push(UnprocessedPunch {
                employee: employee.clone(),
                log,
            });
        }
    }

    rows.sort_by(|a, b| {
        a.log
            .entry
            .date
            .cmp(&b.log.entry.date)
            .then_with(|| a.employee.employee_number.cmp(&b.employee.employee_number))
            .then_with(|| a.log.entry.in_time.cmp(&b.log.entry.in_time))
    });
    Ok(rows)
}

/// Upserts externally prepared attendance rows.
///
/// Imported records are marked `synced = false`. Rows for unknown employees
/// are skipped and rows with an unrecognised status are rejected; the rest
/// of the batch is still imported.
pub async fn import_attendance(
    ctx: &ReconcileContext<'_>,
    rows: Vec<AttendanceImportRow>,
) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for (index, row) in rows.iter().enumerate() {
        match import_row(ctx, row).await {
            Ok(GroupOutcome::Processed) => summary.imported += 1,
            Ok(GroupOutcome::Skipped) => {
                warn!(
                    employee_code = %row.employee_code,
                    date = %row.date,
                    "Employee not found; skipping import row"
                );
                summary.skipped += 1;
            }
            Err(error) => {
                warn!(
                    row = index + 1,
                    employee_code = %row.employee_code,
                    date = %row.date,
                    error = %error,
                    "Rejected import row"
                );
                summary.errors.push(ImportError {
                    row: index + 1,
                    employee_code: row.employee_code.clone(),
                    date: row.date,
                    message: error.to_string(),
                });
            }
        }
    }

    info!(
        imported = summary.imported,
        skipped = summary.skipped,
        failed = summary.errors.len(),
        "Attendance import finished"
    );
    summary
}

async fn import_row(
    ctx: &ReconcileContext<'_>,
    row: &AttendanceImportRow,
) -> EngineResult<GroupOutcome> {
    let Some(employee) = ctx.employees.find_by_code(&row.employee_code).await? else {
        return Ok(GroupOutcome::Skipped);
    };
    let status: AttendanceStatus = row.status.parse()?;

    let total_duration_minutes = match (row.first_in, row.last_out) {
        (Some(first_in), Some(last_out)) => (last_out - first_in).num_minutes().max(0),
        _ => 0,
    };

    ctx.attendance
        .upsert_attendance(AttendanceRecord {
            id: Uuid::new_v4(),
            employee_id: employee.id,
            date: row.date,
            status,
            first_in: row.first_in,
            last_out: row.last_out,
            total_duration_minutes,
            synced: false,
            updated_at: Utc::now(),
        })
        .await?;
    Ok(GroupOutcome::Processed)
}
