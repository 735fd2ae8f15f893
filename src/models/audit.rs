//! Audit steps recorded by classification and payroll decisions.

use serde::{Deserialize, Serialize};

/// One recorded decision: which rule fired, on what, and with what result.
///
/// The classifier emits one step per employee-day; salary proration emits
/// the tally step followed by the proration step.
///
/// # Example
///
/// ```
/// use attendance_payroll::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "attendance_holiday".to_string(),
///     rule_name: "Attendance Classification".to_string(),
///     input: serde_json::json!({"date": "2026-01-26", "is_holiday": true}),
///     output: serde_json::json!({"status": "HOLIDAY"}),
///     reasoning: "2026-01-26 is a declared holiday".to_string(),
/// };
/// assert_eq!(step.rule_id, "attendance_holiday");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// Position of the step within its trail, starting at 1.
    pub step_number: u32,
    /// Machine-readable rule key, e.g. `attendance_weekend`.
    pub rule_id: String,
    /// Display name of the rule.
    pub rule_name: String,
    /// Facts the rule looked at.
    pub input: serde_json::Value,
    /// What the rule produced.
    pub output: serde_json::Value,
    /// Why the rule fired.
    pub reasoning: String,
}
