//! Employee model and identity snapshots.
//!
//! This module defines the [`Employee`] compensation profile consumed by
//! payroll and the [`EmployeeSnapshot`] embedded into generated records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents an employee and their compensation profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: Uuid,
    /// The employee number, also used as the device-side punch code.
    pub employee_number: String,
    /// The employee's full name.
    pub full_name: String,
    /// Base monthly salary.
    pub base_salary: Decimal,
    /// Whether the employee is currently employed.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Employee {
    /// Returns the identity fields embedded into payroll records and views.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_payroll::models::Employee;
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let employee = Employee {
    ///     id: Uuid::new_v4(),
    ///     employee_number: "E001".to_string(),
    ///     full_name: "Asha Rao".to_string(),
    ///     base_salary: Decimal::new(22000, 0),
    ///     is_active: true,
    /// };
    /// assert_eq!(employee.snapshot().employee_number, "E001");
    /// ```
    pub fn snapshot(&self) -> EmployeeSnapshot {
        EmployeeSnapshot {
            id: self.id,
            employee_number: self.employee_number.clone(),
            full_name: self.full_name.clone(),
        }
    }
}

/// Minimal employee identity copied into records at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSnapshot {
    /// Unique identifier for the employee.
    pub id: Uuid,
    /// The employee number.
    pub employee_number: String,
    /// The employee's full name.
    pub full_name: String,
}
