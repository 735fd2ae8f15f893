//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the attendance
//! policy and holiday calendars from YAML files.

use chrono::{Datelike, NaiveDate};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::Holiday;

use super::types::{AttendancePolicy, EngineConfig, HolidayCalendarFile};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── policy.yaml          # Thresholds, rounding, concurrency
/// └── holidays/
///     └── 2026.yaml        # Holidays declared for 2026
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_payroll::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let date = NaiveDate::from_ymd_opt(2026, 1, 26).unwrap();
/// println!("Holiday? {}", loader.is_holiday(date));
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `policy.yaml` or the `holidays` directory is
    /// missing, if any file contains invalid YAML, or if the policy values
    /// are inconsistent.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy_path = path.join("policy.yaml");
        let policy = Self::load_yaml::<AttendancePolicy>(&policy_path)?;
        Self::validate_policy(&policy, &policy_path.display().to_string())?;

        let holidays_dir = path.join("holidays");
        let holidays = Self::load_holidays(&holidays_dir)?;

        debug!(
            path = %path.display(),
            holidays = holidays.len(),
            "Loaded engine configuration"
        );

        Ok(Self {
            config: EngineConfig::new(policy, holidays),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_policy(policy: &AttendancePolicy, path: &str) -> EngineResult<()> {
        let thresholds = &policy.thresholds;
        let problem = if thresholds.half_day_hours <= rust_decimal::Decimal::ZERO {
            Some("half_day_hours must be positive")
        } else if thresholds.present_hours < thresholds.half_day_hours {
            Some("present_hours must not be below half_day_hours")
        } else if policy.reconciliation.max_concurrency == 0 || policy.payroll.max_concurrency == 0
        {
            Some("max_concurrency must be at least 1")
        } else {
            None
        };

        match problem {
            Some(message) => Err(EngineError::ConfigParseError {
                path: path.to_string(),
                message: message.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Loads all holiday calendar files from the holidays directory.
    fn load_holidays(holidays_dir: &Path) -> EngineResult<Vec<Holiday>> {
        let dir_str = holidays_dir.display().to_string();

        let entries = fs::read_dir(holidays_dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut holidays = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let calendar = Self::load_yaml::<HolidayCalendarFile>(&path)?;
                if let Some(stray) = calendar.holidays.iter().find(|h| h.date.year() != calendar.year)
                {
                    return Err(EngineError::ConfigParseError {
                        path: path.display().to_string(),
                        message: format!(
                            "holiday '{}' on {} is outside calendar year {}",
                            stray.name, stray.date, calendar.year
                        ),
                    });
                }
                holidays.extend(calendar.holidays);
            }
        }

        Ok(holidays)
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the attendance and payroll policy.
    pub fn policy(&self) -> &AttendancePolicy {
        self.config.policy()
    }

    /// Returns all configured holidays.
    pub fn holidays(&self) -> &[Holiday] {
        self.config.holidays()
    }

    /// Returns true if the date is a configured holiday.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.config.holidays().iter().any(|h| h.date == date)
    }
}
