//! Attendance entries and reporting-period resolution.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Single worked-hours entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceEntry {
    pub id: String,
    pub employee_id: String,
    pub date: String,
    pub hours: f64,
    pub created_at: String,
}

/// Reporting period for attendance aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    /// Resolve the period tag from a query parameter. Tags are
    /// case-sensitive; anything unrecognized (or absent) means today.
    pub fn from_param(param: Option<&str>) -> Period {
        match param {
            Some("weekly") => Period::Weekly,
            Some("monthly") => Period::Monthly,
            Some("yearly") => Period::Yearly,
            _ => Period::Today,
        }
    }

    /// First calendar day of the reporting window containing `today`.
    /// Weeks start on Sunday.
    pub fn window_start(&self, today: NaiveDate) -> NaiveDate {
        match self {
            Period::Today => today,
            Period::Weekly => {
                today - Duration::days(today.weekday().num_days_from_sunday() as i64)
            }
            Period::Monthly => today.with_day(1).unwrap_or(today),
            Period::Yearly => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
        }
    }

    /// Expected working hours for the period, assuming an 8-hour day.
    pub fn expected_hours(&self) -> f64 {
        match self {
            Period::Today => 8.0,
            Period::Weekly => 40.0,
            Period::Monthly => 160.0,
            Period::Yearly => 1920.0,
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Today => write!(f, "today"),
            Period::Weekly => write!(f, "weekly"),
            Period::Monthly => write!(f, "monthly"),
            Period::Yearly => write!(f, "yearly"),
        }
    }
}

/// Aggregated attendance report for one employee over a window
#[derive(Debug, Serialize)]
pub struct AttendanceReport {
    pub employee_id: String,
    pub period: Period,
    pub start_date: String,
    pub end_date: String,
    pub entries: Vec<AttendanceEntry>,
    pub worked_hours: f64,
    pub total_working_hours: f64,
}

/// Request to log a worked-hours entry
#[derive(Debug, Deserialize)]
pub struct RecordAttendanceRequest {
    pub date: Option<String>,
    pub hours: Option<f64>,
}
