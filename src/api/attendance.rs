//! Attendance endpoints: logging worked hours and the aggregated
//! period report.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{
    AttendanceEntry, AttendanceReport, Employee, EmployeeRole, Period, RecordAttendanceRequest,
};
use crate::AppState;

use super::auth::require_role;
use super::error::ApiError;
use super::validation::{validate_date, validate_hours, validate_uuid};

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub period: Option<String>,
}

/// Log a worked-hours entry for the authenticated employee.
/// The date defaults to the local calendar day; multiple entries on one
/// date are allowed and all count toward the report.
pub async fn record_attendance(
    State(state): State<Arc<AppState>>,
    principal: Employee,
    Json(req): Json<RecordAttendanceRequest>,
) -> Result<(StatusCode, Json<AttendanceEntry>), ApiError> {
    let hours = req
        .hours
        .ok_or_else(|| ApiError::validation_field("hours", "This field is required"))?;
    if let Err(e) = validate_hours(hours) {
        return Err(ApiError::validation_field("hours", e));
    }

    let date = match req.date.as_deref() {
        Some(d) => {
            if let Err(e) = validate_date(d, "date") {
                return Err(ApiError::validation_field("date", e));
            }
            d.to_string()
        }
        None => chrono::Local::now().date_naive().to_string(),
    };

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO attendance (id, employee_id, date, hours, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&principal.id)
    .bind(&date)
    .bind(hours)
    .bind(&now)
    .execute(&state.db)
    .await?;

    let entry = sqlx::query_as::<_, AttendanceEntry>("SELECT * FROM attendance WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Aggregated attendance report for one employee.
///
/// Employees may query their own report; anyone else's requires the hr
/// or admin role. An unrecognized period tag falls back to today.
pub async fn attendance_report(
    State(state): State<Arc<AppState>>,
    principal: Employee,
    Path(employee_id): Path<String>,
    Query(params): Query<ReportQuery>,
) -> Result<Json<AttendanceReport>, ApiError> {
    if let Err(e) = validate_uuid(&employee_id, "employee_id") {
        return Err(ApiError::validation_field("employee_id", e));
    }

    if principal.id != employee_id {
        require_role(&principal, &[EmployeeRole::Hr, EmployeeRole::Admin])?;
    }

    // Windows are anchored on the server's local calendar day, matching
    // the default used when recording entries
    let period = Period::from_param(params.period.as_deref());
    let today = chrono::Local::now().date_naive();
    let start = period.window_start(today);

    let entries = sqlx::query_as::<_, AttendanceEntry>(
        "SELECT * FROM attendance WHERE employee_id = ? AND date >= ? AND date <= ? ORDER BY date",
    )
    .bind(&employee_id)
    .bind(start.to_string())
    .bind(today.to_string())
    .fetch_all(&state.db)
    .await?;

    let worked_hours = entries.iter().map(|e| e.hours).sum();

    Ok(Json(AttendanceReport {
        employee_id,
        period,
        start_date: start.to_string(),
        end_date: today.to_string(),
        entries,
        worked_hours,
        total_working_hours: period.expected_hours(),
    }))
}
