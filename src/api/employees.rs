//! Employee directory endpoints: listing, search, and the paired
//! employee + compensation writes.
//!
//! Add and edit write the directory row and the CTC row inside one
//! transaction, so a failed half never leaves the two tables disagreeing.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{
    Compensation, CompensationResponse, DeleteEmployeeResponse, Employee, EmployeeListResponse,
    EmployeeResponse, EmployeeRole, EmployeeWithCompensation,
};
use crate::AppState;

use super::auth::{hash_password, require_role};
use super::error::{ApiError, ErrorCode, ValidationErrorBuilder};
use super::validation::{
    validate_amount, validate_date, validate_email, validate_name, validate_uuid,
};

/// Roles allowed to manage the directory
const DIRECTORY_ROLES: &[EmployeeRole] = &[EmployeeRole::Hr, EmployeeRole::Admin];

/// Full employee payload used by both add and edit. Every field is
/// optional at the deserialization layer so missing ones can be reported
/// by name instead of as an opaque 422.
#[derive(Debug, Default, Deserialize)]
pub struct EmployeePayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub position: Option<String>,
    pub joining_date: Option<String>,
    pub annual_ctc: Option<f64>,
    pub monthly_in_hand: Option<f64>,
    pub housing_allowance: Option<f64>,
    pub transport_allowance: Option<f64>,
    pub meal_allowance: Option<f64>,
    pub performance_bonus: Option<f64>,
    pub year_end_bonus: Option<f64>,
    pub tax_deduction: Option<f64>,
    /// Optional deduction components, default 0
    pub health_insurance: Option<f64>,
    pub provident_fund: Option<f64>,
    /// Required on edit, ignored on add (new hires always start as employee)
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

fn text_missing(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).map_or(true, str::is_empty)
}

/// Names of the required fields absent from the payload. The 14-field set
/// covers identity, position and every CTC component; edit adds `role`.
fn missing_fields(req: &EmployeePayload, require_role_field: bool) -> Vec<&'static str> {
    let mut missing = Vec::new();

    if text_missing(&req.first_name) {
        missing.push("first_name");
    }
    if text_missing(&req.last_name) {
        missing.push("last_name");
    }
    if text_missing(&req.email) {
        missing.push("email");
    }
    if text_missing(&req.password) {
        missing.push("password");
    }
    if text_missing(&req.position) {
        missing.push("position");
    }
    if text_missing(&req.joining_date) {
        missing.push("joining_date");
    }
    if req.annual_ctc.is_none() {
        missing.push("annual_ctc");
    }
    if req.monthly_in_hand.is_none() {
        missing.push("monthly_in_hand");
    }
    if req.housing_allowance.is_none() {
        missing.push("housing_allowance");
    }
    if req.transport_allowance.is_none() {
        missing.push("transport_allowance");
    }
    if req.meal_allowance.is_none() {
        missing.push("meal_allowance");
    }
    if req.performance_bonus.is_none() {
        missing.push("performance_bonus");
    }
    if req.year_end_bonus.is_none() {
        missing.push("year_end_bonus");
    }
    if req.tax_deduction.is_none() {
        missing.push("tax_deduction");
    }
    if require_role_field && text_missing(&req.role) {
        missing.push("role");
    }

    missing
}

/// Build the BadRequest naming every missing field
fn missing_fields_error(missing: &[&'static str]) -> ApiError {
    let mut errors = HashMap::new();
    for field in missing {
        errors.insert(
            field.to_string(),
            vec!["This field is required".to_string()],
        );
    }
    ApiError::new(
        ErrorCode::ValidationError,
        format!("Missing required fields: {}", missing.join(", ")),
    )
    .with_validation_errors(errors)
}

/// Format-level validation, run only once all required fields are present
fn validate_payload(req: &EmployeePayload, require_role_field: bool) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_name(req.first_name.as_deref().unwrap_or(""), "first_name") {
        errors.add("first_name", e);
    }
    if let Err(e) = validate_name(req.last_name.as_deref().unwrap_or(""), "last_name") {
        errors.add("last_name", e);
    }
    if let Err(e) = validate_email(req.email.as_deref().unwrap_or("")) {
        errors.add("email", e);
    }
    if let Err(e) = validate_name(req.position.as_deref().unwrap_or(""), "position") {
        errors.add("position", e);
    }
    if let Err(e) = validate_date(req.joining_date.as_deref().unwrap_or(""), "joining_date") {
        errors.add("joining_date", e);
    }

    let amounts = [
        ("annual_ctc", req.annual_ctc),
        ("monthly_in_hand", req.monthly_in_hand),
        ("housing_allowance", req.housing_allowance),
        ("transport_allowance", req.transport_allowance),
        ("meal_allowance", req.meal_allowance),
        ("performance_bonus", req.performance_bonus),
        ("year_end_bonus", req.year_end_bonus),
        ("tax_deduction", req.tax_deduction),
        ("health_insurance", req.health_insurance),
        ("provident_fund", req.provident_fund),
    ];
    for (field, value) in amounts {
        if let Some(v) = value {
            if let Err(e) = validate_amount(v, field) {
                errors.add(field, e);
            }
        }
    }

    if require_role_field {
        let role = req.role.as_deref().unwrap_or("");
        if role.parse::<EmployeeRole>().is_err() {
            errors.add("role", "Role must be one of: employee, hr, admin");
        }
    }

    errors.finish()
}

async fn fetch_compensation(
    pool: &sqlx::SqlitePool,
    employee_id: &str,
) -> Result<Option<Compensation>, ApiError> {
    let record: Option<Compensation> =
        sqlx::query_as("SELECT * FROM compensation WHERE employee_id = ?")
            .bind(employee_id)
            .fetch_optional(pool)
            .await?;
    Ok(record)
}

/// List the employee directory, best performers first
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
    principal: Employee,
) -> Result<Json<EmployeeListResponse>, ApiError> {
    require_role(&principal, DIRECTORY_ROLES)?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employees WHERE role = 'employee'")
        .fetch_one(&state.db)
        .await?;

    let employees = sqlx::query_as::<_, Employee>(
        "SELECT * FROM employees WHERE role = 'employee' ORDER BY total_performance DESC",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(EmployeeListResponse {
        total: total.0,
        employees: employees.into_iter().map(EmployeeResponse::from).collect(),
    }))
}

/// Get one employee with their current CTC record
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    principal: Employee,
    Path(id): Path<String>,
) -> Result<Json<EmployeeWithCompensation>, ApiError> {
    require_role(&principal, DIRECTORY_ROLES)?;

    if let Err(e) = validate_uuid(&id, "employee_id") {
        return Err(ApiError::validation_field("employee_id", e));
    }

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    let compensation = fetch_compensation(&state.db, &employee.id).await?;

    Ok(Json(EmployeeWithCompensation {
        employee: EmployeeResponse::from(employee),
        compensation: compensation.map(CompensationResponse::from),
    }))
}

/// Free-text search over first name, last name and email
pub async fn search_employees(
    State(state): State<Arc<AppState>>,
    principal: Employee,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<EmployeeResponse>>, ApiError> {
    require_role(&principal, DIRECTORY_ROLES)?;

    let query = params.q.as_deref().map(str::trim).unwrap_or("");
    if query.is_empty() {
        return Err(ApiError::bad_request("Search query is required"));
    }

    let pattern = format!(
        "%{}%",
        query
            .to_lowercase()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_")
    );

    let employees = sqlx::query_as::<_, Employee>(
        r#"
        SELECT * FROM employees
        WHERE role = 'employee'
          AND (LOWER(first_name) LIKE ? ESCAPE '\'
            OR LOWER(last_name) LIKE ? ESCAPE '\'
            OR LOWER(email) LIKE ? ESCAPE '\')
        ORDER BY total_performance DESC
        "#,
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(
        employees.into_iter().map(EmployeeResponse::from).collect(),
    ))
}

/// Add an employee and their initial CTC record in one transaction
pub async fn add_employee(
    State(state): State<Arc<AppState>>,
    principal: Employee,
    Json(req): Json<EmployeePayload>,
) -> Result<(StatusCode, Json<EmployeeWithCompensation>), ApiError> {
    require_role(&principal, DIRECTORY_ROLES)?;

    let missing = missing_fields(&req, false);
    if !missing.is_empty() {
        return Err(missing_fields_error(&missing));
    }
    validate_payload(&req, false)?;

    let password_hash = hash_password(req.password.as_deref().unwrap_or("")).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::internal("Failed to process credentials")
    })?;

    let employee_id = Uuid::new_v4().to_string();
    let compensation_id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let joining_date = req.joining_date.as_deref().unwrap_or("");

    let mut tx = state.db.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO employees
            (id, email, password_hash, first_name, last_name, position, joining_date, role, total_performance, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, 'employee', 0, ?, ?)
        "#,
    )
    .bind(&employee_id)
    .bind(req.email.as_deref().map(str::trim))
    .bind(&password_hash)
    .bind(req.first_name.as_deref().map(str::trim))
    .bind(req.last_name.as_deref().map(str::trim))
    .bind(req.position.as_deref().map(str::trim))
    .bind(joining_date)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            ApiError::conflict("An employee with this email already exists")
        } else {
            ApiError::from(e)
        }
    })?;

    sqlx::query(
        r#"
        INSERT INTO compensation
            (id, employee_id, effective_date, annual_ctc, monthly_in_hand,
             housing_allowance, transport_allowance, meal_allowance,
             performance_bonus, year_end_bonus,
             tax_deduction, health_insurance, provident_fund,
             created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&compensation_id)
    .bind(&employee_id)
    .bind(joining_date)
    .bind(req.annual_ctc)
    .bind(req.monthly_in_hand)
    .bind(req.housing_allowance)
    .bind(req.transport_allowance)
    .bind(req.meal_allowance)
    .bind(req.performance_bonus)
    .bind(req.year_end_bonus)
    .bind(req.tax_deduction)
    .bind(req.health_insurance.unwrap_or(0.0))
    .bind(req.provident_fund.unwrap_or(0.0))
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(&employee_id)
        .fetch_one(&state.db)
        .await?;
    let compensation = fetch_compensation(&state.db, &employee_id).await?;

    tracing::info!("Added employee {} ({})", employee_id, employee.email);

    Ok((
        StatusCode::CREATED,
        Json(EmployeeWithCompensation {
            employee: EmployeeResponse::from(employee),
            compensation: compensation.map(CompensationResponse::from),
        }),
    ))
}

/// Edit an employee's profile, role and CTC record in one transaction.
/// If the employee row does not exist the whole transaction rolls back,
/// so no orphaned CTC record is created.
pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    principal: Employee,
    Path(id): Path<String>,
    Json(req): Json<EmployeePayload>,
) -> Result<Json<EmployeeWithCompensation>, ApiError> {
    require_role(&principal, DIRECTORY_ROLES)?;

    if let Err(e) = validate_uuid(&id, "employee_id") {
        return Err(ApiError::validation_field("employee_id", e));
    }

    let missing = missing_fields(&req, true);
    if !missing.is_empty() {
        return Err(missing_fields_error(&missing));
    }
    validate_payload(&req, true)?;

    let password_hash = hash_password(req.password.as_deref().unwrap_or("")).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::internal("Failed to process credentials")
    })?;

    let now = chrono::Utc::now().to_rfc3339();
    let joining_date = req.joining_date.as_deref().unwrap_or("");
    let role = req
        .role
        .as_deref()
        .unwrap_or("")
        .parse::<EmployeeRole>()
        .map(|r| r.to_string())
        .unwrap_or_else(|_| "employee".to_string());

    let mut tx = state.db.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE employees SET
            email = ?,
            password_hash = ?,
            first_name = ?,
            last_name = ?,
            position = ?,
            joining_date = ?,
            role = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(req.email.as_deref().map(str::trim))
    .bind(&password_hash)
    .bind(req.first_name.as_deref().map(str::trim))
    .bind(req.last_name.as_deref().map(str::trim))
    .bind(req.position.as_deref().map(str::trim))
    .bind(joining_date)
    .bind(&role)
    .bind(&now)
    .bind(&id)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            ApiError::conflict("An employee with this email already exists")
        } else {
            ApiError::from(e)
        }
    })?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(ApiError::not_found("Employee not found"));
    }

    sqlx::query(
        r#"
        INSERT INTO compensation
            (id, employee_id, effective_date, annual_ctc, monthly_in_hand,
             housing_allowance, transport_allowance, meal_allowance,
             performance_bonus, year_end_bonus,
             tax_deduction, health_insurance, provident_fund,
             created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(employee_id) DO UPDATE SET
            effective_date = excluded.effective_date,
            annual_ctc = excluded.annual_ctc,
            monthly_in_hand = excluded.monthly_in_hand,
            housing_allowance = excluded.housing_allowance,
            transport_allowance = excluded.transport_allowance,
            meal_allowance = excluded.meal_allowance,
            performance_bonus = excluded.performance_bonus,
            year_end_bonus = excluded.year_end_bonus,
            tax_deduction = excluded.tax_deduction,
            health_insurance = excluded.health_insurance,
            provident_fund = excluded.provident_fund,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&id)
    .bind(joining_date)
    .bind(req.annual_ctc)
    .bind(req.monthly_in_hand)
    .bind(req.housing_allowance)
    .bind(req.transport_allowance)
    .bind(req.meal_allowance)
    .bind(req.performance_bonus)
    .bind(req.year_end_bonus)
    .bind(req.tax_deduction)
    .bind(req.health_insurance.unwrap_or(0.0))
    .bind(req.provident_fund.unwrap_or(0.0))
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;
    let compensation = fetch_compensation(&state.db, &id).await?;

    Ok(Json(EmployeeWithCompensation {
        employee: EmployeeResponse::from(employee),
        compensation: compensation.map(CompensationResponse::from),
    }))
}

/// Hard-delete an employee. Compensation, leave and attendance rows
/// referencing the employee are left in place.
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    principal: Employee,
    Path(id): Path<String>,
) -> Result<Json<DeleteEmployeeResponse>, ApiError> {
    require_role(&principal, DIRECTORY_ROLES)?;

    if let Err(e) = validate_uuid(&id, "employee_id") {
        return Err(ApiError::validation_field("employee_id", e));
    }

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))?;

    sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await?;

    tracing::info!("Deleted employee {} ({})", employee.id, employee.email);

    Ok(Json(DeleteEmployeeResponse {
        message: format!(
            "Employee {} {} deleted successfully",
            employee.first_name, employee.last_name
        ),
    }))
}
