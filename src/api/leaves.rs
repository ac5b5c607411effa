//! Leave application endpoints: filing, review queue, and the
//! approve/reject decision.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{
    Employee, EmployeeRole, LeaveApplication, LeaveApplicationWithEmployee, LeaveStatus,
    SubmitLeaveRequest, UpdateLeaveStatusRequest,
};
use crate::AppState;

use super::auth::require_role;
use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_date, validate_uuid};

const REVIEW_ROLES: &[EmployeeRole] = &[EmployeeRole::Hr, EmployeeRole::Admin];

/// File a new leave application for the authenticated employee
pub async fn submit_leave(
    State(state): State<Arc<AppState>>,
    principal: Employee,
    Json(req): Json<SubmitLeaveRequest>,
) -> Result<(StatusCode, Json<LeaveApplication>), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    let start_date = req.start_date.as_deref().unwrap_or("");
    let end_date = req.end_date.as_deref().unwrap_or("");
    let leave_type = req.leave_type.as_deref().map(str::trim).unwrap_or("");

    if let Err(e) = validate_date(start_date, "start_date") {
        errors.add("start_date", e);
    }
    if let Err(e) = validate_date(end_date, "end_date") {
        errors.add("end_date", e);
    }
    if leave_type.is_empty() {
        errors.add("leave_type", "leave_type is required");
    }
    errors.finish()?;

    // Dates are validated YYYY-MM-DD, so string order is calendar order
    if end_date < start_date {
        return Err(ApiError::validation_field(
            "end_date",
            "end_date cannot be before start_date",
        ));
    }

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO leave_applications
            (id, employee_id, start_date, end_date, leave_type, reason, status, hr_comments, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, 'Pending', '', ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&principal.id)
    .bind(start_date)
    .bind(end_date)
    .bind(leave_type)
    .bind(req.reason.as_deref())
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await?;

    let application =
        sqlx::query_as::<_, LeaveApplication>("SELECT * FROM leave_applications WHERE id = ?")
            .bind(&id)
            .fetch_one(&state.db)
            .await?;

    tracing::info!("Leave application {} filed by {}", id, principal.id);

    Ok((StatusCode::CREATED, Json(application)))
}

/// Review queue: every application with the requester's profile joined in,
/// newest first. Employee fields come back null for applications whose
/// employee row has since been deleted.
pub async fn list_leaves(
    State(state): State<Arc<AppState>>,
    principal: Employee,
) -> Result<Json<Vec<LeaveApplicationWithEmployee>>, ApiError> {
    require_role(&principal, REVIEW_ROLES)?;

    let applications = sqlx::query_as::<_, LeaveApplicationWithEmployee>(
        r#"
        SELECT
            l.id, l.employee_id, l.start_date, l.end_date, l.leave_type,
            l.reason, l.status, l.hr_comments, l.created_at, l.updated_at,
            e.first_name AS employee_first_name,
            e.last_name AS employee_last_name,
            e.email AS employee_email,
            e.position AS employee_position
        FROM leave_applications l
        LEFT JOIN employees e ON e.id = l.employee_id
        ORDER BY l.created_at DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(applications))
}

/// Record the review decision on an application.
///
/// Only "Approved" and "Rejected" are accepted, matching the stored
/// capitalization exactly. Re-reviewing an already decided application is
/// allowed and simply overwrites the decision and comments.
pub async fn update_leave_status(
    State(state): State<Arc<AppState>>,
    principal: Employee,
    Path(id): Path<String>,
    Json(req): Json<UpdateLeaveStatusRequest>,
) -> Result<Json<LeaveApplication>, ApiError> {
    require_role(&principal, REVIEW_ROLES)?;

    if let Err(e) = validate_uuid(&id, "leave_id") {
        return Err(ApiError::validation_field("leave_id", e));
    }

    let status = req
        .status
        .as_deref()
        .and_then(LeaveStatus::parse_review)
        .ok_or_else(|| ApiError::bad_request("Status must be 'Approved' or 'Rejected'"))?;

    let hr_comments = req.hr_comments.as_deref().unwrap_or("");
    let now = chrono::Utc::now().to_rfc3339();

    let result = sqlx::query(
        "UPDATE leave_applications SET status = ?, hr_comments = ?, updated_at = ? WHERE id = ?",
    )
    .bind(status.to_string())
    .bind(hr_comments)
    .bind(&now)
    .bind(&id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Leave application not found"));
    }

    let application =
        sqlx::query_as::<_, LeaveApplication>("SELECT * FROM leave_applications WHERE id = ?")
            .bind(&id)
            .fetch_one(&state.db)
            .await?;

    tracing::info!("Leave application {} marked {} by {}", id, status, principal.id);

    Ok(Json(application))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::test_pool;

    async fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(Config::default(), test_pool().await))
    }

    fn principal(role: &str) -> Employee {
        Employee {
            id: Uuid::new_v4().to_string(),
            email: format!("{}@example.com", role),
            password_hash: String::new(),
            first_name: "Test".to_string(),
            last_name: "Principal".to_string(),
            position: "Tester".to_string(),
            joining_date: "2024-01-01".to_string(),
            role: role.to_string(),
            total_performance: 0.0,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    async fn insert_employee(pool: &sqlx::SqlitePool, employee: &Employee) {
        sqlx::query(
            r#"
            INSERT INTO employees (id, email, password_hash, first_name, last_name, position, joining_date, role)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&employee.id)
        .bind(&employee.email)
        .bind(&employee.password_hash)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.position)
        .bind(&employee.joining_date)
        .bind(&employee.role)
        .execute(pool)
        .await
        .unwrap();
    }

    fn valid_request() -> SubmitLeaveRequest {
        SubmitLeaveRequest {
            start_date: Some("2025-07-01".to_string()),
            end_date: Some("2025-07-05".to_string()),
            leave_type: Some("Annual".to_string()),
            reason: Some("Family trip".to_string()),
        }
    }

    #[tokio::test]
    async fn test_submit_creates_pending_application() {
        let state = test_state().await;
        let staff = principal("employee");
        insert_employee(&state.db, &staff).await;

        let (status, created) = submit_leave(State(state), staff.clone(), Json(valid_request()))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.0.employee_id, staff.id);
        assert_eq!(created.0.status, "Pending");
        assert_eq!(created.0.hr_comments, "");
        assert_eq!(created.0.leave_type, "Annual");
    }

    #[tokio::test]
    async fn test_submit_rejects_inverted_range_and_bad_dates() {
        let state = test_state().await;
        let staff = principal("employee");

        let mut req = valid_request();
        req.end_date = Some("2025-06-30".to_string());
        let err = submit_leave(State(state.clone()), staff.clone(), Json(req))
            .await
            .err()
            .expect("inverted range should fail");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let mut req = valid_request();
        req.start_date = Some("01/07/2025".to_string());
        let err = submit_leave(State(state), staff, Json(req))
            .await
            .err()
            .expect("non-ISO date should fail");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_forbidden_for_employee_role() {
        let state = test_state().await;
        let err = list_leaves(State(state), principal("employee"))
            .await
            .err()
            .expect("should be forbidden");
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_list_joins_employee_profile() {
        let state = test_state().await;
        let staff = principal("employee");
        insert_employee(&state.db, &staff).await;
        submit_leave(State(state.clone()), staff.clone(), Json(valid_request()))
            .await
            .unwrap();

        let listing = list_leaves(State(state), principal("hr")).await.unwrap();
        assert_eq!(listing.0.len(), 1);
        let row = &listing.0[0];
        assert_eq!(row.employee_first_name.as_deref(), Some("Test"));
        assert_eq!(row.employee_email.as_deref(), Some(staff.email.as_str()));
    }

    #[tokio::test]
    async fn test_list_keeps_applications_of_deleted_employees() {
        let state = test_state().await;
        let staff = principal("employee");
        insert_employee(&state.db, &staff).await;
        submit_leave(State(state.clone()), staff.clone(), Json(valid_request()))
            .await
            .unwrap();

        sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(&staff.id)
            .execute(&state.db)
            .await
            .unwrap();

        let listing = list_leaves(State(state), principal("admin")).await.unwrap();
        assert_eq!(listing.0.len(), 1);
        assert!(listing.0[0].employee_first_name.is_none());
        assert_eq!(listing.0[0].employee_id, staff.id);
    }

    #[tokio::test]
    async fn test_review_approves_and_records_comments() {
        let state = test_state().await;
        let staff = principal("employee");
        insert_employee(&state.db, &staff).await;
        let (_, created) = submit_leave(State(state.clone()), staff, Json(valid_request()))
            .await
            .unwrap();

        let reviewed = update_leave_status(
            State(state),
            principal("hr"),
            Path(created.0.id.clone()),
            Json(UpdateLeaveStatusRequest {
                status: Some("Approved".to_string()),
                hr_comments: Some("Enjoy the break".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(reviewed.0.status, "Approved");
        assert_eq!(reviewed.0.hr_comments, "Enjoy the break");
    }

    #[tokio::test]
    async fn test_review_rejects_lowercase_and_pending_statuses() {
        let state = test_state().await;
        let staff = principal("employee");
        insert_employee(&state.db, &staff).await;
        let (_, created) = submit_leave(State(state.clone()), staff, Json(valid_request()))
            .await
            .unwrap();

        for bad in ["approved", "REJECTED", "Pending", ""] {
            let err = update_leave_status(
                State(state.clone()),
                principal("hr"),
                Path(created.0.id.clone()),
                Json(UpdateLeaveStatusRequest {
                    status: Some(bad.to_string()),
                    hr_comments: None,
                }),
            )
            .await
            .err()
            .expect("invalid status should fail");
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }

        let err = update_leave_status(
            State(state),
            principal("hr"),
            Path(created.0.id),
            Json(UpdateLeaveStatusRequest {
                status: None,
                hr_comments: None,
            }),
        )
        .await
        .err()
        .expect("missing status should fail");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_review_overwrites_prior_decision() {
        let state = test_state().await;
        let staff = principal("employee");
        insert_employee(&state.db, &staff).await;
        let (_, created) = submit_leave(State(state.clone()), staff, Json(valid_request()))
            .await
            .unwrap();

        update_leave_status(
            State(state.clone()),
            principal("hr"),
            Path(created.0.id.clone()),
            Json(UpdateLeaveStatusRequest {
                status: Some("Approved".to_string()),
                hr_comments: None,
            }),
        )
        .await
        .unwrap();

        let reversed = update_leave_status(
            State(state),
            principal("admin"),
            Path(created.0.id),
            Json(UpdateLeaveStatusRequest {
                status: Some("Rejected".to_string()),
                hr_comments: Some("Coverage conflict".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(reversed.0.status, "Rejected");
        assert_eq!(reversed.0.hr_comments, "Coverage conflict");
    }

    #[tokio::test]
    async fn test_review_unknown_id_is_not_found() {
        let state = test_state().await;
        let err = update_leave_status(
            State(state),
            principal("hr"),
            Path(Uuid::new_v4().to_string()),
            Json(UpdateLeaveStatusRequest {
                status: Some("Approved".to_string()),
                hr_comments: None,
            }),
        )
        .await
        .err()
        .expect("unknown application should be not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_review_forbidden_for_employee_role() {
        let state = test_state().await;
        let err = update_leave_status(
            State(state),
            principal("employee"),
            Path(Uuid::new_v4().to_string()),
            Json(UpdateLeaveStatusRequest {
                status: Some("Approved".to_string()),
                hr_comments: None,
            }),
        )
        .await
        .err()
        .expect("should be forbidden");
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
