//! Session authentication and the role-gate applied by every protected
//! operation.
//!
//! The principal is the `Employee` row behind the bearer token. Handlers
//! receive it through the extractor below and gate themselves with
//! [`require_role`], the single authorization decision point.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, Request, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use super::error::ApiError;
use crate::db::{Employee, EmployeeResponse, EmployeeRole, LoginRequest, LoginResponse, Session};
use crate::AppState;

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Generate a random session token
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Hash a token for storage
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Require that the principal holds one of the allowed roles.
///
/// Called at the top of every protected operation body, before any store
/// access, so a denied request never mutates anything.
pub fn require_role(principal: &Employee, allowed: &[EmployeeRole]) -> Result<(), ApiError> {
    let role = principal.role_enum();
    if allowed.contains(&role) {
        Ok(())
    } else {
        let roles = allowed
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(" or ");
        Err(ApiError::forbidden(format!(
            "This action requires the {} role",
            roles
        )))
    }
}

/// Login endpoint
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let employee: Option<Employee> = sqlx::query_as("SELECT * FROM employees WHERE email = ?")
        .bind(&request.email)
        .fetch_optional(&state.db)
        .await?;

    let employee = employee.ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !verify_password(&request.password, &employee.password_hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = generate_token();
    let token_hash = hash_token(&token);

    let expires_at = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::days(state.config.auth.session_ttl_days))
        .unwrap_or_else(chrono::Utc::now)
        .to_rfc3339();

    let session_id = uuid::Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO sessions (id, employee_id, token_hash, expires_at) VALUES (?, ?, ?, ?)")
        .bind(&session_id)
        .bind(&employee.id)
        .bind(&token_hash)
        .bind(&expires_at)
        .execute(&state.db)
        .await?;

    Ok(Json(LoginResponse {
        token,
        employee: EmployeeResponse::from(employee),
    }))
}

/// Validate token endpoint
pub async fn validate(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
) -> Result<StatusCode, ApiError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

    get_current_employee(&state.db, &token).await?;
    Ok(StatusCode::OK)
}

/// Auth middleware that validates session tokens on protected routes
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

    let token_hash = hash_token(&token);
    let session: Option<Session> = sqlx::query_as(
        "SELECT * FROM sessions WHERE token_hash = ? AND expires_at > datetime('now')",
    )
    .bind(&token_hash)
    .fetch_optional(&state.db)
    .await?;

    match session {
        Some(_) => Ok(next.run(request).await),
        None => Err(ApiError::unauthorized("Invalid or expired session")),
    }
}

/// Extract the bearer token from request headers
fn extract_token(headers: &axum::http::HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get("Authorization").and_then(|h| h.to_str().ok()) {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            if !token.trim().is_empty() {
                return Some(token.to_string());
            }
        }
    }

    // Fall back to X-API-Key header
    headers
        .get("X-API-Key")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

/// Resolve the employee behind a session token
pub async fn get_current_employee(
    pool: &sqlx::SqlitePool,
    token: &str,
) -> Result<Employee, ApiError> {
    let token_hash = hash_token(token);
    let session: Option<Session> = sqlx::query_as(
        "SELECT * FROM sessions WHERE token_hash = ? AND expires_at > datetime('now')",
    )
    .bind(&token_hash)
    .fetch_optional(pool)
    .await?;

    let session = session.ok_or_else(|| ApiError::unauthorized("Invalid or expired session"))?;

    let employee: Option<Employee> = sqlx::query_as("SELECT * FROM employees WHERE id = ?")
        .bind(&session.employee_id)
        .fetch_optional(pool)
        .await?;

    employee.ok_or_else(|| ApiError::unauthorized("Invalid or expired session"))
}

/// Extractor for the authenticated principal
#[async_trait]
impl FromRequestParts<Arc<AppState>> for Employee {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;
        get_current_employee(&state.db, &token).await
    }
}

/// Create the bootstrap admin account if the directory is empty
pub async fn ensure_admin_employee(
    pool: &sqlx::SqlitePool,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employees")
        .fetch_one(pool)
        .await?;

    if count.0 > 0 {
        return Ok(());
    }

    let id = uuid::Uuid::new_v4().to_string();
    let password_hash =
        hash_password(password).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    let today = chrono::Utc::now().date_naive().to_string();

    sqlx::query(
        r#"
        INSERT INTO employees (id, email, password_hash, first_name, last_name, position, joining_date, role)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(email)
    .bind(&password_hash)
    .bind("System")
    .bind("Admin")
    .bind("Administrator")
    .bind(&today)
    .bind("admin")
    .execute(pool)
    .await?;

    tracing::info!("Created bootstrap admin account: {}", email);
    Ok(())
}
