//! Employee, role and session models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Roles an employee can hold, in increasing order of privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeRole {
    /// Regular staff member, may manage their own leave and attendance
    Employee,
    /// Human resources, may manage the directory and review leave
    Hr,
    /// Full access
    Admin,
}

impl std::fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmployeeRole::Employee => write!(f, "employee"),
            EmployeeRole::Hr => write!(f, "hr"),
            EmployeeRole::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for EmployeeRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "employee" => Ok(EmployeeRole::Employee),
            "hr" => Ok(EmployeeRole::Hr),
            "admin" => Ok(EmployeeRole::Admin),
            _ => Err(format!("Unknown employee role: {}", s)),
        }
    }
}

impl From<String> for EmployeeRole {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(EmployeeRole::Employee)
    }
}

/// Employee entity as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub joining_date: String,
    pub role: String,
    pub total_performance: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl Employee {
    /// Get the role as an EmployeeRole enum
    pub fn role_enum(&self) -> EmployeeRole {
        EmployeeRole::from(self.role.clone())
    }
}

/// Employee fields safe to return to clients (password hash excluded)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub joining_date: String,
    pub role: String,
    pub total_performance: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Employee> for EmployeeResponse {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            email: e.email,
            first_name: e.first_name,
            last_name: e.last_name,
            position: e.position,
            joining_date: e.joining_date,
            role: e.role,
            total_performance: e.total_performance,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

/// Directory listing with the role=employee head count
#[derive(Debug, Serialize)]
pub struct EmployeeListResponse {
    pub total: i64,
    pub employees: Vec<EmployeeResponse>,
}

/// Confirmation returned after a hard delete
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteEmployeeResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: String,
    pub employee_id: String,
    pub token_hash: String,
    pub expires_at: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub employee: EmployeeResponse,
}
