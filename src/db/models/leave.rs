//! Leave application models and status state machine.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Review outcome of a leave application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    /// Statuses a reviewer may set. Pending is initial-only.
    pub fn parse_review(s: &str) -> Option<LeaveStatus> {
        // Case-sensitive on purpose: the stored values are capitalized and
        // review input must match them exactly.
        match s {
            "Approved" => Some(LeaveStatus::Approved),
            "Rejected" => Some(LeaveStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveStatus::Pending => write!(f, "Pending"),
            LeaveStatus::Approved => write!(f, "Approved"),
            LeaveStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Leave application as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeaveApplication {
    pub id: String,
    pub employee_id: String,
    pub start_date: String,
    pub end_date: String,
    pub leave_type: String,
    pub reason: Option<String>,
    pub status: String,
    pub hr_comments: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Leave application with the requesting employee's profile joined in.
/// Employee fields are nullable because applications can outlive the
/// employee row (hard deletes do not cascade).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeaveApplicationWithEmployee {
    pub id: String,
    pub employee_id: String,
    pub start_date: String,
    pub end_date: String,
    pub leave_type: String,
    pub reason: Option<String>,
    pub status: String,
    pub hr_comments: String,
    pub created_at: String,
    pub updated_at: String,
    pub employee_first_name: Option<String>,
    pub employee_last_name: Option<String>,
    pub employee_email: Option<String>,
    pub employee_position: Option<String>,
}

/// Request to file a new leave application
#[derive(Debug, Deserialize)]
pub struct SubmitLeaveRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub leave_type: Option<String>,
    pub reason: Option<String>,
}

/// Request to review a leave application
#[derive(Debug, Deserialize)]
pub struct UpdateLeaveStatusRequest {
    pub status: Option<String>,
    pub hr_comments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_review_accepts_terminal_statuses() {
        assert_eq!(
            LeaveStatus::parse_review("Approved"),
            Some(LeaveStatus::Approved)
        );
        assert_eq!(
            LeaveStatus::parse_review("Rejected"),
            Some(LeaveStatus::Rejected)
        );
    }

    #[test]
    fn test_parse_review_rejects_everything_else() {
        assert_eq!(LeaveStatus::parse_review("Pending"), None);
        assert_eq!(LeaveStatus::parse_review("approved"), None);
        assert_eq!(LeaveStatus::parse_review("APPROVED"), None);
        assert_eq!(LeaveStatus::parse_review(""), None);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(LeaveStatus::Pending.to_string(), "Pending");
        assert_eq!(LeaveStatus::Approved.to_string(), "Approved");
        assert_eq!(LeaveStatus::Rejected.to_string(), "Rejected");
    }
}
