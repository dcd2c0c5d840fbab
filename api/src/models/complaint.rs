use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl ComplaintStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ComplaintStatus::Resolved | ComplaintStatus::Rejected)
    }

    pub fn can_transition_to(&self, next: ComplaintStatus) -> bool {
        use ComplaintStatus::*;
        match (self, next) {
            (Pending, InProgress) | (Pending, Resolved) | (Pending, Rejected) => true,
            (InProgress, Resolved) | (InProgress, Rejected) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Complaint {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub room_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub admin_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateComplaintRequest {
    pub room_id: Option<Uuid>,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateComplaintStatusRequest {
    pub status: ComplaintStatus,
    pub admin_note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_is_terminal() {
        assert!(ComplaintStatus::Resolved.is_terminal());
        assert!(!ComplaintStatus::Resolved.can_transition_to(ComplaintStatus::Pending));
        assert!(!ComplaintStatus::Resolved.can_transition_to(ComplaintStatus::InProgress));
        assert!(!ComplaintStatus::Rejected.can_transition_to(ComplaintStatus::Pending));
    }

    #[test]
    fn pending_can_move_forward() {
        assert!(ComplaintStatus::Pending.can_transition_to(ComplaintStatus::InProgress));
        assert!(ComplaintStatus::Pending.can_transition_to(ComplaintStatus::Resolved));
        assert!(ComplaintStatus::InProgress.can_transition_to(ComplaintStatus::Rejected));
    }
}
