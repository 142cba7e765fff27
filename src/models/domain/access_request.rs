use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum AccessRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl AccessRequestStatus {
    /// Pending and accepted requests occupy the (student, instructor) slot.
    pub fn is_active(&self) -> bool {
        matches!(self, AccessRequestStatus::Pending | AccessRequestStatus::Accepted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessRequestStatus::Pending => "pending",
            AccessRequestStatus::Accepted => "accepted",
            AccessRequestStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for AccessRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    pub fn target_status(&self) -> AccessRequestStatus {
        match self {
            Decision::Accept => AccessRequestStatus::Accepted,
            Decision::Reject => AccessRequestStatus::Rejected,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct AccessRequest {
    pub id: String,
    pub student_id: String,
    pub instructor_id: String,
    pub status: AccessRequestStatus,
    #[serde(default)]
    pub message: String,
    /// Mirrors `status.is_active()`; backs the partial unique index on the pair.
    pub active: bool,
    pub requested_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl AccessRequest {
    pub fn new(student_id: &str, instructor_id: &str, message: Option<String>) -> Self {
        AccessRequest {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            instructor_id: instructor_id.to_string(),
            status: AccessRequestStatus::Pending,
            message: message.unwrap_or_default(),
            active: true,
            requested_at: Utc::now(),
            decided_at: None,
            rejection_reason: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == AccessRequestStatus::Pending
    }

    /// Applies a decision to a pending request. Callers must have checked `is_pending`.
    pub fn decided(mut self, decision: Decision, reason: Option<String>, at: DateTime<Utc>) -> Self {
        self.status = decision.target_status();
        self.active = self.status.is_active();
        self.decided_at = Some(at);
        self.rejection_reason = match decision {
            Decision::Reject => reason,
            Decision::Accept => None,
        };
        self
    }
}
