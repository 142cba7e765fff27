use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressStatus {
    NotStarted,
    /// Not derivable until attempt-start records exist; never produced today.
    InProgress,
    Completed,
}

/// Derived per-quiz view for one student. Recomputed on every read, never stored.
#[derive(Clone, Debug, PartialEq, Serialize, SimpleObject)]
pub struct ProgressRecord {
    pub quiz_id: String,
    pub title: String,
    pub status: ProgressStatus,
    pub total_questions: u32,
    pub completed_questions: u32,
    pub score: Option<u32>,
    pub max_score: u32,
    pub time_spent: u64,
    pub attempts: u32,
    pub max_attempts: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, SimpleObject)]
pub struct StudentStats {
    pub total_quizzes: u32,
    pub completed_quizzes: u32,
    pub average_score: f64,
    pub total_time_spent: u64,
    pub upcoming_quizzes: u32,
    pub overdue_quizzes: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, SimpleObject)]
pub struct StudentProgress {
    pub quiz_progress: Vec<ProgressRecord>,
    pub stats: StudentStats,
}
