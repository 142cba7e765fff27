use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One graded answer, aligned by index with the quiz's questions.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct AnswerRecord {
    pub question_id: String,
    pub submitted_value: Option<String>,
    /// `None` for questions that are not auto-graded.
    pub is_correct: Option<bool>,
    pub points_earned: u32,
}

/// One completed attempt. Never mutated once appended to its quiz.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Submission {
    pub id: String,
    pub student_id: String,
    pub attempt_number: u32,
    pub answers: Vec<AnswerRecord>,
    pub score: u32,
    pub max_score: u32,
    pub passed: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Seconds.
    pub time_spent: u32,
}

impl Submission {
    pub fn answered_count(&self) -> u32 {
        self.answers
            .iter()
            .filter(|answer| {
                answer
                    .submitted_value
                    .as_deref()
                    .map(|value| !value.trim().is_empty())
                    .unwrap_or(false)
            })
            .count() as u32
    }

    pub fn percentage(&self) -> f64 {
        percentage(self.score, self.max_score)
    }
}

/// `score / max_score * 100`, zero when there is nothing to score.
pub fn percentage(score: u32, max_score: u32) -> f64 {
    if max_score == 0 {
        0.0
    } else {
        f64::from(score) / f64::from(max_score) * 100.0
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
