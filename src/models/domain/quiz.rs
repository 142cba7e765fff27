use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{question::Question, submission::Submission};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct QuizSettings {
    /// Minutes; 0 means unlimited.
    #[serde(default)]
    pub time_limit: u32,
    #[serde(default = "default_attempts_allowed")]
    pub attempts_allowed: u32,
    #[serde(default)]
    pub shuffle_questions: bool,
    #[serde(default = "default_true")]
    pub show_correct_answers: bool,
    /// Percentage, 0-100.
    #[serde(default = "default_passing_score")]
    pub passing_score: u32,
}

fn default_attempts_allowed() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_passing_score() -> u32 {
    70
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            time_limit: 0,
            attempts_allowed: default_attempts_allowed(),
            shuffle_questions: false,
            show_correct_answers: true,
            passing_score: default_passing_score(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Assignment {
    pub student_id: String,
    pub assigned_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub instructor_id: String, // Owner; the only account allowed to change the quiz
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<Question>,
    #[serde(default)]
    pub settings: QuizSettings,
    #[serde(default)]
    pub assigned_to: Vec<Assignment>,
    #[serde(default)]
    pub submissions: Vec<Submission>, // Appended only by the submission pipeline
    /// Bumped on every definition change.
    #[serde(default)]
    pub version: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Quiz {
    pub fn new(
        instructor_id: &str,
        title: &str,
        description: &str,
        questions: Vec<Question>,
        settings: QuizSettings,
    ) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            instructor_id: instructor_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            questions,
            settings,
            assigned_to: Vec::new(),
            submissions: Vec::new(),
            version: 0,
            is_active: true,
            tags: Vec::new(),
            difficulty: Difficulty::default(),
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.instructor_id == user_id
    }

    pub fn submissions_by<'a>(&'a self, student_id: &'a str) -> impl Iterator<Item = &'a Submission> + 'a {
        self.submissions
            .iter()
            .filter(move |submission| submission.student_id == student_id)
    }

    pub fn attempts_by(&self, student_id: &str) -> u32 {
        self.submissions_by(student_id).count() as u32
    }

    pub fn assignment_for(&self, student_id: &str) -> Option<&Assignment> {
        self.assigned_to
            .iter()
            .find(|assignment| assignment.student_id == student_id)
    }
}
