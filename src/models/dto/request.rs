use async_graphql::InputObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::domain::{
    access_request::Decision,
    content::{ContentCategory, ContentType},
    question::{Question, QuestionOption, QuestionType},
    quiz::{Difficulty, QuizSettings},
};

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct CreateAccessRequestInput {
    #[validate(length(min = 1, max = 100))]
    pub instructor_id: String,

    #[validate(length(max = 500))]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct DecideAccessRequestInput {
    pub decision: Decision,

    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, InputObject)]
pub struct QuestionOptionInput {
    #[validate(length(min = 1, max = 500))]
    pub text: String,

    #[serde(default)]
    #[graphql(default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, InputObject)]
pub struct QuestionInput {
    #[validate(length(min = 1, max = 2000))]
    pub text: String,

    pub question_type: QuestionType,

    #[serde(default)]
    #[graphql(default)]
    #[validate(nested)]
    pub options: Vec<QuestionOptionInput>,

    #[validate(length(max = 500))]
    pub correct_answer: Option<String>,

    #[validate(range(max = 1000))]
    pub points: Option<u32>,

    #[validate(length(max = 2000))]
    pub explanation: Option<String>,
}

impl From<QuestionInput> for Question {
    fn from(input: QuestionInput) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            text: input.text,
            question_type: input.question_type,
            options: input
                .options
                .into_iter()
                .map(|option| QuestionOption {
                    text: option.text,
                    is_correct: option.is_correct,
                })
                .collect(),
            correct_answer: input.correct_answer,
            points: input.points.unwrap_or(1),
            explanation: input.explanation,
        }
    }
}

/// Partial settings; unset fields keep their current (or default) value.
#[derive(Debug, Clone, Default, Deserialize, Validate, InputObject)]
pub struct QuizSettingsInput {
    #[validate(range(max = 1440))]
    pub time_limit: Option<u32>,

    #[validate(range(min = 1, max = 100))]
    pub attempts_allowed: Option<u32>,

    pub shuffle_questions: Option<bool>,

    pub show_correct_answers: Option<bool>,

    #[validate(range(max = 100))]
    pub passing_score: Option<u32>,
}

impl QuizSettingsInput {
    pub fn apply_to(self, mut settings: QuizSettings) -> QuizSettings {
        if let Some(time_limit) = self.time_limit {
            settings.time_limit = time_limit;
        }
        if let Some(attempts_allowed) = self.attempts_allowed {
            settings.attempts_allowed = attempts_allowed;
        }
        if let Some(shuffle) = self.shuffle_questions {
            settings.shuffle_questions = shuffle;
        }
        if let Some(show) = self.show_correct_answers {
            settings.show_correct_answers = show;
        }
        if let Some(passing_score) = self.passing_score {
            settings.passing_score = passing_score;
        }
        settings
    }
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct CreateQuizInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    #[graphql(default)]
    #[validate(length(max = 2000))]
    pub description: String,

    #[validate(length(min = 1, max = 200), nested)]
    pub questions: Vec<QuestionInput>,

    #[validate(nested)]
    pub settings: Option<QuizSettingsInput>,

    #[serde(default)]
    #[graphql(default)]
    pub tags: Vec<String>,

    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, InputObject)]
pub struct UpdateQuizInput {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 200), nested)]
    pub questions: Option<Vec<QuestionInput>>,

    #[validate(nested)]
    pub settings: Option<QuizSettingsInput>,

    pub tags: Option<Vec<String>>,

    pub difficulty: Option<Difficulty>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct AssignQuizInput {
    #[validate(length(min = 1, max = 100))]
    pub student_id: String,

    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct SubmitQuizInput {
    /// Index-aligned with the quiz's questions; `null` marks a skipped question.
    #[validate(length(max = 200))]
    pub answers: Vec<Option<String>>,

    /// When the attempt was opened, as recorded by the client session.
    pub started_at: DateTime<Utc>,

    /// Seconds; derived from `started_at` when omitted. Capped at one week.
    #[validate(range(max = 604_800))]
    pub time_spent: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct CreateContentInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 2000))]
    pub description: String,

    pub content_type: ContentType,

    #[validate(url)]
    pub file_url: String,

    #[validate(length(min = 1, max = 255))]
    pub file_name: String,

    pub file_size: u32,

    #[validate(length(min = 1, max = 100))]
    pub mime_type: String,

    pub category: Option<ContentCategory>,

    #[serde(default)]
    #[graphql(default)]
    pub tags: Vec<String>,
}
