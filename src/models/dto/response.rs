use async_graphql::{SimpleObject, Union};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{
    question::{Question, QuestionType},
    quiz::{Assignment, Difficulty, Quiz, QuizSettings},
    submission::{round2, AnswerRecord, Submission},
};
use crate::services::scoring;

/// Full quiz definition including the answer key. Owner and admin only.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizDto {
    pub id: String,
    pub instructor_id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<Question>,
    pub settings: QuizSettings,
    pub assigned_to: Vec<Assignment>,
    pub submission_count: u32,
    pub max_score: u32,
    pub version: i64,
    pub is_active: bool,
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    pub created_at: Option<DateTime<Utc>>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<Quiz> for QuizDto {
    fn from(quiz: Quiz) -> Self {
        QuizDto {
            max_score: scoring::max_score(&quiz.questions),
            submission_count: quiz.submissions.len() as u32,
            id: quiz.id,
            instructor_id: quiz.instructor_id,
            title: quiz.title,
            description: quiz.description,
            questions: quiz.questions,
            settings: quiz.settings,
            assigned_to: quiz.assigned_to,
            version: quiz.version,
            is_active: quiz.is_active,
            tags: quiz.tags,
            difficulty: quiz.difficulty,
            created_at: quiz.created_at,
            modified_at: quiz.modified_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuestionForTaking {
    pub id: String,
    pub text: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub points: u32,
}

impl From<&Question> for QuestionForTaking {
    fn from(question: &Question) -> Self {
        QuestionForTaking {
            id: question.id.clone(),
            text: question.text.clone(),
            question_type: question.question_type,
            options: question.options.iter().map(|o| o.text.clone()).collect(),
            points: question.effective_points(),
        }
    }
}

/// What a student sees before answering: no answer key, only their own attempt budget.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizForTaking {
    pub id: String,
    pub instructor_id: String,
    pub title: String,
    pub description: String,
    pub questions: Vec<QuestionForTaking>,
    pub time_limit: u32,
    pub shuffle_questions: bool,
    pub passing_score: u32,
    pub max_score: u32,
    pub attempts_allowed: u32,
    pub attempts_used: u32,
    pub due_date: Option<DateTime<Utc>>,
}

impl QuizForTaking {
    pub fn from_quiz(quiz: &Quiz, student_id: &str) -> Self {
        QuizForTaking {
            id: quiz.id.clone(),
            instructor_id: quiz.instructor_id.clone(),
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            questions: quiz.questions.iter().map(QuestionForTaking::from).collect(),
            time_limit: quiz.settings.time_limit,
            shuffle_questions: quiz.settings.shuffle_questions,
            passing_score: quiz.settings.passing_score,
            max_score: scoring::max_score(&quiz.questions),
            attempts_allowed: quiz.settings.attempts_allowed,
            attempts_used: quiz.attempts_by(student_id),
            due_date: quiz
                .assignment_for(student_id)
                .and_then(|assignment| assignment.due_date),
        }
    }
}

#[derive(Debug, Clone, Serialize, Union)]
#[serde(untagged)]
pub enum QuizView {
    Full(QuizDto),
    ForTaking(QuizForTaking),
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuizSummary {
    pub id: String,
    pub instructor_id: String,
    pub title: String,
    pub description: String,
    pub question_count: u32,
    pub max_score: u32,
    pub settings: QuizSettings,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        QuizSummary {
            id: quiz.id.clone(),
            instructor_id: quiz.instructor_id.clone(),
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            question_count: quiz.questions.len() as u32,
            max_score: scoring::max_score(&quiz.questions),
            settings: quiz.settings.clone(),
            difficulty: quiz.difficulty,
            tags: quiz.tags.clone(),
            is_active: quiz.is_active,
            created_at: quiz.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuestionResult {
    pub question_id: String,
    pub is_correct: Option<bool>,
    pub points_earned: u32,
    /// Present only when the quiz is configured to reveal answers.
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct SubmissionResult {
    pub submission_id: String,
    pub quiz_id: String,
    pub attempt_number: u32,
    pub score: u32,
    pub max_score: u32,
    pub percentage: f64,
    pub passed: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub time_spent: u32,
    pub results: Vec<QuestionResult>,
}

impl SubmissionResult {
    pub fn new(quiz: &Quiz, submission: &Submission) -> Self {
        let reveal = quiz.settings.show_correct_answers;
        let results = submission
            .answers
            .iter()
            .zip(quiz.questions.iter())
            .map(|(answer, question)| QuestionResult {
                question_id: answer.question_id.clone(),
                is_correct: answer.is_correct,
                points_earned: answer.points_earned,
                correct_answer: if reveal {
                    question.canonical_answer().map(str::to_string)
                } else {
                    None
                },
            })
            .collect();

        SubmissionResult {
            submission_id: submission.id.clone(),
            quiz_id: quiz.id.clone(),
            attempt_number: submission.attempt_number,
            score: submission.score,
            max_score: submission.max_score,
            percentage: round2(submission.percentage()),
            passed: submission.passed,
            started_at: submission.started_at,
            completed_at: submission.completed_at,
            time_spent: submission.time_spent,
            results,
        }
    }
}

/// A stored attempt as shown to the quiz owner.
#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct SubmissionView {
    pub id: String,
    pub student_id: String,
    pub student_username: Option<String>,
    pub attempt_number: u32,
    pub answers: Vec<AnswerRecord>,
    pub score: u32,
    pub max_score: u32,
    pub passed: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub time_spent: u32,
}

impl SubmissionView {
    pub fn new(submission: Submission, student_username: Option<String>) -> Self {
        SubmissionView {
            id: submission.id,
            student_id: submission.student_id,
            student_username,
            attempt_number: submission.attempt_number,
            answers: submission.answers,
            score: submission.score,
            max_score: submission.max_score,
            passed: submission.passed,
            started_at: submission.started_at,
            completed_at: submission.completed_at,
            time_spent: submission.time_spent,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, SimpleObject)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
