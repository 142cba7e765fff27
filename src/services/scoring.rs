//! Pure grading of submitted answers against a quiz's question bank.

use serde::Serialize;

use crate::models::domain::question::Question;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct QuestionScore {
    pub is_correct: Option<bool>,
    pub points_earned: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub per_question: Vec<QuestionScore>,
    pub total_score: u32,
    pub max_score: u32,
}

/// Sum of effective points over every question, graded or not.
///
/// This is the one denominator used for percentages across the crate.
pub fn max_score(questions: &[Question]) -> u32 {
    questions.iter().map(Question::effective_points).sum()
}

/// Grades `answers[i]` against `questions[i]`.
///
/// Missing answers score zero; answers past the last question are ignored.
pub fn score(questions: &[Question], answers: &[Option<String>]) -> ScoreBreakdown {
    let per_question: Vec<QuestionScore> = questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let submitted = answers.get(index).and_then(|answer| answer.as_deref());
            grade_question(question, submitted)
        })
        .collect();

    let total_score = per_question.iter().map(|q| q.points_earned).sum();

    ScoreBreakdown {
        per_question,
        total_score,
        max_score: max_score(questions),
    }
}

fn grade_question(question: &Question, submitted: Option<&str>) -> QuestionScore {
    if !question.question_type.is_auto_graded() {
        return QuestionScore {
            is_correct: None,
            points_earned: 0,
        };
    }

    let is_correct = match (submitted, question.canonical_answer()) {
        (Some(value), Some(expected)) => value == expected,
        _ => false,
    };

    log::debug!(
        "graded question {} ({:?}): correct={}",
        question.id,
        question.question_type,
        is_correct
    );

    QuestionScore {
        is_correct: Some(is_correct),
        points_earned: if is_correct {
            question.effective_points()
        } else {
            0
        },
    }
}
