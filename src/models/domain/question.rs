use async_graphql::{Enum, SimpleObject};
use serde::{Deserialize, Serialize};

pub const DEFAULT_POINTS: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    MultipleChoice, // One designated correct option
    TrueFalse,      // Canonical value "true" or "false"
    ShortAnswer,    // Free text, ungraded
    Essay,          // Free text, ungraded
}

impl QuestionType {
    pub fn is_auto_graded(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::TrueFalse)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct QuestionOption {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(default = "default_points")]
    pub points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

fn default_points() -> u32 {
    DEFAULT_POINTS
}

impl Question {
    /// Zero-point questions count as one point so no question is silently worthless.
    pub fn effective_points(&self) -> u32 {
        if self.points == 0 {
            DEFAULT_POINTS
        } else {
            self.points
        }
    }

    /// The stored value a submission must equal to be correct.
    ///
    /// An explicit `correct_answer` wins; otherwise the first option flagged
    /// `is_correct` is used. Free-text questions have no answer key.
    pub fn canonical_answer(&self) -> Option<&str> {
        if !self.question_type.is_auto_graded() {
            return None;
        }
        self.correct_answer
            .as_deref()
            .filter(|answer| !answer.is_empty())
            .or_else(|| {
                self.options
                    .iter()
                    .find(|option| option.is_correct)
                    .map(|option| option.text.as_str())
            })
    }

    /// Checks that an auto-graded question can actually be graded.
    pub fn check_answer_key(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("question text must not be empty".to_string());
        }

        match self.question_type {
            QuestionType::MultipleChoice => {
                if self.options.len() < 2 {
                    return Err(format!(
                        "multiple-choice question '{}' needs at least two options",
                        self.text
                    ));
                }
                let answer = self.canonical_answer().ok_or_else(|| {
                    format!("multiple-choice question '{}' has no correct option", self.text)
                })?;
                if !self.options.iter().any(|option| option.text == answer) {
                    return Err(format!(
                        "correct answer of question '{}' does not match any option",
                        self.text
                    ));
                }
            }
            QuestionType::TrueFalse => match self.canonical_answer() {
                Some("true") | Some("false") => {}
                _ => {
                    return Err(format!(
                        "true-false question '{}' needs a correct answer of \"true\" or \"false\"",
                        self.text
                    ))
                }
            },
            QuestionType::ShortAnswer | QuestionType::Essay => {}
        }

        Ok(())
    }
}
