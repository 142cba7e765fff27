use crate::models::domain::{
    Question, QuestionOption, QuestionType, Quiz, QuizSettings, User, UserRole,
};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// Creates an active account with a predictable id.
    pub fn test_user(id: &str, role: UserRole) -> User {
        let mut user = User::new(id, &format!("{}@example.com", id), role);
        user.id = id.to_string();
        user
    }

    pub fn multiple_choice(correct: &str, wrong: &str) -> Question {
        Question {
            id: format!("mc-{}", correct),
            text: format!("Pick {}", correct),
            question_type: QuestionType::MultipleChoice,
            options: vec![
                QuestionOption {
                    text: wrong.to_string(),
                    is_correct: false,
                },
                QuestionOption {
                    text: correct.to_string(),
                    is_correct: true,
                },
            ],
            correct_answer: None,
            points: 1,
            explanation: None,
        }
    }

    pub fn true_false(answer: bool) -> Question {
        Question {
            id: format!("tf-{}", answer),
            text: "True or false?".to_string(),
            question_type: QuestionType::TrueFalse,
            options: vec![],
            correct_answer: Some(answer.to_string()),
            points: 1,
            explanation: None,
        }
    }

    /// Two questions worth one point each: answers are `B` and `true`.
    pub fn two_question_quiz(instructor_id: &str) -> Quiz {
        Quiz::new(
            instructor_id,
            "Two questions",
            "",
            vec![multiple_choice("B", "A"), true_false(true)],
            QuizSettings::default(),
        )
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::test_helpers::*;
    use crate::models::domain::UserRole;
    use crate::services::scoring;
    use actix_web::http::StatusCode;

    #[test]
    fn test_fixtures_test_user() {
        let user = test_user("prof", UserRole::Instructor);
        assert_eq!(user.id, "prof");
        assert_eq!(user.email, "prof@example.com");
        assert!(user.is_instructor());
    }

    #[test]
    fn test_fixture_quiz_has_valid_answer_keys() {
        let quiz = two_question_quiz("prof");
        for question in &quiz.questions {
            assert!(question.check_answer_key().is_ok());
        }
        assert_eq!(scoring::max_score(&quiz.questions), 2);
    }

    #[test]
    fn test_status_helpers() {
        assert_success_status(StatusCode::CREATED);
        assert_error_status(StatusCode::CONFLICT);
    }
}
