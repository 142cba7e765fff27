use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{submission::percentage, AnswerRecord, Caller, Quiz, Submission, UserRole},
        dto::{request::SubmitQuizInput, response::SubmissionResult},
    },
    repositories::QuizRepository,
    services::{access_service::AccessService, scoring},
};

/// Rounds of check-then-append before a lost race is reported as a conflict.
const APPEND_ROUNDS: usize = 2;

/// Same ceiling the input validator puts on a client-reported `time_spent`.
const MAX_TIME_SPENT: u32 = 604_800;

/// Sole writer of quiz submissions.
pub struct SubmissionService {
    quizzes: Arc<dyn QuizRepository>,
    access: Arc<AccessService>,
}

impl SubmissionService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, access: Arc<AccessService>) -> Self {
        Self { quizzes, access }
    }

    pub async fn submit(
        &self,
        caller: &Caller,
        quiz_id: &str,
        input: SubmitQuizInput,
    ) -> AppResult<SubmissionResult> {
        input.validate()?;

        for round in 1..=APPEND_ROUNDS {
            let quiz = self
                .quizzes
                .find_by_id(quiz_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))?;

            let attempts_used = self.check_can_submit(caller, &quiz, &input).await?;
            let submission = build_submission(&quiz, &caller.user_id, attempts_used, &input);

            if self
                .quizzes
                .append_submission(&quiz.id, quiz.version, attempts_used, submission.clone())
                .await?
            {
                log::info!(
                    "Student {} submitted attempt {} of quiz {}: {}/{}",
                    caller.user_id,
                    submission.attempt_number,
                    quiz.id,
                    submission.score,
                    submission.max_score
                );
                return Ok(SubmissionResult::new(&quiz, &submission));
            }

            log::warn!(
                "Submission append for quiz {} by student {} lost a race (round {})",
                quiz_id,
                caller.user_id,
                round
            );
        }

        Err(AppError::Conflict(format!(
            "Quiz '{}' changed while submitting, please retry",
            quiz_id
        )))
    }

    /// Returns the number of attempts the student has already used.
    async fn check_can_submit(
        &self,
        caller: &Caller,
        quiz: &Quiz,
        input: &SubmitQuizInput,
    ) -> AppResult<u32> {
        if caller.role != UserRole::Student {
            return Err(AppError::Forbidden(
                "Only students can submit quizzes".to_string(),
            ));
        }
        if !self
            .access
            .is_authorized(&caller.user_id, &quiz.instructor_id)
            .await?
        {
            log::warn!(
                "Student {} tried to submit quiz {} without access",
                caller.user_id,
                quiz.id
            );
            return Err(AppError::Forbidden(
                "You do not have access to this instructor's quizzes".to_string(),
            ));
        }
        if !quiz.is_active {
            return Err(AppError::InvalidState(format!(
                "Quiz '{}' is not accepting submissions",
                quiz.id
            )));
        }
        if input.answers.len() > quiz.questions.len() {
            return Err(AppError::ValidationError(format!(
                "Got {} answers for {} questions",
                input.answers.len(),
                quiz.questions.len()
            )));
        }
        if input.started_at > Utc::now() {
            return Err(AppError::ValidationError(
                "started_at cannot be in the future".to_string(),
            ));
        }

        let attempts_used = quiz.attempts_by(&caller.user_id);
        if attempts_used >= quiz.settings.attempts_allowed {
            return Err(AppError::AttemptsExceeded(format!(
                "All {} attempt(s) for this quiz have been used",
                quiz.settings.attempts_allowed
            )));
        }
        Ok(attempts_used)
    }
}

fn build_submission(
    quiz: &Quiz,
    student_id: &str,
    attempts_used: u32,
    input: &SubmitQuizInput,
) -> Submission {
    let breakdown = scoring::score(&quiz.questions, &input.answers);
    let completed_at = Utc::now();

    let answers = quiz
        .questions
        .iter()
        .zip(&breakdown.per_question)
        .enumerate()
        .map(|(index, (question, result))| AnswerRecord {
            question_id: question.id.clone(),
            submitted_value: input.answers.get(index).cloned().flatten(),
            is_correct: result.is_correct,
            points_earned: result.points_earned,
        })
        .collect();

    let time_spent = input.time_spent.unwrap_or_else(|| {
        let elapsed = (completed_at - input.started_at).num_seconds().max(0);
        u32::try_from(elapsed).unwrap_or(u32::MAX).min(MAX_TIME_SPENT)
    });

    let passed = percentage(breakdown.total_score, breakdown.max_score)
        >= f64::from(quiz.settings.passing_score);

    Submission {
        id: Uuid::new_v4().to_string(),
        student_id: student_id.to_string(),
        attempt_number: attempts_used + 1,
        answers,
        score: breakdown.total_score,
        max_score: breakdown.max_score,
        passed,
        started_at: input.started_at,
        completed_at,
        time_spent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::repositories::{
        access_request_repository::MockAccessRequestRepository,
        quiz_repository::MockQuizRepository, user_repository::MockUserRepository,
    };
    use crate::test_utils::fixtures::two_question_quiz;

    fn quiz() -> Quiz {
        two_question_quiz("i-1")
    }

    fn input(answers: &[Option<&str>]) -> SubmitQuizInput {
        SubmitQuizInput {
            answers: answers.iter().map(|a| a.map(str::to_string)).collect(),
            started_at: Utc::now() - Duration::seconds(90),
            time_spent: None,
        }
    }

    fn authorized(yes: bool) -> MockAccessRequestRepository {
        let mut requests = MockAccessRequestRepository::new();
        requests
            .expect_exists_with_status()
            .returning(move |_, _, _| Ok(yes));
        requests
    }

    fn service(quizzes: MockQuizRepository, requests: MockAccessRequestRepository) -> SubmissionService {
        let access = AccessService::new(Arc::new(requests), Arc::new(MockUserRepository::new()));
        SubmissionService::new(Arc::new(quizzes), Arc::new(access))
    }

    #[tokio::test]
    async fn test_submit_scores_and_appends() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_by_id().returning(|_| Ok(Some(quiz())));
        quizzes
            .expect_append_submission()
            .withf(|_, version, attempts, submission| {
                *version == 0 && *attempts == 0 && submission.attempt_number == 1
            })
            .times(1)
            .returning(|_, _, _, _| Ok(true));

        let result = service(quizzes, authorized(true))
            .submit(&Caller::student("s-1"), "q", input(&[Some("B"), Some("false")]))
            .await
            .unwrap();

        assert_eq!(result.score, 1);
        assert_eq!(result.max_score, 2);
        assert_eq!(result.percentage, 50.0);
        assert!(!result.passed);
        assert!(result.time_spent >= 90);
        assert_eq!(result.results[0].is_correct, Some(true));
        assert_eq!(result.results[1].is_correct, Some(false));
    }

    #[tokio::test]
    async fn test_submit_unauthorized_is_forbidden() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_by_id().returning(|_| Ok(Some(quiz())));
        quizzes.expect_append_submission().never();

        let err = service(quizzes, authorized(false))
            .submit(&Caller::student("s-1"), "q", input(&[Some("B")]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_submit_missing_quiz() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_by_id().returning(|_| Ok(None));

        let err = service(quizzes, MockAccessRequestRepository::new())
            .submit(&Caller::student("s-1"), "missing", input(&[]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_submit_after_last_attempt() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_by_id().returning(|_| {
            let mut quiz = quiz();
            let taken = build_submission(&quiz, "s-1", 0, &input(&[Some("B")]));
            quiz.submissions.push(taken);
            Ok(Some(quiz))
        });
        quizzes.expect_append_submission().never();

        let err = service(quizzes, authorized(true))
            .submit(&Caller::student("s-1"), "q", input(&[Some("A")]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AttemptsExceeded(_)));
    }

    #[tokio::test]
    async fn test_submit_too_many_answers() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_by_id().returning(|_| Ok(Some(quiz())));

        let err = service(quizzes, authorized(true))
            .submit(
                &Caller::student("s-1"),
                "q",
                input(&[Some("B"), Some("true"), Some("extra")]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_submit_start_in_future_is_rejected() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_by_id().returning(|_| Ok(Some(quiz())));

        let mut late = input(&[Some("B")]);
        late.started_at = Utc::now() + Duration::minutes(5);
        let err = service(quizzes, authorized(true))
            .submit(&Caller::student("s-1"), "q", late)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_inactive_quiz_rejects_submissions() {
        let mut quizzes = MockQuizRepository::new();
        quizzes.expect_find_by_id().returning(|_| {
            let mut quiz = quiz();
            quiz.is_active = false;
            Ok(Some(quiz))
        });

        let err = service(quizzes, authorized(true))
            .submit(&Caller::student("s-1"), "q", input(&[Some("B")]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_submit_gives_up_after_two_lost_races() {
        let mut quizzes = MockQuizRepository::new();
        quizzes
            .expect_find_by_id()
            .times(2)
            .returning(|_| Ok(Some(quiz())));
        quizzes
            .expect_append_submission()
            .times(2)
            .returning(|_, _, _, _| Ok(false));

        let err = service(quizzes, authorized(true))
            .submit(&Caller::student("s-1"), "q", input(&[Some("B")]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_explicit_time_spent_wins() {
        let mut submit = input(&[Some("B"), Some("true")]);
        submit.time_spent = Some(12);
        let submission = build_submission(&quiz(), "s-1", 2, &submit);
        assert_eq!(submission.time_spent, 12);
        assert_eq!(submission.attempt_number, 3);
        assert!(submission.passed);
        assert_eq!(submission.answers.len(), 2);
    }

    #[test]
    fn test_derived_time_spent_is_capped() {
        let mut submit = input(&[Some("B"), Some("true")]);
        submit.started_at = Utc::now() - Duration::days(400);
        let submission = build_submission(&quiz(), "s-1", 0, &submit);
        assert_eq!(submission.time_spent, MAX_TIME_SPENT);
    }

    #[test]
    fn test_unanswered_questions_are_recorded() {
        let submission = build_submission(&quiz(), "s-1", 0, &input(&[Some("B")]));
        assert_eq!(submission.answers.len(), 2);
        assert_eq!(submission.answers[1].submitted_value, None);
        assert_eq!(submission.answers[1].is_correct, Some(false));
        assert_eq!(submission.score, 1);
    }
}
