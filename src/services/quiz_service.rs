use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Assignment, Caller, Question, Quiz, QuizSettings, UserRole},
        dto::{
            request::{AssignQuizInput, CreateQuizInput, QuestionInput, UpdateQuizInput},
            response::{QuizDto, QuizForTaking, QuizSummary, QuizView, SubmissionView},
        },
    },
    repositories::{QuizRepository, UserRepository},
    services::access_service::AccessService,
};

pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
    users: Arc<dyn UserRepository>,
    access: Arc<AccessService>,
}

impl QuizService {
    pub fn new(
        repository: Arc<dyn QuizRepository>,
        users: Arc<dyn UserRepository>,
        access: Arc<AccessService>,
    ) -> Self {
        Self {
            repository,
            users,
            access,
        }
    }

    pub async fn create_quiz(&self, caller: &Caller, input: CreateQuizInput) -> AppResult<Quiz> {
        if caller.role != UserRole::Instructor {
            return Err(AppError::Forbidden(
                "Only instructors can create quizzes".to_string(),
            ));
        }
        input.validate()?;

        let questions = build_questions(input.questions)?;
        let settings = input
            .settings
            .unwrap_or_default()
            .apply_to(QuizSettings::default());

        let mut quiz = Quiz::new(
            &caller.user_id,
            &input.title,
            &input.description,
            questions,
            settings,
        );
        quiz.tags = input.tags;
        if let Some(difficulty) = input.difficulty {
            quiz.difficulty = difficulty;
        }

        let created = self.repository.create(quiz).await?;
        log::info!(
            "Quiz {} created by instructor {} with {} questions",
            created.id,
            created.instructor_id,
            created.questions.len()
        );
        Ok(created)
    }

    pub async fn update_quiz(
        &self,
        caller: &Caller,
        quiz_id: &str,
        input: UpdateQuizInput,
    ) -> AppResult<Quiz> {
        input.validate()?;

        let mut quiz = self.load_owned(caller, quiz_id).await?;
        let expected_version = quiz.version;

        if let Some(title) = input.title {
            quiz.title = title;
        }
        if let Some(description) = input.description {
            quiz.description = description;
        }
        if let Some(questions) = input.questions {
            quiz.questions = build_questions(questions)?;
        }
        if let Some(settings) = input.settings {
            quiz.settings = settings.apply_to(quiz.settings);
        }
        if let Some(tags) = input.tags {
            quiz.tags = tags;
        }
        if let Some(difficulty) = input.difficulty {
            quiz.difficulty = difficulty;
        }
        if let Some(is_active) = input.is_active {
            quiz.is_active = is_active;
        }

        if !self
            .repository
            .update_definition(quiz.clone(), expected_version)
            .await?
        {
            log::warn!(
                "Quiz {} changed since version {}, update rejected",
                quiz_id,
                expected_version
            );
            return Err(AppError::Conflict(format!(
                "Quiz '{}' was modified concurrently, reload and retry",
                quiz_id
            )));
        }

        quiz.version = expected_version + 1;
        quiz.modified_at = Some(Utc::now());
        log::info!("Quiz {} updated to version {}", quiz.id, quiz.version);
        Ok(quiz)
    }

    pub async fn delete_quiz(&self, caller: &Caller, quiz_id: &str) -> AppResult<()> {
        self.load_owned(caller, quiz_id).await?;

        if !self.repository.delete(quiz_id).await? {
            return Err(not_found(quiz_id));
        }
        log::info!("Quiz {} deleted by {}", quiz_id, caller.user_id);
        Ok(())
    }

    /// Owners and admins see the whole definition; authorized students get
    /// the answer key stripped.
    pub async fn get_quiz(&self, caller: &Caller, quiz_id: &str) -> AppResult<QuizView> {
        let quiz = self.load(quiz_id).await?;

        if quiz.is_owned_by(&caller.user_id) || caller.is_admin() {
            return Ok(QuizView::Full(QuizDto::from(quiz)));
        }

        if caller.role == UserRole::Student
            && self
                .access
                .is_authorized(&caller.user_id, &quiz.instructor_id)
                .await?
        {
            if !quiz.is_active {
                return Err(not_found(quiz_id));
            }
            return Ok(QuizView::ForTaking(QuizForTaking::from_quiz(
                &quiz,
                &caller.user_id,
            )));
        }

        Err(AppError::Forbidden(
            "You do not have access to this quiz".to_string(),
        ))
    }

    pub async fn list_quizzes_for(&self, caller: &Caller) -> AppResult<Vec<QuizSummary>> {
        let quizzes = match caller.role {
            UserRole::Admin => self.repository.list_all().await?,
            UserRole::Instructor => {
                self.repository
                    .list_by_instructors(std::slice::from_ref(&caller.user_id))
                    .await?
            }
            UserRole::Student => {
                let instructors = self.access.authorized_instructor_ids(&caller.user_id).await?;
                self.repository
                    .list_by_instructors(&instructors)
                    .await?
                    .into_iter()
                    .filter(|quiz| quiz.is_active)
                    .collect()
            }
        };

        Ok(quizzes.iter().map(QuizSummary::from).collect())
    }

    pub async fn assign_quiz(
        &self,
        caller: &Caller,
        quiz_id: &str,
        input: AssignQuizInput,
    ) -> AppResult<Quiz> {
        input.validate()?;
        let quiz = self.load_owned(caller, quiz_id).await?;

        if !self
            .access
            .is_authorized(&input.student_id, &quiz.instructor_id)
            .await?
        {
            return Err(AppError::ValidationError(format!(
                "Student '{}' has no access to this instructor",
                input.student_id
            )));
        }

        let assignment = Assignment {
            student_id: input.student_id.clone(),
            assigned_at: Utc::now(),
            due_date: input.due_date,
            completed: quiz.attempts_by(&input.student_id) > 0,
        };
        if !self.repository.upsert_assignment(quiz_id, assignment).await? {
            return Err(not_found(quiz_id));
        }

        log::info!("Quiz {} assigned to student {}", quiz_id, input.student_id);
        self.load(quiz_id).await
    }

    pub async fn get_submissions(
        &self,
        caller: &Caller,
        quiz_id: &str,
    ) -> AppResult<Vec<SubmissionView>> {
        let quiz = self.load(quiz_id).await?;
        if !quiz.is_owned_by(&caller.user_id) && !caller.is_admin() {
            return Err(AppError::Forbidden(
                "Only the quiz owner can view its submissions".to_string(),
            ));
        }

        let mut student_ids: Vec<String> = quiz
            .submissions
            .iter()
            .map(|submission| submission.student_id.clone())
            .collect();
        student_ids.sort();
        student_ids.dedup();

        let usernames: HashMap<String, String> = self
            .users
            .find_by_ids(&student_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user.username))
            .collect();

        Ok(quiz
            .submissions
            .into_iter()
            .map(|submission| {
                let username = usernames.get(&submission.student_id).cloned();
                SubmissionView::new(submission, username)
            })
            .collect())
    }

    async fn load(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.repository
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| not_found(quiz_id))
    }

    async fn load_owned(&self, caller: &Caller, quiz_id: &str) -> AppResult<Quiz> {
        let quiz = self.load(quiz_id).await?;
        if !quiz.is_owned_by(&caller.user_id) {
            return Err(AppError::Forbidden(
                "Only the quiz owner can change this quiz".to_string(),
            ));
        }
        Ok(quiz)
    }
}

fn not_found(quiz_id: &str) -> AppError {
    AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id))
}

fn build_questions(inputs: Vec<QuestionInput>) -> AppResult<Vec<Question>> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| {
            let question = Question::from(input);
            question
                .check_answer_key()
                .map_err(|reason| {
                    AppError::ValidationError(format!("Question {}: {}", index + 1, reason))
                })?;
            Ok(question)
        })
        .collect()
}
