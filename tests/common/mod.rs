#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;
use tokio::sync::RwLock;

use edulink_server::{
    app_state::{AppState, Repositories},
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{
        AccessRequest, AccessRequestStatus, Assignment, Caller, ContentItem, Question,
        QuestionOption, QuestionType, Quiz, QuizSettings, Submission, User, UserRole,
    },
    repositories::{AccessRequestRepository, ContentRepository, QuizRepository, UserRepository},
};

pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) || users.contains_key(&user.id) {
            return Err(AppError::ValidationError(format!(
                "User '{}' already exists",
                user.username
            )));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}

pub struct InMemoryAccessRequestRepository {
    requests: Arc<RwLock<HashMap<String, AccessRequest>>>,
}

impl InMemoryAccessRequestRepository {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn newest_first(mut requests: Vec<AccessRequest>) -> Vec<AccessRequest> {
    requests.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
    requests
}

#[async_trait]
impl AccessRequestRepository for InMemoryAccessRequestRepository {
    async fn create(&self, request: AccessRequest) -> AppResult<AccessRequest> {
        let mut requests = self.requests.write().await;
        let clash = requests.values().any(|r| {
            r.active
                && r.student_id == request.student_id
                && r.instructor_id == request.instructor_id
        });
        if clash {
            return Err(AppError::DuplicateRequest(
                "An active request for this pair already exists".to_string(),
            ));
        }
        requests.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<AccessRequest>> {
        Ok(self.requests.read().await.get(id).cloned())
    }

    async fn find_active_for_pair(
        &self,
        student_id: &str,
        instructor_id: &str,
    ) -> AppResult<Option<AccessRequest>> {
        let requests = self.requests.read().await;
        Ok(requests
            .values()
            .find(|r| r.active && r.student_id == student_id && r.instructor_id == instructor_id)
            .cloned())
    }

    async fn exists_with_status(
        &self,
        student_id: &str,
        instructor_id: &str,
        status: AccessRequestStatus,
    ) -> AppResult<bool> {
        let requests = self.requests.read().await;
        Ok(requests.values().any(|r| {
            r.student_id == student_id && r.instructor_id == instructor_id && r.status == status
        }))
    }

    async fn instructor_ids_with_status(
        &self,
        student_id: &str,
        status: AccessRequestStatus,
    ) -> AppResult<Vec<String>> {
        let requests = self.requests.read().await;
        let mut ids: Vec<String> = requests
            .values()
            .filter(|r| r.student_id == student_id && r.status == status)
            .map(|r| r.instructor_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn replace_if_pending(&self, updated: AccessRequest) -> AppResult<Option<AccessRequest>> {
        let mut requests = self.requests.write().await;
        match requests.get_mut(&updated.id) {
            Some(current) if current.is_pending() => {
                *current = updated.clone();
                Ok(Some(updated))
            }
            _ => Ok(None),
        }
    }

    async fn delete_if_pending(&self, id: &str) -> AppResult<bool> {
        let mut requests = self.requests.write().await;
        if requests.get(id).is_some_and(|r| r.is_pending()) {
            requests.remove(id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn list_by_instructor(&self, instructor_id: &str) -> AppResult<Vec<AccessRequest>> {
        let requests = self.requests.read().await;
        Ok(newest_first(
            requests
                .values()
                .filter(|r| r.instructor_id == instructor_id)
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<AccessRequest>> {
        let requests = self.requests.read().await;
        Ok(newest_first(
            requests
                .values()
                .filter(|r| r.student_id == student_id)
                .cloned()
                .collect(),
        ))
    }
}

pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self {
            quizzes: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.contains_key(&quiz.id) {
            return Err(AppError::StorageError(format!(
                "Quiz with id '{}' already exists",
                quiz.id
            )));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.get(id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        let mut items: Vec<Quiz> = quizzes.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn list_by_instructors(&self, instructor_ids: &[String]) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        let mut items: Vec<Quiz> = quizzes
            .values()
            .filter(|q| instructor_ids.contains(&q.instructor_id))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn update_definition(&self, quiz: Quiz, expected_version: i64) -> AppResult<bool> {
        let mut quizzes = self.quizzes.write().await;
        let Some(current) = quizzes.get_mut(&quiz.id) else {
            return Ok(false);
        };
        if current.version != expected_version {
            return Ok(false);
        }
        current.title = quiz.title;
        current.description = quiz.description;
        current.questions = quiz.questions;
        current.settings = quiz.settings;
        current.tags = quiz.tags;
        current.difficulty = quiz.difficulty;
        current.is_active = quiz.is_active;
        current.modified_at = Some(Utc::now());
        current.version += 1;
        Ok(true)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        Ok(self.quizzes.write().await.remove(id).is_some())
    }

    async fn append_submission(
        &self,
        quiz_id: &str,
        expected_version: i64,
        expected_attempts: u32,
        submission: Submission,
    ) -> AppResult<bool> {
        let mut quizzes = self.quizzes.write().await;
        let Some(quiz) = quizzes.get_mut(quiz_id) else {
            return Ok(false);
        };
        if quiz.version != expected_version
            || quiz.attempts_by(&submission.student_id) != expected_attempts
        {
            return Ok(false);
        }
        for assignment in quiz
            .assigned_to
            .iter_mut()
            .filter(|a| a.student_id == submission.student_id)
        {
            assignment.completed = true;
        }
        quiz.submissions.push(submission);
        Ok(true)
    }

    async fn upsert_assignment(&self, quiz_id: &str, assignment: Assignment) -> AppResult<bool> {
        let mut quizzes = self.quizzes.write().await;
        let Some(quiz) = quizzes.get_mut(quiz_id) else {
            return Ok(false);
        };
        match quiz
            .assigned_to
            .iter_mut()
            .find(|a| a.student_id == assignment.student_id)
        {
            Some(existing) => {
                existing.due_date = assignment.due_date;
                existing.assigned_at = assignment.assigned_at;
            }
            None => quiz.assigned_to.push(assignment),
        }
        Ok(true)
    }
}

pub struct InMemoryContentRepository {
    items: Arc<RwLock<HashMap<String, ContentItem>>>,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn create(&self, item: ContentItem) -> AppResult<ContentItem> {
        self.items
            .write()
            .await
            .insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<ContentItem>> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<ContentItem>> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn list_by_instructors(&self, instructor_ids: &[String]) -> AppResult<Vec<ContentItem>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|item| instructor_ids.contains(&item.instructor_id))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        Ok(self.items.write().await.remove(id).is_some())
    }
}

pub fn test_config() -> Config {
    Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "edulink-test".to_string(),
        web_server_host: "localhost".to_string(),
        web_server_port: 8080,
        jwt_secret: SecretString::from("integration-test-secret-value-0123456789"),
        jwt_expiration_hours: 1,
        cors_allowed_origin: "http://localhost:3000".to_string(),
        app_env: "test".to_string(),
    }
}

/// An application wired to in-memory storage, plus handles to seed it.
pub struct TestApp {
    pub state: AppState,
    pub users: Arc<InMemoryUserRepository>,
    pub quizzes: Arc<InMemoryQuizRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        let repositories = Repositories {
            users: users.clone(),
            access_requests: Arc::new(InMemoryAccessRequestRepository::new()),
            quizzes: quizzes.clone(),
            contents: Arc::new(InMemoryContentRepository::new()),
        };
        Self {
            state: AppState::from_repositories(test_config(), repositories),
            users,
            quizzes,
        }
    }

    pub async fn user(&self, id: &str, role: UserRole) -> User {
        let mut user = User::new(id, &format!("{}@example.com", id), role);
        user.id = id.to_string();
        self.users.create(user).await.expect("seed user")
    }

    /// Runs the request/accept flow between two seeded accounts.
    pub async fn connect(&self, student_id: &str, instructor_id: &str) {
        use edulink_server::models::{
            domain::Decision,
            dto::request::{CreateAccessRequestInput, DecideAccessRequestInput},
        };

        let request = self
            .state
            .access_service
            .create_request(
                &Caller::student(student_id),
                CreateAccessRequestInput {
                    instructor_id: instructor_id.to_string(),
                    message: None,
                },
            )
            .await
            .expect("create request");
        self.state
            .access_service
            .decide(
                &Caller::instructor(instructor_id),
                &request.id,
                DecideAccessRequestInput {
                    decision: Decision::Accept,
                    reason: None,
                },
            )
            .await
            .expect("accept request");
    }

    pub async fn seed_quiz(&self, quiz: Quiz) -> Quiz {
        self.quizzes.create(quiz).await.expect("seed quiz")
    }
}

/// Two one-point questions whose answers are `B` and `true`.
pub fn two_question_quiz(instructor_id: &str, settings: QuizSettings) -> Quiz {
    let choice = Question {
        id: "q-choice".to_string(),
        text: "Which letter?".to_string(),
        question_type: QuestionType::MultipleChoice,
        options: ["A", "B", "C"]
            .iter()
            .map(|text| QuestionOption {
                text: text.to_string(),
                is_correct: *text == "B",
            })
            .collect(),
        correct_answer: None,
        points: 1,
        explanation: None,
    };
    let truth = Question {
        id: "q-truth".to_string(),
        text: "Is water wet?".to_string(),
        question_type: QuestionType::TrueFalse,
        options: vec![],
        correct_answer: Some("true".to_string()),
        points: 1,
        explanation: None,
    };
    Quiz::new(instructor_id, "Basics", "", vec![choice, truth], settings)
}
