use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        AccessRequestRepository, ContentRepository, MongoAccessRequestRepository,
        MongoContentRepository, MongoQuizRepository, MongoUserRepository, QuizRepository,
        UserRepository,
    },
    services::{AccessService, ContentService, ProgressService, QuizService, SubmissionService},
};

/// Storage backends the services are built on.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub access_requests: Arc<dyn AccessRequestRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
    pub contents: Arc<dyn ContentRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub access_service: Arc<AccessService>,
    pub quiz_service: Arc<QuizService>,
    pub submission_service: Arc<SubmissionService>,
    pub progress_service: Arc<ProgressService>,
    pub content_service: Arc<ContentService>,
    pub jwt_service: Arc<JwtService>,
    pub config: Arc<Config>,
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;

        let access_request_repository = Arc::new(MongoAccessRequestRepository::new(&db));
        access_request_repository.ensure_indexes().await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        let content_repository = Arc::new(MongoContentRepository::new(&db));
        content_repository.ensure_indexes().await?;

        let repositories = Repositories {
            users: user_repository,
            access_requests: access_request_repository,
            quizzes: quiz_repository,
            contents: content_repository,
        };

        let mut state = Self::from_repositories(config, repositories);
        state.db = Some(db);
        Ok(state)
    }

    pub fn from_repositories(config: Config, repositories: Repositories) -> Self {
        let access_service = Arc::new(AccessService::new(
            repositories.access_requests,
            repositories.users.clone(),
        ));
        let quiz_service = Arc::new(QuizService::new(
            repositories.quizzes.clone(),
            repositories.users,
            access_service.clone(),
        ));
        let submission_service = Arc::new(SubmissionService::new(
            repositories.quizzes.clone(),
            access_service.clone(),
        ));
        let progress_service = Arc::new(ProgressService::new(
            repositories.quizzes,
            access_service.clone(),
        ));
        let content_service = Arc::new(ContentService::new(
            repositories.contents,
            access_service.clone(),
        ));
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));

        Self {
            access_service,
            quiz_service,
            submission_service,
            progress_service,
            content_service,
            jwt_service,
            config: Arc::new(config),
            db: None,
        }
    }
}
