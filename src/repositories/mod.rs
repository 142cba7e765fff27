pub mod access_request_repository;
pub mod content_repository;
pub mod quiz_repository;
pub mod user_repository;

pub use access_request_repository::{AccessRequestRepository, MongoAccessRequestRepository};
pub use content_repository::{ContentRepository, MongoContentRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
