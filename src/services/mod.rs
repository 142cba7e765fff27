pub mod access_service;
pub mod content_service;
pub mod progress_service;
pub mod quiz_service;
pub mod scoring;
pub mod submission_service;

pub use access_service::AccessService;
pub use content_service::ContentService;
pub use progress_service::ProgressService;
pub use quiz_service::QuizService;
pub use submission_service::SubmissionService;
