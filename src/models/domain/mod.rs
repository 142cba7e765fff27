pub mod access_request;
pub mod content;
pub mod progress;
pub mod question;
pub mod quiz;
pub mod submission;
pub mod user;
pub use access_request::{AccessRequest, AccessRequestStatus, Decision};
pub use content::ContentItem;
pub use progress::{ProgressRecord, ProgressStatus, StudentProgress, StudentStats};
pub use question::{Question, QuestionOption, QuestionType};
pub use quiz::{Assignment, Quiz, QuizSettings};
pub use submission::{AnswerRecord, Submission};
pub use user::{Caller, User, UserRole};
