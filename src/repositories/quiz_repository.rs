use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson},
    options::{IndexOptions, UpdateOptions},
    Collection, IndexModel,
};

use crate::{
    db::{Database, QUIZZES_COLLECTION},
    errors::AppResult,
    models::domain::{Assignment, Quiz, Submission},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>>;
    async fn list_all(&self) -> AppResult<Vec<Quiz>>;
    async fn list_by_instructors(&self, instructor_ids: &[String]) -> AppResult<Vec<Quiz>>;
    /// Writes the editable fields of `quiz` and bumps its version, only if the
    /// stored version still equals `expected_version`.
    async fn update_definition(&self, quiz: Quiz, expected_version: i64) -> AppResult<bool>;
    async fn delete(&self, id: &str) -> AppResult<bool>;
    /// Appends `submission` in one conditional write. Succeeds only while the
    /// quiz is at `expected_version` and the student has exactly
    /// `expected_attempts` stored submissions. Also marks the student's
    /// assignment completed.
    async fn append_submission(
        &self,
        quiz_id: &str,
        expected_version: i64,
        expected_attempts: u32,
        submission: Submission,
    ) -> AppResult<bool>;
    /// Adds the assignment, or refreshes the due date of an existing one.
    async fn upsert_assignment(&self, quiz_id: &str, assignment: Assignment) -> AppResult<bool>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(QUIZZES_COLLECTION);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let instructor_index = IndexModel::builder()
            .keys(doc! { "instructor_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("instructor_id".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(instructor_index).await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }
}

fn newest_first(mut quizzes: Vec<Quiz>) -> Vec<Quiz> {
    quizzes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    quizzes
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quiz = self.collection.find_one(doc! { "id": id }).await?;
        Ok(quiz)
    }

    async fn list_all(&self) -> AppResult<Vec<Quiz>> {
        let quizzes: Vec<Quiz> = self.collection.find(doc! {}).await?.try_collect().await?;
        Ok(newest_first(quizzes))
    }

    async fn list_by_instructors(&self, instructor_ids: &[String]) -> AppResult<Vec<Quiz>> {
        if instructor_ids.is_empty() {
            return Ok(Vec::new());
        }

        let quizzes: Vec<Quiz> = self
            .collection
            .find(doc! { "instructor_id": { "$in": instructor_ids.to_vec() } })
            .await?
            .try_collect()
            .await?;
        Ok(newest_first(quizzes))
    }

    async fn update_definition(&self, quiz: Quiz, expected_version: i64) -> AppResult<bool> {
        let update = doc! {
            "$set": {
                "title": quiz.title.as_str(),
                "description": quiz.description.as_str(),
                "questions": to_bson(&quiz.questions)?,
                "settings": to_bson(&quiz.settings)?,
                "tags": to_bson(&quiz.tags)?,
                "difficulty": to_bson(&quiz.difficulty)?,
                "is_active": quiz.is_active,
                "modified_at": to_bson(&Utc::now())?,
            },
            "$inc": { "version": 1_i64 },
        };

        let result = self
            .collection
            .update_one(
                doc! { "id": quiz.id.as_str(), "version": expected_version },
                update,
            )
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count == 1)
    }

    async fn append_submission(
        &self,
        quiz_id: &str,
        expected_version: i64,
        expected_attempts: u32,
        submission: Submission,
    ) -> AppResult<bool> {
        let student_id = submission.student_id.as_str();
        let expected_attempts = i64::from(expected_attempts);

        let filter = doc! {
            "id": quiz_id,
            "version": expected_version,
            "$expr": {
                "$eq": [
                    {
                        "$size": {
                            "$filter": {
                                "input": { "$ifNull": ["$submissions", []] },
                                "as": "s",
                                "cond": { "$eq": ["$$s.student_id", student_id] },
                            }
                        }
                    },
                    expected_attempts,
                ]
            },
        };

        let update = doc! {
            "$push": { "submissions": to_bson(&submission)? },
            "$set": { "assigned_to.$[a].completed": true },
        };

        let options = UpdateOptions::builder()
            .array_filters(vec![doc! { "a.student_id": student_id }])
            .build();

        let result = self
            .collection
            .update_one(filter, update)
            .with_options(options)
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn upsert_assignment(&self, quiz_id: &str, assignment: Assignment) -> AppResult<bool> {
        let student_id = assignment.student_id.as_str();

        let refreshed = self
            .collection
            .update_one(
                doc! { "id": quiz_id, "assigned_to.student_id": student_id },
                doc! {
                    "$set": {
                        "assigned_to.$.due_date": to_bson(&assignment.due_date)?,
                        "assigned_to.$.assigned_at": to_bson(&assignment.assigned_at)?,
                    }
                },
            )
            .await?;
        if refreshed.matched_count == 1 {
            return Ok(true);
        }

        let added = self
            .collection
            .update_one(
                doc! { "id": quiz_id, "assigned_to.student_id": { "$ne": student_id } },
                doc! { "$push": { "assigned_to": to_bson(&assignment)? } },
            )
            .await?;
        Ok(added.matched_count == 1)
    }
}
