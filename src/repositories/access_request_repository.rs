use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson},
    options::{FindOneAndReplaceOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::{Database, ACCESS_REQUESTS_COLLECTION},
    errors::{is_duplicate_key, AppError, AppResult},
    models::domain::{AccessRequest, AccessRequestStatus},
};

/// Store of student -> instructor access requests.
///
/// The store itself guarantees at most one active (pending or accepted)
/// request per pair; `create` reports a violation as `DuplicateRequest`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessRequestRepository: Send + Sync {
    async fn create(&self, request: AccessRequest) -> AppResult<AccessRequest>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<AccessRequest>>;
    async fn find_active_for_pair(
        &self,
        student_id: &str,
        instructor_id: &str,
    ) -> AppResult<Option<AccessRequest>>;
    async fn exists_with_status(
        &self,
        student_id: &str,
        instructor_id: &str,
        status: AccessRequestStatus,
    ) -> AppResult<bool>;
    async fn instructor_ids_with_status(
        &self,
        student_id: &str,
        status: AccessRequestStatus,
    ) -> AppResult<Vec<String>>;
    /// Replaces the stored request only while it is still pending.
    /// Returns `None` when the request is missing or no longer pending.
    async fn replace_if_pending(&self, updated: AccessRequest) -> AppResult<Option<AccessRequest>>;
    async fn delete_if_pending(&self, id: &str) -> AppResult<bool>;
    async fn list_by_instructor(&self, instructor_id: &str) -> AppResult<Vec<AccessRequest>>;
    async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<AccessRequest>>;
}

pub struct MongoAccessRequestRepository {
    collection: Collection<AccessRequest>,
}

impl MongoAccessRequestRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(ACCESS_REQUESTS_COLLECTION);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for access_requests collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let active_pair_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "instructor_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(doc! { "active": true })
                    .name("active_pair_unique".to_string())
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
        self.collection.create_index(active_pair_index).await?;
        self.collection.create_index(instructor_index).await?;

        log::info!("Successfully created indexes for access_requests collection");
        Ok(())
    }
}

fn newest_first(mut requests: Vec<AccessRequest>) -> Vec<AccessRequest> {
    requests.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
    requests
}

#[async_trait]
impl AccessRequestRepository for MongoAccessRequestRepository {
    async fn create(&self, request: AccessRequest) -> AppResult<AccessRequest> {
        self.collection.insert_one(&request).await.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::DuplicateRequest(format!(
                    "An active request from '{}' to '{}' already exists",
                    request.student_id, request.instructor_id
                ))
            } else {
                e.into()
            }
        })?;
        Ok(request)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<AccessRequest>> {
        let request = self.collection.find_one(doc! { "id": id }).await?;
        Ok(request)
    }

    async fn find_active_for_pair(
        &self,
        student_id: &str,
        instructor_id: &str,
    ) -> AppResult<Option<AccessRequest>> {
        let request = self
            .collection
            .find_one(doc! {
                "student_id": student_id,
                "instructor_id": instructor_id,
                "active": true,
            })
            .await?;
        Ok(request)
    }

    async fn exists_with_status(
        &self,
        student_id: &str,
        instructor_id: &str,
        status: AccessRequestStatus,
    ) -> AppResult<bool> {
        let count = self
            .collection
            .count_documents(doc! {
                "student_id": student_id,
                "instructor_id": instructor_id,
                "status": status.as_str(),
            })
            .await?;
        Ok(count > 0)
    }

    async fn instructor_ids_with_status(
        &self,
        student_id: &str,
        status: AccessRequestStatus,
    ) -> AppResult<Vec<String>> {
        let values = self
            .collection
            .distinct(
                "instructor_id",
                doc! { "student_id": student_id, "status": status.as_str() },
            )
            .await?;

        Ok(values
            .into_iter()
            .filter_map(|value| match value {
                Bson::String(id) => Some(id),
                _ => None,
            })
            .collect())
    }

    async fn replace_if_pending(&self, updated: AccessRequest) -> AppResult<Option<AccessRequest>> {
        let options = FindOneAndReplaceOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let request = self
            .collection
            .find_one_and_replace(
                doc! { "id": updated.id.as_str(), "status": AccessRequestStatus::Pending.as_str() },
                &updated,
            )
            .with_options(options)
            .await?;
        Ok(request)
    }

    async fn delete_if_pending(&self, id: &str) -> AppResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "id": id, "status": AccessRequestStatus::Pending.as_str() })
            .await?;
        Ok(result.deleted_count == 1)
    }

    async fn list_by_instructor(&self, instructor_id: &str) -> AppResult<Vec<AccessRequest>> {
        let requests: Vec<AccessRequest> = self
            .collection
            .find(doc! { "instructor_id": instructor_id })
            .await?
            .try_collect()
            .await?;
        Ok(newest_first(requests))
    }

    async fn list_by_student(&self, student_id: &str) -> AppResult<Vec<AccessRequest>> {
        let requests: Vec<AccessRequest> = self
            .collection
            .find(doc! { "student_id": student_id })
            .await?
            .try_collect()
            .await?;
        Ok(newest_first(requests))
    }
}
