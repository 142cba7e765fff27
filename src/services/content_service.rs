use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::require_role,
    errors::{AppError, AppResult},
    models::{
        domain::{Caller, ContentItem, UserRole},
        dto::request::CreateContentInput,
    },
    repositories::ContentRepository,
    services::access_service::AccessService,
};

/// Learning material metadata. Files live with the storage collaborator.
pub struct ContentService {
    repository: Arc<dyn ContentRepository>,
    access: Arc<AccessService>,
}

impl ContentService {
    pub fn new(repository: Arc<dyn ContentRepository>, access: Arc<AccessService>) -> Self {
        Self { repository, access }
    }

    pub async fn create_content(
        &self,
        caller: &Caller,
        input: CreateContentInput,
    ) -> AppResult<ContentItem> {
        require_role(caller, UserRole::Instructor)?;
        input.validate()?;

        let mut item = ContentItem::new(
            &caller.user_id,
            &input.title,
            &input.description,
            input.content_type,
            &input.file_url,
            &input.file_name,
            input.file_size,
            &input.mime_type,
        );
        if let Some(category) = input.category {
            item.category = category;
        }
        item.tags = input.tags;

        let created = self.repository.create(item).await?;
        log::info!("Content {} published by {}", created.id, created.instructor_id);
        Ok(created)
    }

    pub async fn list_content_for(&self, caller: &Caller) -> AppResult<Vec<ContentItem>> {
        match caller.role {
            UserRole::Admin => self.repository.list_all().await,
            UserRole::Instructor => {
                self.repository
                    .list_by_instructors(std::slice::from_ref(&caller.user_id))
                    .await
            }
            UserRole::Student => {
                let instructors = self.access.authorized_instructor_ids(&caller.user_id).await?;
                let items = self.repository.list_by_instructors(&instructors).await?;
                Ok(items.into_iter().filter(|item| item.is_active).collect())
            }
        }
    }

    pub async fn get_content(&self, caller: &Caller, id: &str) -> AppResult<ContentItem> {
        let item = self.load(id).await?;

        if item.instructor_id == caller.user_id || caller.is_admin() {
            return Ok(item);
        }
        if caller.role == UserRole::Student
            && item.is_active
            && self
                .access
                .is_authorized(&caller.user_id, &item.instructor_id)
                .await?
        {
            return Ok(item);
        }

        Err(AppError::Forbidden(
            "You do not have access to this content".to_string(),
        ))
    }

    pub async fn delete_content(&self, caller: &Caller, id: &str) -> AppResult<()> {
        let item = self.load(id).await?;
        if item.instructor_id != caller.user_id {
            return Err(AppError::Forbidden(
                "Only the owner can delete this content".to_string(),
            ));
        }

        if !self.repository.delete(id).await? {
            return Err(not_found(id));
        }
        log::info!("Content {} deleted by {}", id, caller.user_id);
        Ok(())
    }

    async fn load(&self, id: &str) -> AppResult<ContentItem> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Content with id '{}' not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::content::ContentType;
    use crate::repositories::{
        access_request_repository::MockAccessRequestRepository,
        content_repository::MockContentRepository, user_repository::MockUserRepository,
    };

    fn item(owner: &str) -> ContentItem {
        ContentItem::new(
            owner,
            "Week 1 slides",
            "Introduction",
            ContentType::Document,
            "https://files.example.com/w1.pdf",
            "w1.pdf",
            2048,
            "application/pdf",
        )
    }

    fn service(
        contents: MockContentRepository,
        requests: MockAccessRequestRepository,
    ) -> ContentService {
        let access = AccessService::new(Arc::new(requests), Arc::new(MockUserRepository::new()));
        ContentService::new(Arc::new(contents), Arc::new(access))
    }

    #[tokio::test]
    async fn test_student_sees_only_authorized_instructors() {
        let mut requests = MockAccessRequestRepository::new();
        requests
            .expect_instructor_ids_with_status()
            .returning(|_, _| Ok(vec!["i-1".to_string()]));
        let mut contents = MockContentRepository::new();
        contents
            .expect_list_by_instructors()
            .withf(|ids| ids.len() == 1 && ids[0] == "i-1")
            .returning(|_| {
                let mut hidden = item("i-1");
                hidden.is_active = false;
                Ok(vec![item("i-1"), hidden])
            });

        let items = service(contents, requests)
            .list_content_for(&Caller::student("s-1"))
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_student_cannot_read() {
        let mut contents = MockContentRepository::new();
        contents
            .expect_find_by_id()
            .returning(|_| Ok(Some(item("i-1"))));
        let mut requests = MockAccessRequestRepository::new();
        requests
            .expect_exists_with_status()
            .returning(|_, _, _| Ok(false));

        let err = service(contents, requests)
            .get_content(&Caller::student("s-1"), "c-1")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_only_owner_deletes() {
        let mut contents = MockContentRepository::new();
        contents
            .expect_find_by_id()
            .returning(|_| Ok(Some(item("i-1"))));
        contents.expect_delete().never();

        let err = service(contents, MockAccessRequestRepository::new())
            .delete_content(&Caller::instructor("i-2"), "c-1")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
