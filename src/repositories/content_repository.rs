use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{Database, CONTENTS_COLLECTION},
    errors::AppResult,
    models::domain::ContentItem,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn create(&self, item: ContentItem) -> AppResult<ContentItem>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<ContentItem>>;
    async fn list_all(&self) -> AppResult<Vec<ContentItem>>;
    async fn list_by_instructors(&self, instructor_ids: &[String]) -> AppResult<Vec<ContentItem>>;
    async fn delete(&self, id: &str) -> AppResult<bool>;
}

pub struct MongoContentRepository {
    collection: Collection<ContentItem>,
}

impl MongoContentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(CONTENTS_COLLECTION);
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for contents collection");

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
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(instructor_index).await?;

        log::info!("Successfully created indexes for contents collection");
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for MongoContentRepository {
    async fn create(&self, item: ContentItem) -> AppResult<ContentItem> {
        self.collection.insert_one(&item).await?;
        Ok(item)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<ContentItem>> {
        let item = self.collection.find_one(doc! { "id": id }).await?;
        Ok(item)
    }

    async fn list_all(&self) -> AppResult<Vec<ContentItem>> {
        let mut items: Vec<ContentItem> =
            self.collection.find(doc! {}).await?.try_collect().await?;
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn list_by_instructors(&self, instructor_ids: &[String]) -> AppResult<Vec<ContentItem>> {
        if instructor_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut items: Vec<ContentItem> = self
            .collection
            .find(doc! { "instructor_id": { "$in": instructor_ids.to_vec() } })
            .await?
            .try_collect()
            .await?;
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count == 1)
    }
}
