use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    Document,
    Note,
    Audio,
    Image,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Enum)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    Lesson,
    Assignment,
    #[default]
    Resource,
    Announcement,
}

/// Catalogue entry for a learning resource. The file itself lives in external storage.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct ContentItem {
    pub id: String,
    pub instructor_id: String,
    pub title: String,
    pub description: String,
    pub content_type: ContentType,
    pub file_url: String,
    pub file_name: String,
    pub file_size: u32,
    pub mime_type: String,
    #[serde(default)]
    pub category: ContentCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl ContentItem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        instructor_id: &str,
        title: &str,
        description: &str,
        content_type: ContentType,
        file_url: &str,
        file_name: &str,
        file_size: u32,
        mime_type: &str,
    ) -> Self {
        ContentItem {
            id: Uuid::new_v4().to_string(),
            instructor_id: instructor_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            content_type,
            file_url: file_url.to_string(),
            file_name: file_name.to_string(),
            file_size,
            mime_type: mime_type.to_string(),
            category: ContentCategory::default(),
            tags: Vec::new(),
            is_active: true,
            created_at: Some(Utc::now()),
        }
    }
}
