use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::column::ColumnId;

pub type TaskId = i64;

pub const UNTITLED_TASK: &str = "(Untitled)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(rename = "list_id")]
    pub column_id: ColumnId,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(id: TaskId, column_id: ColumnId, title: String, content: Option<String>) -> Self {
        Self {
            id,
            title: Some(title),
            content,
            image_url: None,
            column_id,
            created_at: Utc::now(),
        }
    }

    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(UNTITLED_TASK)
    }

    pub fn moved_to(&self, column_id: ColumnId) -> Self {
        Self {
            column_id,
            ..self.clone()
        }
    }
}
