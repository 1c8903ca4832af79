use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::BoardId;
use crate::task::Task;

pub type ColumnId = i64;

/// A list (Kanban lane). Stored in the `lists` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    #[serde(rename = "list_name")]
    pub name: String,
    pub board_id: BoardId,
    pub created_at: DateTime<Utc>,
}

impl Column {
    pub fn new(id: ColumnId, board_id: BoardId, name: String) -> Self {
        Self {
            id,
            name,
            board_id,
            created_at: Utc::now(),
        }
    }
}

/// A column row with its tasks embedded, as returned by the nested read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnWithTasks {
    #[serde(flatten)]
    pub column: Column,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl ColumnWithTasks {
    pub fn new(column: Column, tasks: Vec<Task>) -> Self {
        Self { column, tasks }
    }
}
