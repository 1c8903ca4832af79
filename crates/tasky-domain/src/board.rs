use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::UserId;

pub type BoardId = i64;

pub const DEFAULT_BOARD_TITLE: &str = "My Board";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Board {
    pub fn new(id: BoardId, title: String, description: Option<String>, user_id: UserId) -> Self {
        Self {
            id,
            title,
            description,
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// Board ids come from a serial column; anything below 1 cannot exist.
pub fn is_valid_board_id(id: BoardId) -> bool {
    id > 0
}
