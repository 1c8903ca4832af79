use async_trait::async_trait;
use tasky_core::TaskyResult;

use crate::{Board, BoardId, ColumnId, Column, ColumnWithTasks, Profile, Task, TaskId};

pub const DEFAULT_BOARD_PAGE: usize = 20;

/// Row-level operations against the remote store.
///
/// Every method is exactly one round trip. Implementations handle different
/// backends (hosted PostgREST, local file, test doubles).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Columns of a board ordered by creation time, optionally with their tasks embedded.
    async fn fetch_columns(
        &self,
        board_id: BoardId,
        with_tasks: bool,
    ) -> TaskyResult<Vec<ColumnWithTasks>>;

    /// Board metadata. Failures are suppressed and reported as `None`.
    async fn fetch_board(&self, board_id: BoardId) -> Option<Board>;

    /// Boards of the signed-in user, newest first.
    async fn list_boards(&self, limit: usize, offset: usize) -> TaskyResult<Vec<Board>>;

    async fn create_board(&self, title: String, description: Option<String>)
        -> TaskyResult<Board>;

    async fn delete_board(&self, board_id: BoardId) -> TaskyResult<()>;

    async fn create_column(&self, board_id: BoardId, name: String) -> TaskyResult<Column>;

    async fn rename_column(&self, column_id: ColumnId, name: String) -> TaskyResult<Column>;

    async fn delete_column(&self, column_id: ColumnId) -> TaskyResult<()>;

    async fn create_task(
        &self,
        column_id: ColumnId,
        title: String,
        content: Option<String>,
    ) -> TaskyResult<Task>;

    /// Reassign a task's column and return the persisted row.
    async fn move_task(&self, task_id: TaskId, column_id: ColumnId) -> TaskyResult<Task>;

    /// Delete a task and return the removed row.
    async fn delete_task(&self, task_id: TaskId) -> TaskyResult<Task>;

    /// Profile of the active session, `None` when signed out.
    async fn current_profile(&self) -> TaskyResult<Option<Profile>>;
}
