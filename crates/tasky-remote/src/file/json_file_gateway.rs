use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasky_core::{TaskyError, TaskyResult};
use tasky_domain::validation::{required_text, LIST_NAME_REQUIRED, TASK_TITLE_REQUIRED};
use tasky_domain::{
    Board, BoardId, Column, ColumnId, ColumnWithTasks, Profile, RemoteGateway, Task, TaskId,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::atomic_writer::AtomicWriter;

const FORMAT_VERSION: u32 = 1;
const LOCAL_USER_NAME: &str = "Local user";

/// Rows kept in the file, mirroring the hosted tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FileData {
    #[serde(default)]
    owner: Option<Profile>,
    #[serde(default)]
    boards: Vec<Board>,
    #[serde(default)]
    lists: Vec<Column>,
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    last_id: i64,
}

impl FileData {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn owner(&mut self) -> Profile {
        self.owner
            .get_or_insert_with(|| Profile {
                id: Uuid::new_v4(),
                full_name: LOCAL_USER_NAME.to_string(),
                avatar_url: None,
            })
            .clone()
    }

    fn require_board(&self, board_id: BoardId) -> TaskyResult<()> {
        if self.boards.iter().any(|b| b.id == board_id) {
            Ok(())
        } else {
            Err(TaskyError::NotFound(format!("Board {board_id} not found")))
        }
    }

    fn require_list(&self, column_id: ColumnId) -> TaskyResult<()> {
        if self.lists.iter().any(|c| c.id == column_id) {
            Ok(())
        } else {
            Err(TaskyError::NotFound(format!("List {column_id} not found")))
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FileMetadata {
    instance_id: Uuid,
    saved_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FileEnvelope {
    version: u32,
    metadata: FileMetadata,
    data: FileData,
}

/// Single-file backend with the same row model as the hosted store.
///
/// The file owns one local user, created on first write. Deleting a board
/// removes its lists and their tasks; deleting a list removes its tasks.
#[derive(Debug)]
pub struct JsonFileGateway {
    path: PathBuf,
    instance_id: Uuid,
    lock: Mutex<()>,
}

impl JsonFileGateway {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            instance_id: Uuid::new_v4(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    async fn read(&self) -> TaskyResult<FileData> {
        let Some(bytes) = AtomicWriter::read_if_exists(&self.path).await? else {
            return Ok(FileData::default());
        };
        let envelope: FileEnvelope = serde_json::from_slice(&bytes)
            .map_err(|e| TaskyError::Serialization(e.to_string()))?;
        if envelope.version != FORMAT_VERSION {
            return Err(TaskyError::Serialization(format!(
                "Unsupported format version: {}",
                envelope.version
            )));
        }
        Ok(envelope.data)
    }

    async fn write(&self, data: FileData) -> TaskyResult<()> {
        let envelope = FileEnvelope {
            version: FORMAT_VERSION,
            metadata: FileMetadata {
                instance_id: self.instance_id,
                saved_at: Utc::now(),
            },
            data,
        };
        let bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| TaskyError::Serialization(e.to_string()))?;
        AtomicWriter::write_atomic(&self.path, &bytes).await
    }

    async fn query<R>(&self, f: impl FnOnce(&FileData) -> R) -> TaskyResult<R> {
        let _guard = self.lock.lock().await;
        let data = self.read().await?;
        Ok(f(&data))
    }

    /// Read-modify-write under the gateway lock. Nothing is written when `f` fails.
    async fn mutate<R>(&self, f: impl FnOnce(&mut FileData) -> TaskyResult<R>) -> TaskyResult<R> {
        let _guard = self.lock.lock().await;
        let mut data = self.read().await?;
        let result = f(&mut data)?;
        self.write(data).await?;
        Ok(result)
    }
}

#[async_trait]
impl RemoteGateway for JsonFileGateway {
    async fn fetch_columns(
        &self,
        board_id: BoardId,
        with_tasks: bool,
    ) -> TaskyResult<Vec<ColumnWithTasks>> {
        self.query(|data| {
            let mut lists: Vec<&Column> =
                data.lists.iter().filter(|c| c.board_id == board_id).collect();
            lists.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
            lists
                .into_iter()
                .map(|column| {
                    let tasks = if with_tasks {
                        data.tasks
                            .iter()
                            .filter(|t| t.column_id == column.id)
                            .cloned()
                            .collect()
                    } else {
                        Vec::new()
                    };
                    ColumnWithTasks::new(column.clone(), tasks)
                })
                .collect()
        })
        .await
    }

    async fn fetch_board(&self, board_id: BoardId) -> Option<Board> {
        match self
            .query(|data| data.boards.iter().find(|b| b.id == board_id).cloned())
            .await
        {
            Ok(board) => board,
            Err(e) => {
                tracing::warn!("Board {} metadata unavailable: {}", board_id, e);
                None
            }
        }
    }

    async fn list_boards(&self, limit: usize, offset: usize) -> TaskyResult<Vec<Board>> {
        self.query(|data| {
            let mut boards = data.boards.clone();
            boards.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            boards.into_iter().skip(offset).take(limit).collect()
        })
        .await
    }

    async fn create_board(
        &self,
        title: String,
        description: Option<String>,
    ) -> TaskyResult<Board> {
        let board = self
            .mutate(|data| {
                let owner = data.owner();
                let board = Board::new(data.next_id(), title, description, owner.id);
                data.boards.push(board.clone());
                Ok(board)
            })
            .await?;
        tracing::info!("Created board {} in {}", board.id, self.path.display());
        Ok(board)
    }

    async fn delete_board(&self, board_id: BoardId) -> TaskyResult<()> {
        self.mutate(|data| {
            data.require_board(board_id)?;
            let lists: Vec<ColumnId> = data
                .lists
                .iter()
                .filter(|c| c.board_id == board_id)
                .map(|c| c.id)
                .collect();
            data.tasks.retain(|t| !lists.contains(&t.column_id));
            data.lists.retain(|c| c.board_id != board_id);
            data.boards.retain(|b| b.id != board_id);
            Ok(())
        })
        .await
    }

    async fn create_column(&self, board_id: BoardId, name: String) -> TaskyResult<Column> {
        let name = required_text(&name, LIST_NAME_REQUIRED)?;
        self.mutate(|data| {
            data.require_board(board_id)?;
            let column = Column::new(data.next_id(), board_id, name);
            data.lists.push(column.clone());
            Ok(column)
        })
        .await
    }

    async fn rename_column(&self, column_id: ColumnId, name: String) -> TaskyResult<Column> {
        let name = required_text(&name, LIST_NAME_REQUIRED)?;
        self.mutate(|data| {
            let column = data
                .lists
                .iter_mut()
                .find(|c| c.id == column_id)
                .ok_or_else(|| TaskyError::NotFound(format!("List {column_id} not found")))?;
            column.name = name;
            Ok(column.clone())
        })
        .await
    }

    async fn delete_column(&self, column_id: ColumnId) -> TaskyResult<()> {
        self.mutate(|data| {
            data.require_list(column_id)?;
            data.tasks.retain(|t| t.column_id != column_id);
            data.lists.retain(|c| c.id != column_id);
            Ok(())
        })
        .await
    }

    async fn create_task(
        &self,
        column_id: ColumnId,
        title: String,
        content: Option<String>,
    ) -> TaskyResult<Task> {
        let title = required_text(&title, TASK_TITLE_REQUIRED)?;
        self.mutate(|data| {
            data.require_list(column_id)?;
            let task = Task::new(data.next_id(), column_id, title, content);
            data.tasks.push(task.clone());
            Ok(task)
        })
        .await
    }

    async fn move_task(&self, task_id: TaskId, column_id: ColumnId) -> TaskyResult<Task> {
        self.mutate(|data| {
            data.require_list(column_id)?;
            let task = data
                .tasks
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or_else(|| TaskyError::NotFound(format!("Task {task_id} not found")))?;
            task.column_id = column_id;
            Ok(task.clone())
        })
        .await
    }

    async fn delete_task(&self, task_id: TaskId) -> TaskyResult<Task> {
        if task_id <= 0 {
            return Err(TaskyError::Validation("Invalid task id".into()));
        }
        self.mutate(|data| {
            let index = data
                .tasks
                .iter()
                .position(|t| t.id == task_id)
                .ok_or_else(|| TaskyError::NotFound(format!("Task {task_id} not found")))?;
            Ok(data.tasks.remove(index))
        })
        .await
    }

    async fn current_profile(&self) -> TaskyResult<Option<Profile>> {
        self.mutate(|data| Ok(Some(data.owner()))).await
    }
}
