//! In-memory gateway for interleaving tests.
//!
//! Every call is answered from the in-memory rows unless a gate was queued
//! for it, in which case the call waits for the test to release the gate.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tasky_core::{TaskyError, TaskyResult};
use tokio::sync::oneshot;

use crate::gateway::RemoteGateway;
use crate::{Board, BoardId, Column, ColumnId, ColumnWithTasks, Profile, Task, TaskId};

type Gate<T> = oneshot::Receiver<TaskyResult<T>>;

#[derive(Default)]
pub(crate) struct ScriptedGateway {
    board: Mutex<Option<Board>>,
    columns: Mutex<Vec<Column>>,
    tasks: Mutex<Vec<Task>>,
    next_id: AtomicUsize,
    load_gates: Mutex<VecDeque<Gate<Vec<ColumnWithTasks>>>>,
    move_gates: Mutex<VecDeque<Gate<Task>>>,
    fail_moves: Mutex<Option<String>>,
    fail_deletes: Mutex<Option<String>>,
    pub fetch_calls: AtomicUsize,
    pub move_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(100),
            ..Default::default()
        }
    }

    pub fn with_board(self, board: Board) -> Self {
        *self.board.lock() = Some(board);
        self
    }

    pub fn with_column(self, column: Column) -> Self {
        self.columns.lock().push(column);
        self
    }

    pub fn with_task(self, task: Task) -> Self {
        self.tasks.lock().push(task);
        self
    }

    /// Hold the next `fetch_columns` call until the returned sender fires.
    pub fn gate_load(&self) -> oneshot::Sender<TaskyResult<Vec<ColumnWithTasks>>> {
        let (tx, rx) = oneshot::channel();
        self.load_gates.lock().push_back(rx);
        tx
    }

    /// Hold the next `move_task` call until the returned sender fires.
    pub fn gate_move(&self) -> oneshot::Sender<TaskyResult<Task>> {
        let (tx, rx) = oneshot::channel();
        self.move_gates.lock().push_back(rx);
        tx
    }

    pub fn fail_moves(&self, message: &str) {
        *self.fail_moves.lock() = Some(message.to_string());
    }

    pub fn fail_deletes(&self, message: Option<&str>) {
        *self.fail_deletes.lock() = message.map(str::to_string);
    }

    pub fn rows(&self) -> Vec<ColumnWithTasks> {
        let tasks = self.tasks.lock();
        self.columns
            .lock()
            .iter()
            .map(|c| {
                ColumnWithTasks::new(
                    c.clone(),
                    tasks.iter().filter(|t| t.column_id == c.id).cloned().collect(),
                )
            })
            .collect()
    }

    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.tasks.lock().iter().find(|t| t.id == id).cloned()
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) as i64
    }
}

async fn wait<T>(gate: Option<Gate<T>>) -> Option<TaskyResult<T>> {
    match gate {
        Some(rx) => Some(
            rx.await
                .unwrap_or_else(|_| Err(TaskyError::Internal("gate dropped".into()))),
        ),
        None => None,
    }
}

#[async_trait]
impl RemoteGateway for ScriptedGateway {
    async fn fetch_columns(
        &self,
        _board_id: BoardId,
        _with_tasks: bool,
    ) -> TaskyResult<Vec<ColumnWithTasks>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.load_gates.lock().pop_front();
        match wait(gate).await {
            Some(result) => result,
            None => Ok(self.rows()),
        }
    }

    async fn fetch_board(&self, _board_id: BoardId) -> Option<Board> {
        self.board.lock().clone()
    }

    async fn list_boards(&self, _limit: usize, _offset: usize) -> TaskyResult<Vec<Board>> {
        Ok(self.board.lock().iter().cloned().collect())
    }

    async fn create_board(
        &self,
        title: String,
        description: Option<String>,
    ) -> TaskyResult<Board> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let board = Board::new(self.next_id(), title, description, uuid::Uuid::nil());
        *self.board.lock() = Some(board.clone());
        Ok(board)
    }

    async fn delete_board(&self, _board_id: BoardId) -> TaskyResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        *self.board.lock() = None;
        Ok(())
    }

    async fn create_column(&self, board_id: BoardId, name: String) -> TaskyResult<Column> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let column = Column::new(self.next_id(), board_id, name);
        self.columns.lock().push(column.clone());
        Ok(column)
    }

    async fn rename_column(&self, column_id: ColumnId, name: String) -> TaskyResult<Column> {
        let mut columns = self.columns.lock();
        let column = columns
            .iter_mut()
            .find(|c| c.id == column_id)
            .ok_or_else(|| TaskyError::NotFound(format!("list {column_id}")))?;
        column.name = name;
        Ok(column.clone())
    }

    async fn delete_column(&self, column_id: ColumnId) -> TaskyResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.fail_deletes.lock().clone() {
            return Err(TaskyError::Remote(message));
        }
        self.columns.lock().retain(|c| c.id != column_id);
        self.tasks.lock().retain(|t| t.column_id != column_id);
        Ok(())
    }

    async fn create_task(
        &self,
        column_id: ColumnId,
        title: String,
        content: Option<String>,
    ) -> TaskyResult<Task> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let task = Task::new(self.next_id(), column_id, title, content);
        self.tasks.lock().push(task.clone());
        Ok(task)
    }

    async fn move_task(&self, task_id: TaskId, column_id: ColumnId) -> TaskyResult<Task> {
        self.move_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.move_gates.lock().pop_front();
        if let Some(result) = wait(gate).await {
            return result;
        }
        if let Some(message) = self.fail_moves.lock().clone() {
            return Err(TaskyError::Remote(message));
        }
        let mut tasks = self.tasks.lock();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| TaskyError::NotFound(format!("task {task_id}")))?;
        task.column_id = column_id;
        Ok(task.clone())
    }

    async fn delete_task(&self, task_id: TaskId) -> TaskyResult<Task> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.fail_deletes.lock().clone() {
            return Err(TaskyError::Remote(message));
        }
        let mut tasks = self.tasks.lock();
        let index = tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or_else(|| TaskyError::NotFound(format!("task {task_id}")))?;
        Ok(tasks.remove(index))
    }

    async fn current_profile(&self) -> TaskyResult<Option<Profile>> {
        Ok(None)
    }
}
