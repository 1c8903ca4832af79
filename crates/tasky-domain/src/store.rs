//! The board being viewed: loading, local mutations, drag-and-drop moves and
//! deletion confirmations, all reported through a [`Notifier`].

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join;
use parking_lot::Mutex;
use serde::Serialize;
use tasky_core::{Notification, Notifier, TaskyError, TaskyResult};

use crate::board_state::BoardState;
use crate::commands::{AddColumn, AddTask, RemoveColumn, RemoveTask, RenameColumn};
use crate::deletion::{
    list_deletion_prompt, task_deletion_prompt, DeletionFlow, DeletionOutcome, DeletionPhase,
};
use crate::drag::{
    column_first_collision, DragController, DragPhase, DropTarget, DropTargetId, Point, Rect,
};
use crate::gateway::RemoteGateway;
use crate::move_coordinator::{MoveCoordinator, MoveOutcome};
use crate::session::{SessionBus, SessionEvent, SubscriptionId};
use crate::validation::{optional_text, required_text, LIST_NAME_REQUIRED, TASK_TITLE_REQUIRED};
use crate::{is_valid_board_id, BoardId, Column, ColumnId, Task, TaskId};

pub const LOAD_FAILED: &str = "Failed to load board data";
pub const INVALID_BOARD: &str = "Invalid board id";
pub const DEFAULT_REFETCH_THROTTLE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadOutcome {
    Applied,
    /// A newer load was issued before this one resolved.
    Superseded,
    /// The store was unmounted before the load resolved.
    Detached,
    Failed { message: String },
    InvalidBoard,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnSnapshot {
    #[serde(flatten)]
    pub column: Column,
    pub count: usize,
    pub tasks: Vec<Task>,
}

/// Read-only copy of the board for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub board_id: BoardId,
    pub title: String,
    pub description: String,
    pub columns: Vec<ColumnSnapshot>,
}

pub struct BoardStore {
    board_id: BoardId,
    gateway: Arc<dyn RemoteGateway>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<BoardState>,
    loading: AtomicBool,
    latest_request: AtomicU64,
    mounted: AtomicBool,
    drag: Mutex<DragController>,
    moves: MoveCoordinator,
    list_deletion: Mutex<DeletionFlow<Column>>,
    task_deletion: Mutex<DeletionFlow<Task>>,
    refetch_throttle: Duration,
    last_focus_refetch: Mutex<Option<Instant>>,
}

impl BoardStore {
    pub fn new(
        board_id: BoardId,
        gateway: Arc<dyn RemoteGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            board_id,
            gateway,
            notifier,
            state: Mutex::new(BoardState::new()),
            loading: AtomicBool::new(false),
            latest_request: AtomicU64::new(0),
            mounted: AtomicBool::new(true),
            drag: Mutex::new(DragController::new()),
            moves: MoveCoordinator::new(),
            list_deletion: Mutex::new(DeletionFlow::new()),
            task_deletion: Mutex::new(DeletionFlow::new()),
            refetch_throttle: DEFAULT_REFETCH_THROTTLE,
            last_focus_refetch: Mutex::new(None),
        }
    }

    pub fn with_refetch_throttle(mut self, throttle: Duration) -> Self {
        self.refetch_throttle = throttle;
        self
    }

    pub fn board_id(&self) -> BoardId {
        self.board_id
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn title(&self) -> String {
        self.state.lock().title.clone()
    }

    pub fn description(&self) -> String {
        self.state.lock().description.clone()
    }

    pub fn columns(&self) -> Vec<Column> {
        self.state.lock().columns().to_vec()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks().to_vec()
    }

    pub fn task(&self, task_id: TaskId) -> Option<Task> {
        self.state.lock().find_task(task_id).cloned()
    }

    pub fn counts(&self) -> BTreeMap<ColumnId, usize> {
        self.state.lock().counts()
    }

    pub fn tasks_by_column(&self) -> BTreeMap<ColumnId, Vec<Task>> {
        self.state.lock().tasks_by_column()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let state = self.state.lock();
        let mut grouped = state.tasks_by_column();
        let columns = state
            .columns()
            .iter()
            .map(|column| {
                let tasks = grouped.remove(&column.id).unwrap_or_default();
                ColumnSnapshot {
                    column: column.clone(),
                    count: tasks.len(),
                    tasks,
                }
            })
            .collect();
        BoardSnapshot {
            board_id: self.board_id,
            title: state.title.clone(),
            description: state.description.clone(),
            columns,
        }
    }

    fn report(&self, error: &TaskyError, fallback: &str) -> String {
        let message = error.user_message(fallback);
        tracing::warn!("{}: {}", fallback, error);
        self.notifier.notify(Notification::error(message.clone()));
        message
    }

    // ----- loading -------------------------------------------------------

    /// Fetch columns (with nested tasks) and board metadata in parallel and
    /// replace the local board with the result.
    ///
    /// Only the most recently issued load applies its result.
    pub async fn load(&self) -> LoadOutcome {
        if !is_valid_board_id(self.board_id) {
            self.report(&TaskyError::Validation(INVALID_BOARD.into()), INVALID_BOARD);
            return LoadOutcome::InvalidBoard;
        }

        let token = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        self.loading.store(true, Ordering::SeqCst);
        tracing::debug!("Loading board {} (request {})", self.board_id, token);

        let (columns, board) = join(
            self.gateway.fetch_columns(self.board_id, true),
            self.gateway.fetch_board(self.board_id),
        )
        .await;

        if !self.is_mounted() {
            tracing::debug!("Discarding load {} of unmounted board {}", token, self.board_id);
            return LoadOutcome::Detached;
        }
        if self.latest_request.load(Ordering::SeqCst) != token {
            tracing::debug!("Discarding superseded load {} of board {}", token, self.board_id);
            return LoadOutcome::Superseded;
        }
        self.loading.store(false, Ordering::SeqCst);

        match columns {
            Ok(rows) => {
                self.state.lock().replace(rows, board);
                LoadOutcome::Applied
            }
            Err(e) => {
                self.state.lock().clear();
                let message = self.report(&e, LOAD_FAILED);
                LoadOutcome::Failed { message }
            }
        }
    }

    /// Detach the store; loads resolving afterwards are discarded.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        self.loading.store(false, Ordering::SeqCst);
    }

    /// Reload when the window regains focus, at most once per throttle window.
    pub async fn refetch_on_focus(&self) -> Option<LoadOutcome> {
        {
            let mut last = self.last_focus_refetch.lock();
            let now = Instant::now();
            if let Some(previous) = *last {
                if now.duration_since(previous) < self.refetch_throttle {
                    return None;
                }
            }
            *last = Some(now);
        }
        Some(self.load().await)
    }

    // ----- session -------------------------------------------------------

    pub async fn handle_session_event(&self, event: SessionEvent) -> Option<LoadOutcome> {
        match event {
            SessionEvent::SignedIn | SessionEvent::TokenRefreshed => Some(self.load().await),
            SessionEvent::SignedOut => {
                self.state.lock().clear();
                None
            }
            SessionEvent::UserUpdated => None,
        }
    }

    /// Follow session changes published on `bus`.
    ///
    /// Sign-out clears the board immediately; reloads are spawned on the
    /// current tokio runtime.
    pub fn attach_session(self: &Arc<Self>, bus: &SessionBus) -> SubscriptionId {
        let store = Arc::downgrade(self);
        bus.subscribe(move |event| {
            let Some(store) = store.upgrade() else {
                return;
            };
            match event {
                SessionEvent::SignedOut => store.state.lock().clear(),
                SessionEvent::SignedIn | SessionEvent::TokenRefreshed => {
                    match tokio::runtime::Handle::try_current() {
                        Ok(handle) => {
                            handle.spawn(async move {
                                store.load().await;
                            });
                        }
                        Err(_) => tracing::warn!(
                            "No runtime to reload board {} on {:?}",
                            store.board_id,
                            event
                        ),
                    }
                }
                SessionEvent::UserUpdated => {}
            }
        })
    }

    // ----- create / rename -----------------------------------------------

    pub async fn create_column(&self, name: &str) -> TaskyResult<Column> {
        let result = async {
            let name = required_text(name, LIST_NAME_REQUIRED)?;
            self.gateway.create_column(self.board_id, name).await
        }
        .await;

        match result {
            Ok(column) => {
                self.state.lock().execute(&AddColumn {
                    column: column.clone(),
                })?;
                tracing::info!("Created list {} ({})", column.id, column.name);
                self.notifier
                    .notify(Notification::success(format!("List “{}” created", column.name)));
                Ok(column)
            }
            Err(e) => {
                self.report(&e, "Failed to create list");
                Err(e)
            }
        }
    }

    pub async fn rename_column(&self, column_id: ColumnId, name: &str) -> TaskyResult<Column> {
        let result = async {
            let name = required_text(name, LIST_NAME_REQUIRED)?;
            self.gateway.rename_column(column_id, name).await
        }
        .await;

        match result {
            Ok(column) => {
                self.state.lock().execute(&RenameColumn {
                    column_id,
                    name: column.name.clone(),
                })?;
                tracing::info!("Renamed list {} to {}", column_id, column.name);
                self.notifier.notify(Notification::success("List renamed"));
                Ok(column)
            }
            Err(e) => {
                self.report(&e, "Failed to rename list");
                Err(e)
            }
        }
    }

    pub async fn create_task(
        &self,
        column_id: ColumnId,
        title: &str,
        content: Option<&str>,
    ) -> TaskyResult<Task> {
        let result = async {
            let title = required_text(title, TASK_TITLE_REQUIRED)?;
            self.gateway
                .create_task(column_id, title, optional_text(content))
                .await
        }
        .await;

        match result {
            Ok(task) => {
                self.state.lock().execute(&AddTask { task: task.clone() })?;
                tracing::info!("Created task {} in list {}", task.id, column_id);
                self.notifier.notify(Notification::success("Task created"));
                Ok(task)
            }
            Err(e) => {
                self.report(&e, "Failed to create task");
                Err(e)
            }
        }
    }

    // ----- drag and drop -------------------------------------------------

    pub fn drag_start(&self, task_id: TaskId) {
        self.drag.lock().drag_start(task_id);
    }

    pub fn drag_cancel(&self) {
        self.drag.lock().cancel();
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.drag.lock().phase()
    }

    /// The task under the pointer, for rendering a drag overlay.
    pub fn active_task(&self) -> Option<Task> {
        let task_id = self.drag.lock().active_task_id()?;
        self.task(task_id)
    }

    /// Finish a drag over `over`. Returns `None` when the drop does not move
    /// the task to another column.
    pub async fn drag_end(&self, over: Option<DropTargetId>) -> Option<MoveOutcome> {
        let intent = {
            let state = self.state.lock();
            self.drag.lock().drag_end(over, &state)
        }?;

        let outcome = self.move_task(intent.task_id, intent.to_column).await;

        let mut drag = self.drag.lock();
        if let DragPhase::Resolving { task_id, .. } = drag.phase() {
            if task_id == intent.task_id {
                drag.finish();
            }
        }
        Some(outcome)
    }

    /// Finish a drag at a pointer position, resolving the drop target with
    /// column-first collision detection.
    pub async fn drop_at(
        &self,
        pointer: Option<Point>,
        dragged: &Rect,
        targets: &[DropTarget],
    ) -> Option<MoveOutcome> {
        let over = column_first_collision(pointer, dragged, targets);
        self.drag_end(over).await
    }

    /// Move a task to another column without a drag gesture.
    pub async fn move_task(&self, task_id: TaskId, to_column: ColumnId) -> MoveOutcome {
        self.moves
            .move_task(
                self.gateway.as_ref(),
                &self.state,
                self.notifier.as_ref(),
                task_id,
                to_column,
            )
            .await
    }

    // ----- deletion ------------------------------------------------------

    pub fn request_list_deletion(&self, column_id: ColumnId) -> bool {
        let Some(column) = self.state.lock().find_column(column_id).cloned() else {
            return false;
        };
        self.list_deletion.lock().open(column)
    }

    pub fn cancel_list_deletion(&self) -> bool {
        self.list_deletion.lock().cancel()
    }

    pub fn list_deletion_phase(&self) -> DeletionPhase<Column> {
        self.list_deletion.lock().phase().clone()
    }

    pub fn list_deletion_prompt(&self) -> Option<String> {
        let column = self.list_deletion.lock().target().cloned()?;
        let count = self.state.lock().count_for(column.id);
        Some(list_deletion_prompt(&column.name, count))
    }

    pub async fn confirm_list_deletion(&self) -> DeletionOutcome {
        let Some(column) = self.list_deletion.lock().begin() else {
            return DeletionOutcome::NotPending;
        };

        match self.gateway.delete_column(column.id).await {
            Ok(()) => {
                if let Err(e) = self.state.lock().execute(&RemoveColumn {
                    column_id: column.id,
                }) {
                    tracing::warn!("List {} already gone locally: {}", column.id, e);
                }
                self.list_deletion.lock().succeed();
                tracing::info!("Deleted list {}", column.id);
                self.notifier.notify(Notification::success("List deleted"));
                DeletionOutcome::Deleted
            }
            Err(e) => {
                self.list_deletion.lock().fail();
                let message = self.report(&e, "Failed to delete list");
                DeletionOutcome::Failed { message }
            }
        }
    }

    pub fn request_task_deletion(&self, task_id: TaskId) -> bool {
        let Some(task) = self.task(task_id) else {
            return false;
        };
        self.task_deletion.lock().open(task)
    }

    pub fn cancel_task_deletion(&self) -> bool {
        self.task_deletion.lock().cancel()
    }

    pub fn task_deletion_phase(&self) -> DeletionPhase<Task> {
        self.task_deletion.lock().phase().clone()
    }

    pub fn task_deletion_prompt(&self) -> Option<String> {
        let flow = self.task_deletion.lock();
        flow.target().map(|t| task_deletion_prompt(t.display_title()))
    }

    pub async fn confirm_task_deletion(&self) -> DeletionOutcome {
        let Some(task) = self.task_deletion.lock().begin() else {
            return DeletionOutcome::NotPending;
        };

        match self.gateway.delete_task(task.id).await {
            Ok(_) => {
                if let Err(e) = self.state.lock().execute(&RemoveTask { task_id: task.id }) {
                    tracing::warn!("Task {} already gone locally: {}", task.id, e);
                }
                self.task_deletion.lock().succeed();
                tracing::info!("Deleted task {}", task.id);
                self.notifier.notify(Notification::success("Task deleted"));
                DeletionOutcome::Deleted
            }
            Err(e) => {
                self.task_deletion.lock().fail();
                let message = self.report(&e, "Failed to delete task");
                DeletionOutcome::Failed { message }
            }
        }
    }
}
