pub mod auth;
pub mod board;
pub mod board_state;
pub mod boards;
pub mod column;
pub mod commands;
pub mod context;
pub mod deletion;
pub mod drag;
pub mod gateway;
pub mod move_coordinator;
pub mod optimistic;
pub mod profile;
pub mod session;
pub mod store;
pub mod task;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{LoginPayload, RegisterPayload};
pub use board::{is_valid_board_id, Board, BoardId, DEFAULT_BOARD_TITLE};
pub use board_state::BoardState;
pub use boards::BoardDirectory;
pub use column::{Column, ColumnId, ColumnWithTasks};
pub use context::AppContext;
pub use deletion::{DeletionFlow, DeletionOutcome, DeletionPhase};
pub use drag::{DragController, DragPhase, DropTarget, DropTargetId, MoveIntent, Point, Rect};
pub use gateway::{RemoteGateway, DEFAULT_BOARD_PAGE};
pub use move_coordinator::{MoveCoordinator, MoveOutcome, SkipReason};
pub use optimistic::OptimisticUpdate;
pub use profile::{Profile, UserId};
pub use session::{SessionBus, SessionEvent, SubscriptionId};
pub use store::{BoardSnapshot, BoardStore, ColumnSnapshot, LoadOutcome};
pub use task::{Task, TaskId};
