//! Optimistic cross-column task moves.

use std::collections::HashSet;

use parking_lot::Mutex;
use serde::Serialize;
use tasky_core::{Notification, Notifier, TaskyError};

use crate::board_state::BoardState;
use crate::commands::ReplaceTask;
use crate::gateway::RemoteGateway;
use crate::optimistic::OptimisticUpdate;
use crate::{ColumnId, Task, TaskId};

pub const MOVE_FAILED: &str = "Failed to move task";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The task already sits in the destination column.
    SameColumn,
    /// A move of this task is still waiting for the remote store.
    InFlight,
    UnknownTask,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    Skipped { reason: SkipReason },
    Committed { task: Task },
    RolledBack { message: String },
}

/// Serializes moves per task and runs each one as an optimistic update.
#[derive(Debug, Default)]
pub struct MoveCoordinator {
    in_flight: Mutex<HashSet<TaskId>>,
}

impl MoveCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self, task_id: TaskId) -> bool {
        self.in_flight.lock().contains(&task_id)
    }

    /// Move `task_id` to `to_column`.
    ///
    /// The state lock is only taken for the local apply/rollback, never
    /// across the remote call.
    pub async fn move_task(
        &self,
        gateway: &dyn RemoteGateway,
        state: &Mutex<BoardState>,
        notifier: &dyn Notifier,
        task_id: TaskId,
        to_column: ColumnId,
    ) -> MoveOutcome {
        let snapshot = {
            let state = state.lock();
            match state.find_task(task_id) {
                None => {
                    return MoveOutcome::Skipped {
                        reason: SkipReason::UnknownTask,
                    }
                }
                Some(task) if task.column_id == to_column => {
                    return MoveOutcome::Skipped {
                        reason: SkipReason::SameColumn,
                    }
                }
                Some(task) => task.clone(),
            }
        };

        if !self.in_flight.lock().insert(task_id) {
            tracing::debug!("Ignoring move of task {}: previous move unresolved", task_id);
            return MoveOutcome::Skipped {
                reason: SkipReason::InFlight,
            };
        }

        let proposed = snapshot.moved_to(to_column);
        let update = OptimisticUpdate::new(snapshot, proposed);
        let result = update
            .run(
                |task: Task| {
                    // A task deleted meanwhile stays deleted.
                    if let Err(e) = state.lock().execute(&ReplaceTask { task }) {
                        tracing::debug!("Task left the board during its move: {}", e);
                    }
                },
                gateway.move_task(task_id, to_column),
                |persisted: &Task, proposed: &Task| {
                    if persisted.column_id == proposed.column_id {
                        Ok(())
                    } else {
                        Err(TaskyError::Consistency("DB did not persist move".into()))
                    }
                },
            )
            .await;

        self.in_flight.lock().remove(&task_id);

        match result {
            Ok(task) => {
                tracing::info!("Moved task {} to column {}", task_id, to_column);
                MoveOutcome::Committed { task }
            }
            Err(e) => {
                let message = e.user_message(MOVE_FAILED);
                tracing::warn!("Rolled back move of task {}: {}", task_id, e);
                notifier.notify(Notification::error(message.clone()));
                MoveOutcome::RolledBack { message }
            }
        }
    }
}
