use serde::Serialize;

use super::target::DropTargetId;
use crate::board_state::BoardState;
use crate::{ColumnId, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum DragPhase {
    Idle,
    Dragging { task_id: TaskId },
    Resolving { task_id: TaskId, to_column: ColumnId },
}

/// A cross-column move decided by a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveIntent {
    pub task_id: TaskId,
    pub from_column: ColumnId,
    pub to_column: ColumnId,
}

/// Tracks the dragged task and turns a drop into a move intent.
#[derive(Debug, Clone)]
pub struct DragController {
    phase: DragPhase,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    pub fn new() -> Self {
        Self {
            phase: DragPhase::Idle,
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == DragPhase::Idle
    }

    /// The task being dragged or resolved, if any.
    pub fn active_task_id(&self) -> Option<TaskId> {
        match self.phase {
            DragPhase::Idle => None,
            DragPhase::Dragging { task_id } | DragPhase::Resolving { task_id, .. } => Some(task_id),
        }
    }

    pub fn drag_start(&mut self, task_id: TaskId) {
        if let DragPhase::Resolving { .. } = self.phase {
            tracing::debug!("drag start for task {} while a drop is resolving", task_id);
        }
        self.phase = DragPhase::Dragging { task_id };
    }

    /// Finish the gesture over `over`.
    ///
    /// Returns a move intent and enters *resolving* when the drop lands in a
    /// different column than the task's current one; otherwise goes back to
    /// *idle* and returns `None`.
    pub fn drag_end(&mut self, over: Option<DropTargetId>, state: &BoardState) -> Option<MoveIntent> {
        let DragPhase::Dragging { task_id } = self.phase else {
            return None;
        };
        self.phase = DragPhase::Idle;

        let to_column = match over? {
            DropTargetId::Column(id) => id,
            DropTargetId::Task(id) => state.find_task(id)?.column_id,
        };
        let current = state.find_task(task_id)?;
        if current.column_id == to_column {
            return None;
        }

        self.phase = DragPhase::Resolving { task_id, to_column };
        Some(MoveIntent {
            task_id,
            from_column: current.column_id,
            to_column,
        })
    }

    /// Leave *resolving* once the move has settled, whatever its outcome.
    pub fn finish(&mut self) {
        if let DragPhase::Resolving { .. } = self.phase {
            self.phase = DragPhase::Idle;
        }
    }

    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
    }
}
