use super::{Command, CommandContext};
use crate::{Task, TaskId};
use tasky_core::{TaskyError, TaskyResult};

/// Append a task the remote store has just created
pub struct AddTask {
    pub task: Task,
}

impl Command for AddTask {
    fn execute(&self, context: &mut CommandContext) -> TaskyResult<()> {
        context.tasks.retain(|t| t.id != self.task.id);
        context.tasks.push(self.task.clone());
        Ok(())
    }

    fn description(&self) -> String {
        format!("Add task: '{}'", self.task.display_title())
    }
}

/// Overwrite a held task with another version of the same row. Fails with
/// `NotFound` when the task is no longer held.
pub struct ReplaceTask {
    pub task: Task,
}

impl Command for ReplaceTask {
    fn execute(&self, context: &mut CommandContext) -> TaskyResult<()> {
        let task = context
            .tasks
            .iter_mut()
            .find(|t| t.id == self.task.id)
            .ok_or_else(|| TaskyError::NotFound(format!("Task not found: {}", self.task.id)))?;
        *task = self.task.clone();
        Ok(())
    }

    fn description(&self) -> String {
        format!("Replace task {}", self.task.id)
    }
}

/// Remove a task
pub struct RemoveTask {
    pub task_id: TaskId,
}

impl Command for RemoveTask {
    fn execute(&self, context: &mut CommandContext) -> TaskyResult<()> {
        context.tasks.retain(|t| t.id != self.task_id);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Remove task {}", self.task_id)
    }
}
