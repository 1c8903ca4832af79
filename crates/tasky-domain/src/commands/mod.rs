use tasky_core::TaskyResult;

pub mod column_commands;
pub mod task_commands;

pub use column_commands::*;
pub use task_commands::*;

/// Trait for local mutations of the viewed board.
/// Commands are applied only after the remote store has confirmed them,
/// or as the optimistic half of an `OptimisticUpdate`.
pub trait Command: Send + Sync {
    /// Execute this command, mutating the board state
    fn execute(&self, context: &mut CommandContext) -> TaskyResult<()>;

    /// Human-readable description of what this command does
    fn description(&self) -> String;
}

/// Context passed to commands for mutation
pub struct CommandContext<'a> {
    pub columns: &'a mut Vec<crate::Column>,
    pub tasks: &'a mut Vec<crate::Task>,
}
