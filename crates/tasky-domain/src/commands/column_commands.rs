use super::{Command, CommandContext};
use crate::{Column, ColumnId};
use tasky_core::TaskyResult;

/// Append a column the remote store has just created. A row a reload has
/// already brought in is refreshed in place.
pub struct AddColumn {
    pub column: Column,
}

impl Command for AddColumn {
    fn execute(&self, context: &mut CommandContext) -> TaskyResult<()> {
        match context.columns.iter_mut().find(|c| c.id == self.column.id) {
            Some(existing) => *existing = self.column.clone(),
            None => context.columns.push(self.column.clone()),
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Add column: '{}'", self.column.name)
    }
}

/// Rename a column in place
pub struct RenameColumn {
    pub column_id: ColumnId,
    pub name: String,
}

impl Command for RenameColumn {
    fn execute(&self, context: &mut CommandContext) -> TaskyResult<()> {
        if let Some(column) = context.columns.iter_mut().find(|c| c.id == self.column_id) {
            column.name = self.name.clone();
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Rename column {} to '{}'", self.column_id, self.name)
    }
}

/// Remove a column together with every task that references it
pub struct RemoveColumn {
    pub column_id: ColumnId,
}

impl Command for RemoveColumn {
    fn execute(&self, context: &mut CommandContext) -> TaskyResult<()> {
        context.columns.retain(|c| c.id != self.column_id);
        context.tasks.retain(|t| t.column_id != self.column_id);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Remove column {}", self.column_id)
    }
}
