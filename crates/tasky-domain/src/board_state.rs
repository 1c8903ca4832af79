//! Session snapshot of the board being viewed.
//!
//! Columns and tasks are the canonical data. Counts and per-column grouping
//! are derived on every read, never cached, so they cannot drift from the
//! task list.

use std::collections::BTreeMap;

use serde::Serialize;
use tasky_core::TaskyResult;

use crate::commands::{Command, CommandContext};
use crate::{Board, Column, ColumnId, ColumnWithTasks, Task, TaskId, DEFAULT_BOARD_TITLE};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardState {
    pub title: String,
    pub description: String,
    columns: Vec<Column>,
    tasks: Vec<Task>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            title: DEFAULT_BOARD_TITLE.to_string(),
            description: String::new(),
            columns: Vec::new(),
            tasks: Vec::new(),
        }
    }
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Replace columns and tasks wholesale with a freshly fetched board.
    ///
    /// Columns are ordered by creation time; tasks are flattened column by
    /// column, each ordered by creation time and tagged with the column that
    /// embedded it.
    pub fn replace(&mut self, rows: Vec<ColumnWithTasks>, board: Option<Board>) {
        let mut rows = rows;
        rows.sort_by(|a, b| {
            a.column
                .created_at
                .cmp(&b.column.created_at)
                .then(a.column.id.cmp(&b.column.id))
        });

        let mut columns = Vec::with_capacity(rows.len());
        let mut tasks = Vec::new();
        for row in rows {
            let column_id = row.column.id;
            let mut column_tasks = row.tasks;
            column_tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
            tasks.extend(column_tasks.into_iter().map(|mut t| {
                t.column_id = column_id;
                t
            }));
            columns.push(row.column);
        }

        self.columns = columns;
        self.tasks = tasks;
        match board {
            Some(board) => {
                self.title = board.title;
                self.description = board.description.unwrap_or_default();
            }
            None => {
                self.title = DEFAULT_BOARD_TITLE.to_string();
                self.description = String::new();
            }
        }
    }

    pub fn clear(&mut self) {
        self.columns.clear();
        self.tasks.clear();
    }

    pub fn execute(&mut self, command: &dyn Command) -> TaskyResult<()> {
        tracing::debug!("{}", command.description());
        let mut ctx = CommandContext {
            columns: &mut self.columns,
            tasks: &mut self.tasks,
        };
        command.execute(&mut ctx)
    }

    pub fn find_task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn find_column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Task count per column. Every known column is present, with zero when empty.
    pub fn counts(&self) -> BTreeMap<ColumnId, usize> {
        let mut counts: BTreeMap<ColumnId, usize> =
            self.columns.iter().map(|c| (c.id, 0)).collect();
        for task in &self.tasks {
            *counts.entry(task.column_id).or_insert(0) += 1;
        }
        counts
    }

    pub fn count_for(&self, column_id: ColumnId) -> usize {
        self.tasks.iter().filter(|t| t.column_id == column_id).count()
    }

    /// Tasks grouped by column, preserving task-list order within a column.
    pub fn tasks_by_column(&self) -> BTreeMap<ColumnId, Vec<Task>> {
        let mut grouped: BTreeMap<ColumnId, Vec<Task>> =
            self.columns.iter().map(|c| (c.id, Vec::new())).collect();
        for task in &self.tasks {
            grouped.entry(task.column_id).or_default().push(task.clone());
        }
        grouped
    }
}
