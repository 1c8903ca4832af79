//! Confirmation gate in front of destructive remote calls.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", content = "target", rename_all = "lowercase")]
pub enum DeletionPhase<T> {
    Closed,
    /// Dialog open, waiting for the user to confirm.
    Confirming(T),
    /// Remote delete in flight; cancel is disabled.
    Deleting(T),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeletionOutcome {
    Deleted,
    /// The dialog stays open for another attempt.
    Failed { message: String },
    /// Nothing was pending confirmation, or a deletion is already running.
    NotPending,
}

/// Confirmation text for deleting a list holding `task_count` tasks.
pub fn list_deletion_prompt(name: &str, task_count: usize) -> String {
    if task_count > 0 {
        format!("This will permanently delete “{name}” and {task_count} task(s) inside.")
    } else {
        format!("This will permanently delete “{name}”.")
    }
}

pub fn task_deletion_prompt(title: &str) -> String {
    format!("This will permanently delete “{title}”.")
}

/// closed → confirming → deleting → closed, with failures going back to
/// confirming.
#[derive(Debug, Clone)]
pub struct DeletionFlow<T> {
    phase: DeletionPhase<T>,
}

impl<T> Default for DeletionFlow<T> {
    fn default() -> Self {
        Self {
            phase: DeletionPhase::Closed,
        }
    }
}

impl<T: Clone> DeletionFlow<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &DeletionPhase<T> {
        &self.phase
    }

    pub fn target(&self) -> Option<&T> {
        match &self.phase {
            DeletionPhase::Closed => None,
            DeletionPhase::Confirming(t) | DeletionPhase::Deleting(t) => Some(t),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.phase, DeletionPhase::Closed)
    }

    pub fn is_deleting(&self) -> bool {
        matches!(self.phase, DeletionPhase::Deleting(_))
    }

    /// Ask for confirmation of `target`, replacing any target still awaiting
    /// confirmation. Refused while a deletion is in flight.
    pub fn open(&mut self, target: T) -> bool {
        if self.is_deleting() {
            return false;
        }
        self.phase = DeletionPhase::Confirming(target);
        true
    }

    /// Close the dialog. Refused while a deletion is in flight.
    pub fn cancel(&mut self) -> bool {
        if self.is_deleting() {
            return false;
        }
        self.phase = DeletionPhase::Closed;
        true
    }

    /// Move to *deleting* and hand out the target to delete.
    /// `None` unless the flow is waiting for confirmation.
    pub fn begin(&mut self) -> Option<T> {
        match &self.phase {
            DeletionPhase::Confirming(target) => {
                let target = target.clone();
                self.phase = DeletionPhase::Deleting(target.clone());
                Some(target)
            }
            _ => None,
        }
    }

    pub fn succeed(&mut self) {
        if self.is_deleting() {
            self.phase = DeletionPhase::Closed;
        }
    }

    pub fn fail(&mut self) {
        if let DeletionPhase::Deleting(target) = &self.phase {
            self.phase = DeletionPhase::Confirming(target.clone());
        }
    }
}
