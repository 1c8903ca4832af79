//! The boards overview: the signed-in user's boards.

use std::sync::Arc;

use tasky_core::{Notification, Notifier, TaskyError, TaskyResult};

use crate::context::AppContext;
use crate::gateway::RemoteGateway;
use crate::validation::{optional_text, required_text, BOARD_TITLE_REQUIRED};
use crate::{Board, BoardId};

pub const SIGN_IN_REQUIRED: &str = "Please sign in first.";

pub struct BoardDirectory {
    gateway: Arc<dyn RemoteGateway>,
    notifier: Arc<dyn Notifier>,
}

impl BoardDirectory {
    pub fn new(gateway: Arc<dyn RemoteGateway>, notifier: Arc<dyn Notifier>) -> Self {
        Self { gateway, notifier }
    }

    pub async fn list(&self, limit: usize, offset: usize) -> TaskyResult<Vec<Board>> {
        self.gateway
            .list_boards(limit, offset)
            .await
            .inspect_err(|e| self.report(e, "Failed to load boards"))
    }

    pub async fn create(
        &self,
        context: &AppContext,
        title: &str,
        description: Option<&str>,
    ) -> TaskyResult<Board> {
        let result = self.try_create(context, title, description).await;
        match &result {
            Ok(board) => {
                tracing::info!("Created board {} ({})", board.id, board.title);
                self.notifier
                    .notify(Notification::success(format!("Board “{}” created", board.title)));
            }
            Err(e) => self.report(e, "Failed to create board"),
        }
        result
    }

    async fn try_create(
        &self,
        context: &AppContext,
        title: &str,
        description: Option<&str>,
    ) -> TaskyResult<Board> {
        let title = required_text(title, BOARD_TITLE_REQUIRED)?;
        if !context.is_signed_in() {
            return Err(TaskyError::Unauthenticated(SIGN_IN_REQUIRED.into()));
        }
        self.gateway
            .create_board(title, optional_text(description))
            .await
    }

    pub async fn delete(&self, board_id: BoardId) -> TaskyResult<()> {
        match self.gateway.delete_board(board_id).await {
            Ok(()) => {
                tracing::info!("Deleted board {}", board_id);
                self.notifier.notify(Notification::success("Board deleted"));
                Ok(())
            }
            Err(e) => {
                self.report(&e, "Failed to delete board");
                Err(e)
            }
        }
    }

    fn report(&self, error: &TaskyError, fallback: &str) {
        tracing::warn!("{}: {}", fallback, error);
        self.notifier
            .notify(Notification::error(error.user_message(fallback)));
    }
}
