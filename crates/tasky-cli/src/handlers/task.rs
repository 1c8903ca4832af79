use crate::cli::TaskAction;
use crate::context::CliContext;
use crate::output::{self, OrExit};
use tasky_domain::store::LOAD_FAILED;
use tasky_domain::{DeletionOutcome, DropTargetId, MoveOutcome, SkipReason};

pub async fn handle(ctx: &CliContext, action: TaskAction) -> anyhow::Result<()> {
    match action {
        TaskAction::Create {
            board_id,
            list_id,
            title,
            content,
        } => {
            let store = ctx.board(board_id).await.or_exit(LOAD_FAILED);
            if store.columns().iter().all(|c| c.id != list_id) {
                output::output_error(&format!("List not found: {}", list_id));
            }
            let task = store
                .create_task(list_id, &title, content.as_deref())
                .await
                .or_exit("Failed to create task");
            output::output_success(&task);
        }
        TaskAction::Move {
            board_id,
            id,
            to_list,
        } => {
            let store = ctx.board(board_id).await.or_exit(LOAD_FAILED);
            if store.columns().iter().all(|c| c.id != to_list) {
                output::output_error(&format!("List not found: {}", to_list));
            }
            if store.task(id).is_none() {
                output::output_error(&format!("Task not found: {}", id));
            }
            // A command-line move is a drag that lands on the destination list.
            store.drag_start(id);
            match store.drag_end(Some(DropTargetId::Column(to_list))).await {
                Some(MoveOutcome::Committed { task }) => output::output_success(&task),
                Some(MoveOutcome::RolledBack { message }) => output::output_error(&message),
                Some(MoveOutcome::Skipped { reason }) => {
                    output::output_success(serde_json::json!({ "skipped": reason }))
                }
                None => output::output_success(serde_json::json!({
                    "skipped": SkipReason::SameColumn
                })),
            }
        }
        TaskAction::Delete { board_id, id, yes } => {
            let store = ctx.board(board_id).await.or_exit(LOAD_FAILED);
            if !store.request_task_deletion(id) {
                output::output_error(&format!("Task not found: {}", id));
            }
            if !yes {
                let prompt = store.task_deletion_prompt().unwrap_or_default();
                store.cancel_task_deletion();
                output::output_error(&format!("{prompt} Re-run with --yes to confirm."));
            }
            match store.confirm_task_deletion().await {
                DeletionOutcome::Deleted => {
                    output::output_success(serde_json::json!({ "deleted": id }))
                }
                DeletionOutcome::Failed { message } => output::output_error(&message),
                DeletionOutcome::NotPending => output::output_error("No deletion pending"),
            }
        }
    }
    Ok(())
}
