use crate::cli::ListAction;
use crate::context::CliContext;
use crate::output::{self, OrExit};
use tasky_domain::store::LOAD_FAILED;
use tasky_domain::DeletionOutcome;

pub async fn handle(ctx: &CliContext, action: ListAction) -> anyhow::Result<()> {
    match action {
        ListAction::Create { board_id, name } => {
            let store = ctx.board(board_id).await.or_exit(LOAD_FAILED);
            let column = store
                .create_column(&name)
                .await
                .or_exit("Failed to create list");
            output::output_success(&column);
        }
        ListAction::Rename { board_id, id, name } => {
            let store = ctx.board(board_id).await.or_exit(LOAD_FAILED);
            if store.columns().iter().all(|c| c.id != id) {
                output::output_error(&format!("List not found: {}", id));
            }
            let column = store
                .rename_column(id, &name)
                .await
                .or_exit("Failed to rename list");
            output::output_success(&column);
        }
        ListAction::Delete { board_id, id, yes } => {
            let store = ctx.board(board_id).await.or_exit(LOAD_FAILED);
            if !store.request_list_deletion(id) {
                output::output_error(&format!("List not found: {}", id));
            }
            if !yes {
                let prompt = store.list_deletion_prompt().unwrap_or_default();
                store.cancel_list_deletion();
                output::output_error(&format!("{prompt} Re-run with --yes to confirm."));
            }
            match store.confirm_list_deletion().await {
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
