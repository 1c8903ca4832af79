use crate::cli::BoardAction;
use crate::context::CliContext;
use crate::output::{self, OrExit};
use tasky_remote::{DescriptionGenerator, OpenAiDescriber, ServerDescriber};

const TITLE_REQUIRED: &str = "Title required";

pub async fn handle(ctx: &CliContext, action: BoardAction) -> anyhow::Result<()> {
    match action {
        BoardAction::Create { title, description } => {
            ctx.session.start_session(ctx.gateway.as_ref()).await;
            let board = ctx
                .directory()
                .create(&ctx.session, &title, description.as_deref())
                .await
                .or_exit("Failed to create board");
            output::output_success(&board);
        }
        BoardAction::List { limit, offset } => {
            let boards = ctx
                .directory()
                .list(limit, offset)
                .await
                .or_exit("Failed to load boards");
            output::output_list(boards);
        }
        BoardAction::Get { id } => match ctx.gateway.fetch_board(id).await {
            Some(board) => output::output_success(&board),
            None => output::output_error(&format!("Board not found: {}", id)),
        },
        BoardAction::Delete { id } => {
            ctx.directory()
                .delete(id)
                .await
                .or_exit("Failed to delete board");
            output::output_success(serde_json::json!({ "deleted": id }));
        }
        BoardAction::Show { id } => {
            let store = ctx.board(id).await.or_exit("Failed to load board data");
            output::output_success(store.snapshot());
        }
        BoardAction::Describe { title, server } => {
            let title = title.trim();
            if title.is_empty() {
                output::output_error(TITLE_REQUIRED);
            }
            let generator = describer(ctx, server);
            let description = generator
                .describe(title)
                .await
                .or_exit("Failed to generate description");
            output::output_success(serde_json::json!({
                "title": title,
                "description": description,
            }));
        }
    }
    Ok(())
}

/// Call OpenAI directly when a key is configured and no server was named,
/// otherwise go through a running tasky-server.
fn describer(ctx: &CliContext, server: Option<String>) -> Box<dyn DescriptionGenerator> {
    if server.is_none() {
        if let Ok(direct) = OpenAiDescriber::from_config(&ctx.config) {
            return Box::new(direct);
        }
    }
    let addr = server.unwrap_or_else(|| ctx.config.effective_server_addr().to_string());
    if addr.starts_with("http://") || addr.starts_with("https://") {
        Box::new(ServerDescriber::new(addr))
    } else {
        Box::new(ServerDescriber::for_addr(&addr))
    }
}
