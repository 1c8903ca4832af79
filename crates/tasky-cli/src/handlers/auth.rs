use crate::cli::{AuthAction, RegisterArgs};
use crate::context::CliContext;
use crate::output::{self, OrExit};
use tasky_domain::boards::SIGN_IN_REQUIRED;
use tasky_domain::{LoginPayload, RegisterPayload};

pub async fn handle(ctx: &CliContext, action: AuthAction) -> anyhow::Result<()> {
    match action {
        AuthAction::Login { email, password } => {
            let auth = ctx.auth().or_exit("Login failed");
            let session = auth
                .sign_in(&LoginPayload::new(email, password))
                .await
                .or_exit("Login failed");
            ctx.persist_token(Some(session.access_token.clone()))?;
            output::output_success(&session.user);
        }
        AuthAction::Register(args) => {
            let user = handle_register(ctx, args).await;
            output::output_success(&user);
        }
        AuthAction::Logout => {
            let auth = ctx.auth().or_exit("Logout failed");
            let result = auth.sign_out().await;
            ctx.persist_token(None)?;
            if let Err(e) = result {
                tracing::warn!("Remote sign-out failed: {}", e);
            }
            output::output_success(serde_json::json!({ "signed_in": ctx.session.is_signed_in() }));
        }
        AuthAction::Whoami => match ctx.session.start_session(ctx.gateway.as_ref()).await {
            Some(profile) => output::output_success(&profile),
            None => output::output_error(SIGN_IN_REQUIRED),
        },
    }
    Ok(())
}

async fn handle_register(ctx: &CliContext, args: RegisterArgs) -> tasky_remote::AuthUser {
    let auth = ctx.auth().or_exit("Registration failed");
    let payload = RegisterPayload {
        email: args.email,
        password: args.password,
        full_name: args.full_name,
        confirm_password: args.confirm_password,
    };
    let user = auth.sign_up(&payload).await.or_exit("Registration failed");
    // Sign-up only yields a session when e-mail confirmation is off.
    if let Some(token) = auth.client().access_token() {
        if let Err(e) = ctx.persist_token(Some(token)) {
            tracing::warn!("Session not remembered: {}", e);
        }
    }
    user
}
