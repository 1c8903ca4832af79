use std::sync::Arc;

use tasky_core::{AppConfig, NotificationLog, TaskyError, TaskyResult};
use tasky_domain::store::INVALID_BOARD;
use tasky_domain::{
    AppContext, BoardDirectory, BoardId, BoardStore, LoadOutcome, RemoteGateway, SessionBus,
};
use tasky_remote::{JsonFileGateway, SupabaseAuth, SupabaseClient, SupabaseGateway};

const HOSTED_ONLY: &str = "Authentication needs the hosted backend, run without --file";

/// Everything a command needs: the selected backend plus the session state
/// shared by the board consumers.
pub struct CliContext {
    pub config: AppConfig,
    pub gateway: Arc<dyn RemoteGateway>,
    pub notifier: Arc<NotificationLog>,
    pub session: Arc<AppContext>,
    auth: Option<SupabaseAuth>,
}

impl CliContext {
    /// Open the local file backend when `file` is given, the hosted one otherwise.
    pub fn open(file: Option<&str>, config: AppConfig) -> TaskyResult<Self> {
        let bus = Arc::new(SessionBus::new());
        let session = Arc::new(AppContext::new());
        session.attach(&bus);

        let (gateway, auth): (Arc<dyn RemoteGateway>, Option<SupabaseAuth>) = match file {
            Some(path) => {
                tracing::debug!("Using local board file {}", path);
                (Arc::new(JsonFileGateway::new(path)), None)
            }
            None => {
                let client = SupabaseClient::new(config.supabase()?);
                tracing::debug!("Using hosted backend (session: {})", client.has_session());
                (
                    Arc::new(SupabaseGateway::new(client.clone())),
                    Some(SupabaseAuth::new(client, bus)),
                )
            }
        };

        Ok(Self {
            config,
            gateway,
            notifier: Arc::new(NotificationLog::new()),
            session,
            auth,
        })
    }

    pub fn directory(&self) -> BoardDirectory {
        BoardDirectory::new(self.gateway.clone(), self.notifier.clone())
    }

    /// A store for `board_id` with the board already loaded.
    pub async fn board(&self, board_id: BoardId) -> TaskyResult<BoardStore> {
        let store = BoardStore::new(board_id, self.gateway.clone(), self.notifier.clone())
            .with_refetch_throttle(self.config.refetch_throttle());
        match store.load().await {
            LoadOutcome::Applied => Ok(store),
            LoadOutcome::Failed { message } => Err(TaskyError::Remote(message)),
            LoadOutcome::InvalidBoard => Err(TaskyError::Validation(INVALID_BOARD.into())),
            other => Err(TaskyError::Internal(format!(
                "Board {board_id} did not load: {other:?}"
            ))),
        }
    }

    pub fn auth(&self) -> TaskyResult<&SupabaseAuth> {
        self.auth
            .as_ref()
            .ok_or_else(|| TaskyError::Config(HOSTED_ONLY.into()))
    }

    /// Store (or forget) the access token in the config file so later
    /// invocations reuse the session.
    pub fn persist_token(&self, token: Option<String>) -> TaskyResult<()> {
        let Some(path) = AppConfig::config_path() else {
            tracing::warn!("No config directory, session will not be remembered");
            return Ok(());
        };
        let mut stored = AppConfig::load_from(&path);
        stored.access_token = token;
        stored.save_to(&path)
    }
}
