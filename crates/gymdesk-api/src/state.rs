//! Application state wiring all services together.
//!
//! Services are generic over their ports; `AppState` pins them to the SQLite,
//! LINE and Argon2 implementations. This is the only place channel
//! credentials enter the program.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use gymdesk_core::chat::conversation::ConversationService;
use gymdesk_core::chat::read_state::ReadStateService;
use gymdesk_core::service::auth::AuthService;
use gymdesk_core::service::staff::StaffService;
use gymdesk_core::training::service::TrainingService;
use gymdesk_infra::crypto::Argon2Credentials;
use gymdesk_infra::line::LineCredentials;
use gymdesk_infra::line::client::LineMessagingClient;
use gymdesk_infra::line::webhook::WebhookVerifier;
use gymdesk_infra::sqlite::chat::SqliteChatRepository;
use gymdesk_infra::sqlite::pool::{DatabasePool, database_url};
use gymdesk_infra::sqlite::session::SqliteSessionRepository;
use gymdesk_infra::sqlite::training::SqliteTrainingRepository;
use gymdesk_infra::sqlite::user::SqliteUserRepository;
use gymdesk_types::config::AppConfig;

pub type ConcreteReadStateService = ReadStateService<SqliteChatRepository>;
pub type ConcreteConversationService = ConversationService<SqliteChatRepository, LineMessagingClient>;
pub type ConcreteTrainingService = TrainingService<SqliteTrainingRepository>;
pub type ConcreteStaffService = StaffService<SqliteUserRepository, Argon2Credentials>;
pub type ConcreteAuthService =
    AuthService<SqliteUserRepository, SqliteSessionRepository, Argon2Credentials>;

/// Shared state for CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub read_state: Arc<ConcreteReadStateService>,
    pub conversations: Arc<ConcreteConversationService>,
    pub training: Arc<ConcreteTrainingService>,
    pub staff: Arc<ConcreteStaffService>,
    pub auth: Arc<ConcreteAuthService>,
    /// `None` when `LINE_CHANNEL_SECRET` is not configured.
    pub webhook: Option<Arc<WebhookVerifier>>,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Open the database under `data_dir` and wire services.
    pub async fn init(
        data_dir: PathBuf,
        config: AppConfig,
        line: Option<LineCredentials>,
    ) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let db_url = format!("{}?mode=rwc", database_url(&data_dir));
        let db_pool = DatabasePool::new(&db_url)
            .await
            .context("failed to open database")?;

        Self::from_pool(db_pool, config, line, data_dir)
    }

    /// Wire services over an already-open pool.
    pub fn from_pool(
        db_pool: DatabasePool,
        config: AppConfig,
        line: Option<LineCredentials>,
        data_dir: PathBuf,
    ) -> anyhow::Result<Self> {
        let (gateway, webhook) = match line {
            Some(creds) => (
                LineMessagingClient::new(creds.channel_access_token)?,
                Some(Arc::new(WebhookVerifier::new(creds.channel_secret))),
            ),
            None => (LineMessagingClient::unconfigured()?, None),
        };
        let gateway = gateway.with_base_url(config.line.api_base_url.clone());

        let session_ttl = chrono::Duration::hours(i64::from(config.auth.session_ttl_hours));

        Ok(Self {
            read_state: Arc::new(ReadStateService::new(SqliteChatRepository::new(db_pool.clone()))),
            conversations: Arc::new(ConversationService::new(
                SqliteChatRepository::new(db_pool.clone()),
                gateway,
            )),
            training: Arc::new(TrainingService::new(SqliteTrainingRepository::new(db_pool.clone()))),
            staff: Arc::new(StaffService::new(
                SqliteUserRepository::new(db_pool.clone()),
                Argon2Credentials,
            )),
            auth: Arc::new(AuthService::new(
                SqliteUserRepository::new(db_pool.clone()),
                SqliteSessionRepository::new(db_pool.clone()),
                Argon2Credentials,
                session_ttl,
            )),
            webhook,
            config: Arc::new(config),
            data_dir,
            db_pool,
        })
    }
}
