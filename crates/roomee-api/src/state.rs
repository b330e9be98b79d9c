//! Application state wiring the messaging stack together.
//!
//! AppState holds the concrete service instances used by the HTTP and
//! WebSocket layers. Core types are generic over the repository trait, but
//! AppState pins them to the SQLite implementation from roomee-infra.

use std::path::PathBuf;
use std::sync::Arc;

use roomee_core::message::MessageService;
use roomee_core::realtime::{ChatBroker, SessionRegistry};
use roomee_infra::sqlite::message::SqliteMessageRepository;
use roomee_infra::sqlite::pool::DatabasePool;

/// Concrete type aliases for the core generics pinned to infra implementations.
pub type ConcreteMessageService = MessageService<SqliteMessageRepository>;
pub type ConcreteChatBroker = ChatBroker<SqliteMessageRepository>;

/// Shared application state for all handlers.
///
/// The registry is process-wide and owned here: created once at startup,
/// entries added and removed per connection, injected into the broker
/// rather than living as ambient global state.
#[derive(Clone)]
pub struct AppState {
    pub messages: Arc<ConcreteMessageService>,
    pub registry: Arc<SessionRegistry>,
    pub broker: Arc<ConcreteChatBroker>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state from the default data directory.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("roomee.db").display()
        );
        Self::with_database_url(&db_url).await
    }

    /// Wire the full stack against an explicit database URL.
    pub async fn with_database_url(database_url: &str) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(database_url).await?;

        let messages = Arc::new(MessageService::new(SqliteMessageRepository::new(
            db_pool.clone(),
        )));
        let registry = Arc::new(SessionRegistry::new());
        let broker = Arc::new(ChatBroker::new(
            Arc::clone(&registry),
            Arc::clone(&messages),
        ));

        Ok(Self {
            messages,
            registry,
            broker,
            db_pool,
        })
    }
}

/// Data directory from `ROOMEE_DATA_DIR`, falling back to `~/.roomee`.
fn resolve_data_dir() -> PathBuf {
    match std::env::var("ROOMEE_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".roomee")
        }
    }
}
