use clanhall_db::{DocumentStore, SqliteStore};
use clanhall_ledger::AwardConfig;
use clanhall_shared::Result;

use crate::config::Config;

/// Composition root: one document store handle, one command/query pair
/// per domain, all sharing the same backend.
#[derive(Clone)]
pub struct State<S: DocumentStore + Clone> {
    pub db: S,
    pub users: clanhall_user::Command<S>,
    pub user_queries: clanhall_user::Query<S>,
    pub ledger: clanhall_ledger::Command<S>,
    pub ledger_queries: clanhall_ledger::Query<S>,
    pub store: clanhall_store::Command<S>,
    pub store_queries: clanhall_store::Query<S>,
    pub raffles: clanhall_raffle::Command<S>,
    pub raffle_queries: clanhall_raffle::Query<S>,
    pub notifications: clanhall_notification::Command<S>,
    pub notification_queries: clanhall_notification::Query<S>,
}

impl<S: DocumentStore + Clone> State<S> {
    pub fn new(db: S, awards: AwardConfig) -> Self {
        Self {
            users: clanhall_user::Command::new(db.clone()),
            user_queries: clanhall_user::Query::new(db.clone()),
            ledger: clanhall_ledger::Command::new(db.clone(), awards),
            ledger_queries: clanhall_ledger::Query::new(db.clone()),
            store: clanhall_store::Command::new(db.clone()),
            store_queries: clanhall_store::Query::new(db.clone()),
            raffles: clanhall_raffle::Command::new(db.clone()),
            raffle_queries: clanhall_raffle::Query::new(db.clone()),
            notifications: clanhall_notification::Command::new(db.clone()),
            notification_queries: clanhall_notification::Query::new(db.clone()),
            db,
        }
    }
}

impl State<SqliteStore> {
    /// Connect to the configured SQLite database and run the schema
    /// migration.
    pub async fn connect(config: &Config) -> Result<Self> {
        let db = SqliteStore::connect(&config.database.url, config.database.max_connections).await?;

        tracing::info!(url = %config.database.url, "document store ready");

        Ok(Self::new(db, config.awards.clone()))
    }
}
