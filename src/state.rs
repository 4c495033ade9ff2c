//! Application state wiring the clients together.
//!
//! The LLM client and the database client are constructed once at startup
//! and injected into the orchestrator; handlers share them through `Arc`.
//! Nothing here is mutable across requests.

use std::sync::Arc;

use crate::ask::AskService;
use crate::config::Config;
use crate::db::{self, DatabaseClient, MockDatabaseClient};
use crate::error::Result;
use crate::llm;

/// Shared application state holding the orchestrator and server options.
#[derive(Clone)]
pub struct AppState {
    pub ask: Arc<AskService>,
    pub verbose_errors: bool,
}

impl AppState {
    /// Initializes the application state: connect to the database, build the
    /// LLM client, wire the orchestrator.
    ///
    /// With `mock_db` set, an in-memory database stands in for PostgreSQL
    /// (local smoke runs and tests).
    pub async fn init(config: &Config, mock_db: bool) -> Result<Self> {
        let llm_client: Arc<dyn llm::LlmClient> = Arc::from(llm::create_client(&config.llm)?);

        let db_client: Arc<dyn DatabaseClient> = if mock_db {
            Arc::new(MockDatabaseClient::empty())
        } else {
            Arc::from(db::connect(&config.database).await?)
        };

        Ok(Self {
            ask: Arc::new(AskService::new(llm_client, db_client)),
            verbose_errors: config.server.verbose_errors,
        })
    }

    /// Builds a state directly from clients, for tests.
    pub fn for_testing(
        llm_client: Arc<dyn llm::LlmClient>,
        db_client: Arc<dyn DatabaseClient>,
        verbose_errors: bool,
    ) -> Self {
        Self {
            ask: Arc::new(AskService::new(llm_client, db_client)),
            verbose_errors,
        }
    }
}
