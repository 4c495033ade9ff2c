//! Database abstraction layer for askdb.
//!
//! Provides a trait-based interface for the knowledge-base lookup, allowing
//! the real PostgreSQL backend and test doubles to be used interchangeably.

mod mock;
mod postgres;
mod types;

pub use mock::{FailingDatabaseClient, MockDatabaseClient};
pub use postgres::PostgresClient;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::config::ConnectionConfig;
use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface for knowledge-base lookups.
///
/// The only query shape this system runs is a parameterized substring search
/// over the instruction materials table. Free-form SQL is deliberately not
/// part of this interface: the model supplies a keyword, never a query.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Searches the `public.materials_material` table's `content` column
    /// for rows containing `keyword` (case-insensitive).
    async fn search_content(&self, keyword: &str) -> Result<QueryResult>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}

/// Creates a database client for the given configuration.
pub async fn connect(config: &ConnectionConfig) -> Result<Box<dyn DatabaseClient>> {
    let client = PostgresClient::connect(config).await?;
    Ok(Box::new(client))
}
