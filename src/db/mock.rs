//! Mock database clients for testing.
//!
//! `MockDatabaseClient` returns canned rows; `FailingDatabaseClient` always
//! errors, simulating an unreachable database.

use super::{ColumnInfo, DatabaseClient, QueryResult, Row, Value};
use crate::error::{AskError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// A mock database client that returns predefined rows for any keyword.
pub struct MockDatabaseClient {
    rows: Vec<Row>,
}

impl MockDatabaseClient {
    /// Creates a mock client that returns no rows.
    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// Creates a mock client that returns one content row per string.
    pub fn with_contents(contents: &[&str]) -> Self {
        Self {
            rows: contents
                .iter()
                .map(|c| vec![Value::from(*c)])
                .collect(),
        }
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::empty()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn search_content(&self, _keyword: &str) -> Result<QueryResult> {
        let columns = vec![ColumnInfo::new("content", "text")];
        Ok(QueryResult::with_data(columns, self.rows.clone())
            .with_execution_time(Duration::from_millis(1)))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A database client whose every lookup fails, as if the server is down.
pub struct FailingDatabaseClient;

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn search_content(&self, _keyword: &str) -> Result<QueryResult> {
        Err(AskError::connection(
            "Cannot connect to localhost:5432. Check that the server is running.",
        ))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
