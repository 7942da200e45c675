/// Public library interface for the Chronicle reading tracker
///
/// This module exports the server implementation and the public types
/// (books, settings, the list reconciler, progress) used by the binary and
/// by tests.

use thiserror::Error;

// Internal modules
mod analytics;
mod config;
mod domain;
mod mcp;
mod storage;
pub mod tools;

// Re-export public modules and types
pub use analytics::GoalProgress;
pub use config::{default_database_path, prepare_database_path, TrackerConfig};
pub use domain::*;
pub use mcp::McpServer;
pub use storage::{BookStorage, SqliteStorage, StorageError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reading tracker server that implements the MCP protocol
///
/// Owns the book store, the configured identity, and the reconciler that
/// holds the client-visible ordering of the list.
pub struct ReadingTrackerServer {
    storage: SqliteStorage,
    config: TrackerConfig,
    reconciler: ListReconciler,
}

impl ReadingTrackerServer {
    /// Create a new server from configuration
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist, and load the current list.
    pub async fn new(config: TrackerConfig) -> Result<Self, ServerError> {
        tracing::info!("Initializing Chronicle server with database: {:?}", config.database);

        let storage = SqliteStorage::new(config.database.clone())?;
        let reconciler = ListReconciler::with_snapshot(storage.list_books()?);

        Ok(Self {
            storage,
            config,
            reconciler,
        })
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!(
            "Server started for identity '{}', {} books on the list",
            self.config.identity,
            self.reconciler.books().len()
        );

        let mut mcp_server = McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn reconciler(&self) -> &ListReconciler {
        &self.reconciler
    }

    /// Storage plus the reconciler, borrowed together for tool calls
    pub fn session(&mut self) -> (&SqliteStorage, &mut ListReconciler) {
        (&self.storage, &mut self.reconciler)
    }
}
