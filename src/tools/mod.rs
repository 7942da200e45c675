/// MCP tools for managing the reading list
///
/// This module contains all the MCP tools that external clients can call to
/// interact with the reading tracker. Each tool is a plain function over a
/// `BookStorage`, so it can be exercised without the protocol layer.

pub mod add;
pub mod list;
pub mod progress;
pub mod remove;
pub mod reorder;
pub mod settings;
pub mod update;

// Re-export tool functions for easy access
pub use add::*;
pub use list::*;
pub use progress::*;
pub use remove::*;
pub use reorder::*;
pub use settings::*;
pub use update::*;

use thiserror::Error;

use crate::domain::{BookId, DomainError, ListReconciler, SnapshotOutcome};
use crate::storage::{BookStorage, StorageError};

/// Errors a tool call can report back to the client
#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Invalid book id: '{0}'")]
    InvalidBookId(String),
}

/// Parse a book id from a tool argument
pub fn parse_book_id(raw: &str) -> Result<BookId, ToolError> {
    BookId::from_string(raw).map_err(|_| ToolError::InvalidBookId(raw.to_string()))
}

/// Pull the store's current list into the reconciler
///
/// Stands in for the live subscription: called after every mutation so the
/// reconciler sees what a subscriber would have been pushed.
pub fn sync_snapshot<S: BookStorage>(
    storage: &S,
    reconciler: &mut ListReconciler,
) -> Result<SnapshotOutcome, StorageError> {
    let snapshot = storage.list_books()?;
    let outcome = reconciler.on_server_snapshot(snapshot);
    tracing::debug!(?outcome, state = ?reconciler.state(), "Snapshot delivered");
    Ok(outcome)
}
