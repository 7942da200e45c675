/// Tool for listing the reading list
///
/// This module implements the book_list MCP tool. The list shown is the
/// reconciler's view, so a move that the store has not confirmed yet is
/// already reflected.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Book, BookStatus, Identity, ListReconciler, SyncState};
use crate::storage::BookStorage;
use crate::tools::{reading_progress, sync_snapshot, ProgressResponse, ToolError};

/// Parameters for listing books
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListBooksParams {
    /// Only show books with this status (planned, reading, completed)
    pub status: Option<String>,
}

/// One row of the list
#[derive(Debug, Serialize)]
pub struct BookSummary {
    pub book_id: String,
    /// 1-based position in the displayed list
    pub position: usize,
    pub title: String,
    pub status: BookStatus,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
}

/// Response from listing books
#[derive(Debug, Serialize)]
pub struct ListBooksResponse {
    pub books: Vec<BookSummary>,
    pub progress: ProgressResponse,
    pub state: SyncState,
}

/// List books in display order, with goal progress
pub fn list_books<S: BookStorage>(
    storage: &S,
    reconciler: &mut ListReconciler,
    identity: &Identity,
    params: ListBooksParams,
) -> Result<ListBooksResponse, ToolError> {
    let status_filter = params
        .status
        .as_deref()
        .map(str::parse::<BookStatus>)
        .transpose()?;

    sync_snapshot(storage, reconciler)?;

    let books: Vec<BookSummary> = reconciler
        .books()
        .iter()
        .enumerate()
        .filter(|(_, book)| status_filter.map_or(true, |s| book.status == s))
        .map(|(i, book)| summarize(i + 1, book))
        .collect();

    let progress = reading_progress(storage, identity, reconciler.books())?;

    Ok(ListBooksResponse {
        books,
        progress,
        state: reconciler.state(),
    })
}

fn summarize(position: usize, book: &Book) -> BookSummary {
    BookSummary {
        book_id: book.id.to_string(),
        position,
        title: book.display_title().to_string(),
        status: book.status,
        started_at: book.started_at.map(|d| d.date_naive().to_string()),
        completed_at: book.completed_at.map(|d| d.date_naive().to_string()),
    }
}
