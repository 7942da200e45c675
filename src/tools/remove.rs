/// Tools for deleting books
///
/// This module implements the book_remove and books_clear MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::storage::BookStorage;
use crate::tools::{parse_book_id, ToolError};

/// Parameters for removing a book
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RemoveBookParams {
    /// ID of the book to delete
    pub book_id: String,
}

/// Response from removing books
#[derive(Debug, Serialize)]
pub struct RemoveBooksResponse {
    pub success: bool,
    pub removed: usize,
    pub message: String,
}

/// Delete one book; removing a book twice is fine
pub fn remove_book<S: BookStorage>(
    storage: &S,
    params: RemoveBookParams,
) -> Result<RemoveBooksResponse, ToolError> {
    let book_id = parse_book_id(&params.book_id)?;
    let removed = storage.delete_book(&book_id)?;

    let message = if removed {
        "🗑️ Removed book from your list".to_string()
    } else {
        "Book was already removed".to_string()
    };

    Ok(RemoveBooksResponse {
        success: true,
        removed: usize::from(removed),
        message,
    })
}

/// Delete every book on the list
pub fn clear_books<S: BookStorage>(storage: &S) -> Result<RemoveBooksResponse, ToolError> {
    let removed = storage.clear_all_books()?;

    Ok(RemoveBooksResponse {
        success: true,
        removed,
        message: format!("🧹 Cleared {} books from your list", removed),
    })
}
