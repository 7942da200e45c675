/// Tools for editing books
///
/// This module implements the book_update and book_advance MCP tools.
/// Updating a book that was deleted in the meantime is not an error: the
/// response simply reports that nothing was changed.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Book, BookPatch, BookStatus};
use crate::storage::BookStorage;
use crate::tools::{parse_book_id, ToolError};

/// Parameters for updating a book
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateBookParams {
    /// ID of the book to update
    pub book_id: String,
    /// New title (may be empty)
    pub title: Option<String>,
    /// New status: planned, reading or completed
    pub status: Option<String>,
}

/// Parameters for advancing a book to its next status
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AdvanceBookParams {
    /// ID of the book to advance
    pub book_id: String,
}

/// Response from updating or advancing a book
#[derive(Debug, Serialize)]
pub struct UpdateBookResponse {
    pub success: bool,
    /// False when the book no longer exists
    pub updated: bool,
    pub book: Option<Book>,
    pub message: String,
}

/// Update title and/or status of a book
pub fn update_book<S: BookStorage>(
    storage: &S,
    params: UpdateBookParams,
) -> Result<UpdateBookResponse, ToolError> {
    let book_id = parse_book_id(&params.book_id)?;

    let status = params
        .status
        .as_deref()
        .map(str::parse::<BookStatus>)
        .transpose()?;

    let patch = BookPatch {
        title: params.title,
        status,
        order: None,
    };
    if patch.is_empty() {
        return Ok(UpdateBookResponse {
            success: true,
            updated: false,
            book: storage.get_book(&book_id)?,
            message: "Nothing to update".to_string(),
        });
    }

    Ok(respond(storage.patch_book(&book_id, &patch)?))
}

/// Move a book to the next status in the planned → reading → completed cycle
pub fn advance_book<S: BookStorage>(
    storage: &S,
    params: AdvanceBookParams,
) -> Result<UpdateBookResponse, ToolError> {
    let book_id = parse_book_id(&params.book_id)?;

    let Some(current) = storage.get_book(&book_id)? else {
        return Ok(respond(None));
    };

    let patch = BookPatch::status(current.status.next());
    Ok(respond(storage.patch_book(&book_id, &patch)?))
}

fn respond(book: Option<Book>) -> UpdateBookResponse {
    match book {
        Some(book) => {
            let message = match book.status {
                BookStatus::Planned => format!("📋 '{}' is planned", book.display_title()),
                BookStatus::Reading => format!("📖 Now reading '{}'", book.display_title()),
                BookStatus::Completed => format!("✅ Finished '{}'!", book.display_title()),
            };
            UpdateBookResponse {
                success: true,
                updated: true,
                book: Some(book),
                message,
            }
        }
        None => UpdateBookResponse {
            success: true,
            updated: false,
            book: None,
            message: "Book no longer exists; nothing was changed".to_string(),
        },
    }
}
