/// Tool for adding books to the reading list
///
/// This module implements the book_add MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::Book;
use crate::storage::BookStorage;
use crate::tools::ToolError;

/// Parameters for adding a book
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddBookParams {
    /// Title of the book (leading/trailing whitespace is trimmed)
    pub title: String,
}

/// Response from adding a book
#[derive(Debug, Serialize)]
pub struct AddBookResponse {
    pub success: bool,
    pub book_id: String,
    pub message: String,
}

/// Add a planned book to the end of the list
pub fn add_book<S: BookStorage>(
    storage: &S,
    params: AddBookParams,
) -> Result<AddBookResponse, ToolError> {
    let title = Book::validate_new_title(&params.title)?;
    let book_id = storage.insert_book(&title)?;

    Ok(AddBookResponse {
        success: true,
        book_id: book_id.to_string(),
        message: format!("📚 Added '{}' to your reading list", title),
    })
}
