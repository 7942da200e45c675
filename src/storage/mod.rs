/// Storage layer for persisting the reading list
///
/// This module handles all database operations using SQLite. It provides
/// a clean interface for storing and retrieving books and goal settings.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;
use crate::domain::{Book, BookId, BookPatch, Identity, OrderUpdate, Settings};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Corrupt {column} value in stored row: {value}")]
    CorruptRow { column: &'static str, value: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the ordered collection store
///
/// Every method touches records independently. Nothing here is
/// transactional across records: in particular `batch_set_order` applies its
/// patches one by one, and an interruption part-way leaves some books with
/// new order values and others with old ones. Callers must treat batch
/// operations as best-effort.
pub trait BookStorage {
    /// All books, ascending by order (ties in insertion order)
    fn list_books(&self) -> Result<Vec<Book>, StorageError>;

    /// Get a book by ID
    fn get_book(&self, book_id: &BookId) -> Result<Option<Book>, StorageError>;

    /// Insert a planned book at the end of the list (order = max + 1, or 1)
    fn insert_book(&self, title: &str) -> Result<BookId, StorageError>;

    /// Apply a partial update, including status lifecycle side effects
    ///
    /// Returns `None` without error when the book no longer exists.
    fn patch_book(&self, book_id: &BookId, patch: &BookPatch) -> Result<Option<Book>, StorageError>;

    /// Delete a book; deleting a missing book is not an error
    fn delete_book(&self, book_id: &BookId) -> Result<bool, StorageError>;

    /// Set the order of each listed book, one record at a time
    ///
    /// Returns how many books were updated. Ids that no longer exist are skipped.
    fn batch_set_order(&self, updates: &[OrderUpdate]) -> Result<usize, StorageError>;

    /// Delete every book, returning how many were removed
    fn clear_all_books(&self) -> Result<usize, StorageError>;

    /// Settings for an identity, if any were saved
    fn get_settings(&self, identity: &Identity) -> Result<Option<Settings>, StorageError>;

    /// Patch the identity's settings if present, otherwise insert them
    fn upsert_settings(
        &self,
        identity: &Identity,
        year_goal: u32,
        school_year: &str,
    ) -> Result<Settings, StorageError>;
}
