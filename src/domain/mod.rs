/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Book, Settings), the status
/// lifecycle, and the list reconciler that keeps the displayed order in step
/// with the store.

pub mod book;
pub mod reconciler;
pub mod settings;
pub mod types;

// Re-export public types for easy access
pub use book::*;
pub use reconciler::*;
pub use settings::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid book title: {0}")]
    InvalidTitle(String),

    #[error("Invalid status {0}")]
    InvalidStatus(String),

    #[error("Invalid goal: {0}")]
    InvalidGoal(String),
}
