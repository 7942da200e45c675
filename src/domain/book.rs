/// Book entity and the status lifecycle rules
///
/// This module defines the Book struct that represents one entry on the
/// reading list, the partial patch applied by updates, and the timestamp
/// bookkeeping that accompanies every status transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{BookId, BookStatus, DomainError};

/// A book on the reading list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier for this book
    pub id: BookId,
    /// Title as entered; may be empty
    pub title: String,
    /// Where the book is in the reading workflow
    pub status: BookStatus,
    /// Display position; ascending order is list order
    pub order: i64,
    /// First time the book entered `reading` (cleared on reset)
    pub started_at: Option<DateTime<Utc>>,
    /// Most recent time the book entered `completed` (cleared on reset)
    pub completed_at: Option<DateTime<Utc>>,
}

impl Book {
    /// Create a freshly added book: always `planned`, no timestamps
    pub fn new(title: String, order: i64) -> Self {
        Self {
            id: BookId::new(),
            title,
            status: BookStatus::Planned,
            order,
            started_at: None,
            completed_at: None,
        }
    }

    /// Create a book from existing data (used when loading from database)
    pub fn from_existing(
        id: BookId,
        title: String,
        status: BookStatus,
        order: i64,
        started_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            title,
            status,
            order,
            started_at,
            completed_at,
        }
    }

    /// Title for display; an empty title shows as "Untitled"
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }

    /// Move to `status`, applying the timestamp side effects
    ///
    /// | target    | started_at     | completed_at |
    /// |-----------|----------------|--------------|
    /// | reading   | now if unset   | unchanged    |
    /// | completed | now if unset   | now          |
    /// | planned   | cleared        | cleared      |
    pub fn transition_to(&mut self, status: BookStatus, now: DateTime<Utc>) {
        self.status = status;
        match status {
            BookStatus::Reading => {
                if self.started_at.is_none() {
                    self.started_at = Some(now);
                }
            }
            BookStatus::Completed => {
                if self.started_at.is_none() {
                    self.started_at = Some(now);
                }
                self.completed_at = Some(now);
            }
            BookStatus::Planned => {
                self.started_at = None;
                self.completed_at = None;
            }
        }
    }

    /// Apply a partial update; status changes go through `transition_to`
    pub fn apply_patch(&mut self, patch: &BookPatch, now: DateTime<Utc>) {
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(status) = patch.status {
            self.transition_to(status, now);
        }
    }

    /// Validate a title for a new book; returns the trimmed title
    pub fn validate_new_title(title: &str) -> Result<String, DomainError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidTitle(
                "Book title cannot be empty".to_string(),
            ));
        }
        Ok(trimmed.to_string())
    }
}

/// Partial update for a book; `None` fields are left as they are
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookPatch {
    pub title: Option<String>,
    pub status: Option<BookStatus>,
    pub order: Option<i64>,
}

impl BookPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn status(status: BookStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.status.is_none() && self.order.is_none()
    }
}

/// One entry of a batched reorder request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: BookId,
    pub order: i64,
}
