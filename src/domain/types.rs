/// Core types and enums used throughout the domain layer
///
/// This module defines the fundamental types like BookId, BookStatus and
/// Identity that are used by Book, Settings, and the list reconciler.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a book
///
/// This is a wrapper around UUID to provide type safety. Ids are assigned
/// once at creation and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(pub Uuid);

impl BookId {
    /// Generate a new random book ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a book ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a book sits in the reading workflow
///
/// The "advance" action cycles planned → reading → completed → planned;
/// any state can also be set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    /// On the list, not started yet
    Planned,
    /// Currently being read
    Reading,
    /// Finished
    Completed,
}

impl BookStatus {
    /// The status the cyclic "advance" action moves to
    pub fn next(self) -> Self {
        match self {
            BookStatus::Planned => BookStatus::Reading,
            BookStatus::Reading => BookStatus::Completed,
            BookStatus::Completed => BookStatus::Planned,
        }
    }

    /// Lowercase name used in storage and tool arguments
    pub fn as_str(self) -> &'static str {
        match self {
            BookStatus::Planned => "planned",
            BookStatus::Reading => "reading",
            BookStatus::Completed => "completed",
        }
    }

    /// Short human-readable hint shown next to a book
    pub fn display_hint(self) -> &'static str {
        match self {
            BookStatus::Planned => "Planned",
            BookStatus::Reading => "Currently reading",
            BookStatus::Completed => "Completed!",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planned" => Ok(BookStatus::Planned),
            "reading" => Ok(BookStatus::Reading),
            "completed" => Ok(BookStatus::Completed),
            other => Err(DomainError::InvalidStatus(format!(
                "'{}'. Valid options: planned, reading, completed",
                other
            ))),
        }
    }
}

/// Identity literal used when no authenticated subject is available
pub const DEFAULT_IDENTITY: &str = "default";

/// Who a settings record belongs to
///
/// Resolved once from configuration; storage never falls back on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    /// Create an identity, rejecting blank values
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation {
                message: "Identity cannot be empty".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Use the authenticated subject if there is one, otherwise the fallback
    pub fn resolve(subject: Option<&str>, fallback: &Identity) -> Identity {
        match subject.map(str::trim) {
            Some(s) if !s.is_empty() => Identity(s.to_string()),
            _ => fallback.clone(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self(DEFAULT_IDENTITY.to_string())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
