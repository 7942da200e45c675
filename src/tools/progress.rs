/// Tool for checking progress towards the yearly goal
///
/// This module implements the reading_progress MCP tool.

use serde::Serialize;

use crate::analytics::GoalProgress;
use crate::domain::{Book, Identity};
use crate::storage::BookStorage;
use crate::tools::ToolError;

/// Response from checking progress
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub progress: GoalProgress,
    pub school_year: Option<String>,
    pub message: String,
}

/// Progress of `books` against the identity's goal (0 if none saved)
pub fn reading_progress<S: BookStorage>(
    storage: &S,
    identity: &Identity,
    books: &[Book],
) -> Result<ProgressResponse, ToolError> {
    let settings = storage.get_settings(identity)?;
    let goal = settings.as_ref().map_or(0, |s| s.year_goal);
    let progress = GoalProgress::compute(books, goal);

    let message = format!(
        "📊 {} / {} books ({}%)\n{}",
        progress.completed_count,
        progress.goal,
        progress.percent,
        progress.message()
    );

    Ok(ProgressResponse {
        school_year: settings.map(|s| s.school_year),
        progress,
        message,
    })
}
