/// Tools for the yearly reading goal
///
/// This module implements the settings_get and settings_save MCP tools.

use chrono::{NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{school_year_for, Identity, Settings};
use crate::storage::BookStorage;
use crate::tools::ToolError;

/// Parameters for saving the goal
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SaveSettingsParams {
    /// Number of books to complete this school year (must be at least 1)
    pub year_goal: i64,
    /// School year label such as "2024-2025" (defaults to the current school year)
    pub school_year: Option<String>,
}

/// Response for reading or saving settings
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub success: bool,
    pub settings: Option<Settings>,
    /// Label to suggest when no settings are saved yet
    pub default_school_year: String,
    pub message: String,
}

/// Read the goal settings for `identity`
pub fn get_settings<S: BookStorage>(
    storage: &S,
    identity: &Identity,
    today: NaiveDate,
) -> Result<SettingsResponse, ToolError> {
    let settings = storage.get_settings(identity)?;
    let default_school_year = school_year_for(today);

    let message = match &settings {
        Some(s) => format!("🎯 Goal for {}: {} books", s.school_year, s.year_goal),
        None => format!(
            "No goal saved yet. Suggested school year: {}",
            default_school_year
        ),
    };

    Ok(SettingsResponse {
        success: true,
        settings,
        default_school_year,
        message,
    })
}

/// Validate and save the goal settings for `identity`
pub fn save_settings<S: BookStorage>(
    storage: &S,
    identity: &Identity,
    params: SaveSettingsParams,
    today: NaiveDate,
) -> Result<SettingsResponse, ToolError> {
    let default_school_year = school_year_for(today);
    let label = params
        .school_year
        .unwrap_or_else(|| default_school_year.clone());
    let (year_goal, school_year) = Settings::validate(params.year_goal, &label)?;

    let settings = storage.upsert_settings(identity, year_goal, &school_year)?;

    Ok(SettingsResponse {
        success: true,
        message: format!(
            "🎯 Saved goal of {} books for {}",
            settings.year_goal, settings.school_year
        ),
        settings: Some(settings),
        default_school_year,
    })
}

/// Today's date in UTC, as used for default school years
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
