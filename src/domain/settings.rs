/// Reading goal settings and the academic-year label rule

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Identity};

/// Goal settings for one identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Who these settings belong to
    pub user_id: Identity,
    /// Number of books to complete this school year
    pub year_goal: u32,
    /// Free-text label such as "2024-2025"
    pub school_year: String,
}

impl Settings {
    /// Check goal and label before anything is sent to storage
    pub fn validate(year_goal: i64, school_year: &str) -> Result<(u32, String), DomainError> {
        if year_goal <= 0 {
            return Err(DomainError::InvalidGoal(format!(
                "Yearly goal must be greater than 0, got {}",
                year_goal
            )));
        }
        let year_goal = u32::try_from(year_goal).map_err(|_| {
            DomainError::InvalidGoal(format!("Yearly goal {} is too large", year_goal))
        })?;

        let label = school_year.trim();
        if label.is_empty() {
            return Err(DomainError::Validation {
                message: "School year cannot be empty".to_string(),
            });
        }

        Ok((year_goal, label.to_string()))
    }
}

/// Academic-year label for `date`
///
/// The school year runs August 1 through July 31.
pub fn school_year_for(date: NaiveDate) -> String {
    let year = date.year();
    if date.month() >= 8 {
        format!("{}-{}", year, year + 1)
    } else {
        format!("{}-{}", year - 1, year)
    }
}
