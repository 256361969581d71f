use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Maximum length of a habit name, in characters.
pub const MAX_NAME_LEN: usize = 60;

/// A daily practice and the days it was completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub completions: BTreeSet<NaiveDate>,
}

/// Trim and check a habit name.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let len = trimmed.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong {
            len,
            max: MAX_NAME_LEN,
        });
    }
    Ok(trimmed.to_string())
}

impl Habit {
    /// Create a habit with a fresh id and no completions.
    pub fn new(
        name: &str,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: validate_name(name)?,
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            created_at,
            archived: false,
            completions: BTreeSet::new(),
        })
    }

    pub fn rename(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = validate_name(name)?;
        Ok(())
    }

    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    pub fn is_completed_on(&self, day: NaiveDate) -> bool {
        self.completions.contains(&day)
    }

    /// Mark `day` done. Returns `false` if it already was.
    pub fn complete(&mut self, day: NaiveDate, today: NaiveDate) -> Result<bool, ValidationError> {
        if day > today {
            return Err(ValidationError::FutureDay { day, today });
        }
        Ok(self.completions.insert(day))
    }

    /// Clear `day`. Returns `false` if it was not marked.
    pub fn uncomplete(&mut self, day: NaiveDate) -> bool {
        self.completions.remove(&day)
    }

    /// Flip the completion state of `day` and return the new state.
    pub fn toggle_completion(
        &mut self,
        day: NaiveDate,
        today: NaiveDate,
    ) -> Result<bool, ValidationError> {
        if self.is_completed_on(day) {
            self.uncomplete(day);
            Ok(false)
        } else {
            self.complete(day, today)?;
            Ok(true)
        }
    }

    pub fn total_completions(&self) -> usize {
        self.completions.len()
    }
}
