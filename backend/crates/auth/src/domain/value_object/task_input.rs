//! Task Input Value Object
//!
//! Validated title/description pair for task writes. Runs upstream of
//! persistence: the title must be markup-free (it is rendered back to
//! the UI), the description is sanitized rather than rejected.

use platform::sanitize::{contains_script_markup, sanitize_input};
use thiserror::Error;

/// Maximum title length
pub const TITLE_MAX_LENGTH: usize = 100;

/// Maximum description length
pub const DESCRIPTION_MAX_LENGTH: usize = 500;

/// Task field validation errors
///
/// Every failed rule is reported; callers surface the full list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskInputError {
    #[error("Title is required")]
    TitleRequired,

    #[error("Title must be at most {TITLE_MAX_LENGTH} characters")]
    TitleTooLong,

    /// Distinct from sanitization: titles carrying script markup are
    /// rejected outright, never silently cleaned.
    #[error("Title must not contain script markup")]
    TitleContainsMarkup,

    #[error("Description is required")]
    DescriptionRequired,

    #[error("Description must be at most {DESCRIPTION_MAX_LENGTH} characters")]
    DescriptionTooLong,
}

/// Validated task input, sanitized and ready for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    title: String,
    description: String,
}

impl TaskInput {
    /// Validate and sanitize a title/description pair.
    ///
    /// Collects every violation instead of stopping at the first.
    pub fn new(title: &str, description: &str) -> Result<Self, Vec<TaskInputError>> {
        let mut errors = Vec::new();

        let title = title.trim();
        if title.is_empty() {
            errors.push(TaskInputError::TitleRequired);
        } else {
            if title.chars().count() > TITLE_MAX_LENGTH {
                errors.push(TaskInputError::TitleTooLong);
            }
            if contains_script_markup(title) {
                errors.push(TaskInputError::TitleContainsMarkup);
            }
        }

        let description = description.trim();
        if description.is_empty() {
            errors.push(TaskInputError::DescriptionRequired);
        } else if description.chars().count() > DESCRIPTION_MAX_LENGTH {
            errors.push(TaskInputError::DescriptionTooLong);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            title: sanitize_input(title),
            description: sanitize_input(description),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
