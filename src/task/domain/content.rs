//! Validated free-text fields of a task.

use super::TaskDomainError;
use serde::Serialize;
use std::fmt;

/// Minimum title length, in characters.
pub const MIN_TITLE_LENGTH: usize = 3;

/// Maximum title length, in characters.
pub const MAX_TITLE_LENGTH: usize = 120;

/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Task title of 3 to 120 characters after trimming.
///
/// # Examples
///
///     use taskboard::task::domain::TaskTitle;
///
///     let title = TaskTitle::new("  Write release notes ").expect("valid");
///     assert_eq!(title.as_str(), "Write release notes");
///     assert!(TaskTitle::new("ok").is_err());
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TitleTooShort`] or
    /// [`TaskDomainError::TitleTooLong`] when the trimmed length is out of
    /// range.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let length = trimmed.chars().count();

        if length < MIN_TITLE_LENGTH {
            return Err(TaskDomainError::TitleTooShort {
                min: MIN_TITLE_LENGTH,
                actual: length,
            });
        }
        if length > MAX_TITLE_LENGTH {
            return Err(TaskDomainError::TitleTooLong {
                max: MAX_TITLE_LENGTH,
                actual: length,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task description of at most 2000 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Creates a validated description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DescriptionTooLong`] when the value exceeds
    /// [`MAX_DESCRIPTION_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let length = raw.chars().count();
        if length > MAX_DESCRIPTION_LENGTH {
            return Err(TaskDomainError::DescriptionTooLong {
                max: MAX_DESCRIPTION_LENGTH,
                actual: length,
            });
        }
        Ok(Self(raw))
    }

    /// Returns the description as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskDescription {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
