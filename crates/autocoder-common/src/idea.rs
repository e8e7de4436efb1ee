use serde::Serialize;
use thiserror::Error;

/// Minimum number of characters an idea must have after trimming.
pub const MIN_IDEA_LENGTH: usize = 10;

/// Rejection of user input before any pipeline stage starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(
        "Please provide a more detailed description (at least {min} characters, got {actual})"
    )]
    IdeaTooShort { min: usize, actual: usize },
}

/// A validated, trimmed app description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Idea(String);

impl Idea {
    /// Trim `text` and check it meets [`MIN_IDEA_LENGTH`].
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let trimmed = text.trim();
        let actual = trimmed.chars().count();
        if actual < MIN_IDEA_LENGTH {
            return Err(ValidationError::IdeaTooShort {
                min: MIN_IDEA_LENGTH,
                actual,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first `max` characters, respecting char boundaries.
    pub fn truncated(&self, max: usize) -> String {
        self.0.chars().take(max).collect()
    }
}

impl std::fmt::Display for Idea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
