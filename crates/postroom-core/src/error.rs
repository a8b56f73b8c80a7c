//! Error types for the core library.

use thiserror::Error;

use crate::account::ValidationError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An argument was blank or out of range.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Mail metadata could not be parsed.
    #[error("Invalid mail metadata: {0}")]
    Metadata(#[from] postroom_text::Error),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Another account already uses this name.
    #[error("Account with name '{0}' already exists")]
    AccountNameTaken(String),

    /// Another account already uses this email address.
    #[error("Account with email '{0}' already exists")]
    AccountEmailTaken(String),

    /// Folder not found.
    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    /// Folder already exists.
    #[error("Folder already exists: {0}")]
    FolderAlreadyExists(String),

    /// Folder path is malformed or its parent does not exist.
    #[error("Invalid folder path: {0}")]
    InvalidPath(String),

    /// A rule definition repeats a condition key.
    #[error("Rule condition '{0}' is defined more than once")]
    DuplicateRuleKey(&'static str),

    /// A rule with the same priority and conditions already exists.
    #[error("Conflicting rule with priority {priority} (target folder {folder})")]
    RuleConflict {
        /// Priority shared by both rules.
        priority: i32,
        /// Target folder of the rejected rule.
        folder: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl Error {
    /// Blank or malformed caller input (including unparsable metadata).
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Metadata(_))
    }

    /// A referenced account or folder does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::AccountNotFound(_) | Self::FolderNotFound(_))
    }

    /// An account or folder with the same identity already exists.
    #[must_use]
    pub const fn is_already_exists(&self) -> bool {
        matches!(
            self,
            Self::AccountNameTaken(_) | Self::AccountEmailTaken(_) | Self::FolderAlreadyExists(_)
        )
    }

    /// A rule clashes with itself (repeated key) or with an existing rule.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateRuleKey(_) | Self::RuleConflict { .. })
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
