//! Argument validation.

/// Validation error for caller supplied arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Account name is blank.
    BlankAccountName,
    /// Email address is blank.
    BlankEmail,
    /// Folder path is blank.
    BlankFolderPath,
    /// Rule definition is blank.
    BlankRuleDefinition,
    /// Mail metadata is blank.
    BlankMetadata,
    /// Mail content is blank.
    BlankContent,
    /// Rule priority is outside the accepted range.
    PriorityOutOfRange {
        /// The rejected priority.
        priority: i32,
        /// Lowest accepted priority.
        min: i32,
        /// Highest accepted priority.
        max: i32,
    },
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::BlankAccountName => "Account name can not be empty or blank",
            Self::BlankEmail => "Email can not be empty or blank",
            Self::BlankFolderPath => "Folder path can not be empty or blank",
            Self::BlankRuleDefinition => "Rule definition can not be empty or blank",
            Self::BlankMetadata => "Mail metadata can not be empty or blank",
            Self::BlankContent => "Mail content can not be empty or blank",
            Self::PriorityOutOfRange { .. } => "Priority out of bounds",
        }
    }

    /// Get the field name this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::BlankAccountName => "account_name",
            Self::BlankEmail => "email",
            Self::BlankFolderPath => "folder_path",
            Self::BlankRuleDefinition => "rule_definition",
            Self::BlankMetadata => "mail_metadata",
            Self::BlankContent => "mail_content",
            Self::PriorityOutOfRange { .. } => "priority",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PriorityOutOfRange { priority, min, max } => {
                write!(f, "{} ({priority} not in {min}..={max})", self.message())
            }
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Fails with `error` if `value` is empty or only whitespace.
///
/// # Errors
///
/// Returns `error` for blank values.
pub fn require_non_blank(value: &str, error: ValidationError) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error)
    } else {
        Ok(())
    }
}

/// Fails if `priority` is outside `min..=max`.
///
/// # Errors
///
/// Returns [`ValidationError::PriorityOutOfRange`].
pub const fn require_priority(priority: i32, min: i32, max: i32) -> Result<(), ValidationError> {
    if priority < min || priority > max {
        Err(ValidationError::PriorityOutOfRange { priority, min, max })
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_rejected() {
        for blank in ["", " ", "\t\n", "   \r\n"] {
            assert_eq!(
                require_non_blank(blank, ValidationError::BlankEmail),
                Err(ValidationError::BlankEmail)
            );
        }
    }

    #[test]
    fn test_non_blank_value_accepted() {
        assert!(require_non_blank(" a@x.com ", ValidationError::BlankEmail).is_ok());
    }

    #[test]
    fn test_priority_bounds() {
        assert!(require_priority(1, 1, 10).is_ok());
        assert!(require_priority(10, 1, 10).is_ok());
        assert!(require_priority(0, 1, 10).is_err());
        assert!(require_priority(-5, 1, 10).is_err());
        assert_eq!(
            require_priority(11, 1, 10),
            Err(ValidationError::PriorityOutOfRange {
                priority: 11,
                min: 1,
                max: 10
            })
        );
    }

    #[test]
    fn test_field_and_message() {
        assert_eq!(ValidationError::BlankFolderPath.field(), "folder_path");
        assert_eq!(
            ValidationError::PriorityOutOfRange {
                priority: 0,
                min: 1,
                max: 10
            }
            .to_string(),
            "Priority out of bounds (0 not in 1..=10)"
        );
    }
}
