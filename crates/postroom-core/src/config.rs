//! Mail client configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Settings of a [`PostOffice`](crate::PostOffice).
///
/// Missing fields take their defaults when deserializing:
///
/// ```
/// use postroom_core::ClientConfig;
///
/// let config = ClientConfig::from_json(r#"{ "max_priority": 5 }"#)?;
/// assert_eq!(config.min_priority, 1);
/// assert_eq!(config.max_priority, 5);
/// assert!(config.deliver_locally);
/// # Ok::<(), postroom_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Lowest accepted rule priority (evaluated first).
    pub min_priority: i32,
    /// Highest accepted rule priority.
    pub max_priority: i32,
    /// Whether sent mail is delivered to recipients registered locally.
    pub deliver_locally: bool,
}

impl ClientConfig {
    /// Default lowest rule priority.
    pub const DEFAULT_MIN_PRIORITY: i32 = 1;
    /// Default highest rule priority.
    pub const DEFAULT_MAX_PRIORITY: i32 = 10;

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serde`] for malformed JSON and [`Error::Config`] if
    /// the values are inconsistent.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serde`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that the priority range is non-empty and starts at 1 or above.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the problem.
    pub fn validate(&self) -> Result<()> {
        if self.min_priority < 1 {
            return Err(Error::Config("min_priority must be at least 1".into()));
        }
        if self.min_priority > self.max_priority {
            return Err(Error::Config(format!(
                "min_priority {} is greater than max_priority {}",
                self.min_priority, self.max_priority
            )));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            min_priority: Self::DEFAULT_MIN_PRIORITY,
            max_priority: Self::DEFAULT_MAX_PRIORITY,
            deliver_locally: true,
        }
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
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.min_priority, 1);
        assert_eq!(config.max_priority, 10);
        assert!(config.deliver_locally);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(ClientConfig::from_json("{}").unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ClientConfig {
            min_priority: 2,
            max_priority: 3,
            deliver_locally: false,
        };
        let json = config.to_json().unwrap();
        assert_eq!(ClientConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_range() {
        assert!(matches!(
            ClientConfig::from_json(r#"{ "min_priority": 0 }"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ClientConfig::from_json(r#"{ "min_priority": -3 }"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ClientConfig::from_json(r#"{ "min_priority": 8, "max_priority": 3 }"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ClientConfig::from_json("not json"),
            Err(Error::Serde(_))
        ));
    }
}
