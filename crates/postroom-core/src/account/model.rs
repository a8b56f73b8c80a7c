//! Account model types.

use serde::{Deserialize, Serialize};

/// A registered mail account.
///
/// Accounts are immutable once created; the registry guarantees that both
/// the name and the email address are unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Account {
    /// Email address.
    pub email: String,
    /// Account name, also the key the account is registered under.
    pub name: String,
}

impl Account {
    /// Creates a new account.
    #[must_use]
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }

    /// Returns a display string for the account, "Name <email>".
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let account = Account::new("stoyo@fmi.bg", "stoyo");
        assert_eq!(account.email, "stoyo@fmi.bg");
        assert_eq!(account.name, "stoyo");
    }

    #[test]
    fn test_display() {
        let account = Account::new("stoyo@fmi.bg", "Stoyo");
        assert_eq!(account.display(), "Stoyo <stoyo@fmi.bg>");
        assert_eq!(format!("{account}"), "Stoyo");
    }

    #[test]
    fn test_equality_is_structural() {
        assert_eq!(
            Account::new("a@x.com", "a"),
            Account::new("a@x.com", "a")
        );
        assert_ne!(
            Account::new("a@x.com", "a"),
            Account::new("a@x.com", "b")
        );
    }
}
