//! Registry of all mailboxes.

use std::collections::BTreeMap;

use super::mailbox::Mailbox;
use super::model::Account;
use crate::error::{Error, Result};

/// All mailboxes known to a mail client, keyed by account name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    mailboxes: BTreeMap<String, Mailbox>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new account with an empty mailbox.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AccountNameTaken`] or [`Error::AccountEmailTaken`] if
    /// another account already uses the name or the email.
    pub fn register(&mut self, account: Account) -> Result<&Account> {
        if self.contains(&account.name) {
            return Err(Error::AccountNameTaken(account.name));
        }
        if self.find_by_email(&account.email).is_some() {
            return Err(Error::AccountEmailTaken(account.email));
        }

        let mailbox = self
            .mailboxes
            .entry(account.name.clone())
            .or_insert_with(|| Mailbox::new(account));
        Ok(mailbox.account())
    }

    /// Mailbox of the named account.
    #[must_use]
    pub fn mailbox(&self, name: &str) -> Option<&Mailbox> {
        self.mailboxes.get(name)
    }

    /// Mutable mailbox of the named account.
    pub fn mailbox_mut(&mut self, name: &str) -> Option<&mut Mailbox> {
        self.mailboxes.get_mut(name)
    }

    /// Looks up the mailbox of `name`, failing if it is not registered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AccountNotFound`].
    pub fn require(&self, name: &str) -> Result<&Mailbox> {
        self.mailbox(name)
            .ok_or_else(|| Error::AccountNotFound(name.to_string()))
    }

    /// Mutable variant of [`Self::require`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::AccountNotFound`].
    pub fn require_mut(&mut self, name: &str) -> Result<&mut Mailbox> {
        self.mailbox_mut(name)
            .ok_or_else(|| Error::AccountNotFound(name.to_string()))
    }

    /// Finds the account that owns `email`.
    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts().find(|account| account.email == email)
    }

    /// Registered accounts, ordered by name.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.mailboxes.values().map(Mailbox::account)
    }

    /// True if an account with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.mailboxes.contains_key(name)
    }

    /// Number of registered accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mailboxes.len()
    }

    /// True if no account is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mailboxes.is_empty()
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
    fn test_register() {
        let mut registry = Registry::new();
        let account = registry.register(Account::new("a@x.com", "a")).unwrap();
        assert_eq!(account.email, "a@x.com");
        assert!(registry.contains("a"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_name_taken() {
        let mut registry = Registry::new();
        registry.register(Account::new("a@x.com", "a")).unwrap();
        assert!(matches!(
            registry.register(Account::new("other@x.com", "a")),
            Err(Error::AccountNameTaken(name)) if name == "a"
        ));
    }

    #[test]
    fn test_email_taken() {
        let mut registry = Registry::new();
        registry.register(Account::new("a@x.com", "a")).unwrap();
        assert!(matches!(
            registry.register(Account::new("a@x.com", "other")),
            Err(Error::AccountEmailTaken(email)) if email == "a@x.com"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_find_by_email() {
        let mut registry = Registry::new();
        registry.register(Account::new("a@x.com", "a")).unwrap();
        registry.register(Account::new("b@x.com", "b")).unwrap();

        assert_eq!(registry.find_by_email("b@x.com").unwrap().name, "b");
        assert!(registry.find_by_email("c@x.com").is_none());
    }

    #[test]
    fn test_require_unknown() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());
        assert!(matches!(registry.require("ghost"), Err(Error::AccountNotFound(_))));
        assert!(matches!(
            registry.require_mut("ghost"),
            Err(Error::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_accounts_ordered_by_name() {
        let mut registry = Registry::new();
        registry.register(Account::new("z@x.com", "zed")).unwrap();
        registry.register(Account::new("a@x.com", "amy")).unwrap();

        let names: Vec<&str> = registry.accounts().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["amy", "zed"]);
    }
}
