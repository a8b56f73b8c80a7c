//! Per-account mailbox aggregate.

use tracing::debug;

use super::model::Account;
use crate::directory::{Directory, FolderPath};
use crate::error::{Error, Result};
use crate::mail::Mail;
use crate::rule::{Rule, RuleSet};

/// An account together with its folders and filtering rules.
#[derive(Debug, Clone)]
pub struct Mailbox {
    account: Account,
    directory: Directory,
    rules: RuleSet,
}

impl Mailbox {
    /// Creates a mailbox with the fixed folders and no rules.
    #[must_use]
    pub fn new(account: Account) -> Self {
        Self {
            account,
            directory: Directory::new(),
            rules: RuleSet::new(),
        }
    }

    /// The owning account.
    #[must_use]
    pub const fn account(&self) -> &Account {
        &self.account
    }

    /// The folder tree.
    #[must_use]
    pub const fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Creates a user folder.
    ///
    /// # Errors
    ///
    /// See [`Directory::add_path`].
    pub fn create_folder(&mut self, path: &str) -> Result<FolderPath> {
        self.directory.add_path(path)
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Adds a rule and files already queued inbox mail that fits it.
    ///
    /// Returns the number of mails moved out of `/inbox`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FolderNotFound`] if the rule's folder does not exist
    /// and [`Error::RuleConflict`] if an equivalent rule exists. Nothing is
    /// changed on error.
    pub fn add_rule(&mut self, rule: Rule) -> Result<usize> {
        if !self.directory.contains(rule.folder().as_str()) {
            return Err(Error::FolderNotFound(rule.folder().to_string()));
        }

        self.rules.insert(rule.clone())?;
        self.directory.move_from_inbox_by_rule(&rule)
    }

    /// Files an incoming mail into the folder of the first fitting rule, or
    /// into `/inbox` when no rule fits.
    ///
    /// Returns the folder the mail was filed into.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FolderNotFound`] if the rule's folder is missing.
    pub fn deliver(&mut self, mail: Mail) -> Result<FolderPath> {
        let Some(rule) = self.rules.first_match(&mail) else {
            debug!("No rule fits mail for {}, filing into /inbox", self.account);
            self.directory.add_to_inbox(mail);
            return Ok(FolderPath::inbox());
        };

        let folder = rule.folder().clone();
        debug!(
            "Rule with priority {} files mail for {} into {folder}",
            rule.priority(),
            self.account
        );
        self.directory.add_mail(folder.as_str(), mail)?;
        Ok(folder)
    }

    /// Files an outgoing mail into `/sent`.
    pub fn record_sent(&mut self, mail: Mail) {
        self.directory.add_to_sent(mail);
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
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn mailbox() -> Mailbox {
        Mailbox::new(Account::new("b@x.com", "b"))
    }

    fn mail(subject: &str) -> Mail {
        Mail {
            sender: None,
            recipients: BTreeSet::from(["b@x.com".to_string()]),
            subject: subject.to_string(),
            body: "body".to_string(),
            received: NaiveDate::from_ymd_opt(2022, 12, 8)
                .unwrap()
                .and_hms_opt(14, 14, 0)
                .unwrap(),
        }
    }

    fn rule(path: &str, definition: &str, priority: i32) -> Rule {
        Rule::new(FolderPath::parse(path).unwrap(), definition, priority).unwrap()
    }

    #[test]
    fn test_new_mailbox_is_empty() {
        let mailbox = mailbox();
        assert_eq!(mailbox.account().name, "b");
        assert_eq!(mailbox.rules().count(), 0);
        assert!(mailbox.directory().inbox().is_empty());
    }

    #[test]
    fn test_deliver_without_rules() {
        let mut mailbox = mailbox();
        assert_eq!(mailbox.deliver(mail("hi")).unwrap(), FolderPath::inbox());
        assert_eq!(mailbox.directory().inbox().len(), 1);
    }

    #[test]
    fn test_deliver_by_rule() {
        let mut mailbox = mailbox();
        mailbox.create_folder("/inbox/school").unwrap();
        mailbox
            .add_rule(rule("/inbox/school", "subject-includes: exam", 5))
            .unwrap();

        let folder = mailbox.deliver(mail("MJT exam")).unwrap();
        assert_eq!(folder.as_str(), "/inbox/school");
        assert!(mailbox.directory().inbox().is_empty());
    }

    #[test]
    fn test_add_rule_moves_queued_mail() {
        let mut mailbox = mailbox();
        mailbox.deliver(mail("MJT exam")).unwrap();
        mailbox.deliver(mail("party")).unwrap();
        mailbox.create_folder("/inbox/school").unwrap();

        let moved = mailbox
            .add_rule(rule("/inbox/school", "subject-includes: exam", 5))
            .unwrap();

        assert_eq!(moved, 1);
        assert_eq!(mailbox.directory().inbox().len(), 1);
        assert_eq!(mailbox.directory().mails("/inbox/school").unwrap().len(), 1);
    }

    #[test]
    fn test_add_rule_to_missing_folder_changes_nothing() {
        let mut mailbox = mailbox();
        let err = mailbox
            .add_rule(rule("/inbox/school", "subject-includes: exam", 5))
            .unwrap_err();

        assert!(matches!(err, Error::FolderNotFound(_)));
        assert_eq!(mailbox.rules().count(), 0);
    }

    #[test]
    fn test_record_sent() {
        let mut mailbox = mailbox();
        mailbox.record_sent(mail("out"));
        assert_eq!(mailbox.directory().mails("/sent").unwrap().len(), 1);
        assert!(mailbox.directory().inbox().is_empty());
    }
}
