//! In-memory mail client routing mail between registered accounts.

use std::collections::HashSet;

use postroom_text::MailMetadata;
use tracing::{debug, info, warn};

use super::client::MailClient;
use crate::account::{Account, Registry, ValidationError, require_non_blank, require_priority};
use crate::config::ClientConfig;
use crate::directory::FolderPath;
use crate::error::{Error, Result};
use crate::mail::Mail;
use crate::rule::Rule;

/// A mail client holding every account, folder and rule in memory.
///
/// The registry of mailboxes is owned by the post office and can be injected
/// with [`PostOffice::with_registry`].
#[derive(Debug, Clone, Default)]
pub struct PostOffice {
    registry: Registry,
    config: ClientConfig,
}

impl PostOffice {
    /// Creates an empty post office with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty post office with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_registry(Registry::new(), config)
    }

    /// Creates a post office over an existing registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn with_registry(registry: Registry, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// The registry of mailboxes.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// All folder paths of the account.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AccountNotFound`] if the account is not registered.
    pub fn folders(&self, account_name: &str) -> Result<Vec<FolderPath>> {
        Ok(self
            .registry
            .require(account_name)?
            .directory()
            .paths()
            .cloned()
            .collect())
    }

    fn resolve_sender(&self, email: &str) -> Option<Account> {
        self.registry.find_by_email(email).cloned()
    }
}

impl MailClient for PostOffice {
    fn add_account(&mut self, account_name: &str, email: &str) -> Result<Account> {
        require_non_blank(account_name, ValidationError::BlankAccountName)?;
        require_non_blank(email, ValidationError::BlankEmail)?;

        let account = self
            .registry
            .register(Account::new(email, account_name))?
            .clone();

        info!("Added account {}", account.display());
        Ok(account)
    }

    fn create_folder(&mut self, account_name: &str, path: &str) -> Result<()> {
        require_non_blank(account_name, ValidationError::BlankAccountName)?;
        require_non_blank(path, ValidationError::BlankFolderPath)?;

        let mailbox = self.registry.require_mut(account_name)?;
        let path = mailbox.create_folder(path)?;
        let parent = mailbox
            .directory()
            .parent(path.as_str())?
            .cloned()
            .unwrap_or_else(FolderPath::root);

        info!("Created folder {path} under {parent} for account {account_name}");
        Ok(())
    }

    fn add_rule(
        &mut self,
        account_name: &str,
        folder_path: &str,
        rule_definition: &str,
        priority: i32,
    ) -> Result<()> {
        require_non_blank(account_name, ValidationError::BlankAccountName)?;
        require_non_blank(folder_path, ValidationError::BlankFolderPath)?;
        require_non_blank(rule_definition, ValidationError::BlankRuleDefinition)?;
        require_priority(priority, self.config.min_priority, self.config.max_priority)?;

        let mailbox = self.registry.require_mut(account_name)?;
        let folder = mailbox
            .directory()
            .resolve(folder_path)
            .cloned()
            .ok_or_else(|| Error::FolderNotFound(folder_path.to_string()))?;

        let rule = Rule::new(folder, rule_definition, priority)?;
        let moved = mailbox.add_rule(rule)?;

        info!(
            "Added rule with priority {priority} into {folder_path} for account {account_name}, moved {moved} queued mail(s)"
        );
        Ok(())
    }

    fn receive_mail(
        &mut self,
        account_name: &str,
        mail_metadata: &str,
        mail_content: &str,
    ) -> Result<()> {
        require_non_blank(account_name, ValidationError::BlankAccountName)?;
        require_non_blank(mail_metadata, ValidationError::BlankMetadata)?;
        require_non_blank(mail_content, ValidationError::BlankContent)?;
        self.registry.require(account_name)?;

        let metadata = MailMetadata::parse(mail_metadata)?;
        let sender = self.resolve_sender(&metadata.sender);
        if sender.is_none() {
            debug!("Sender {} is not a local account", metadata.sender);
        }

        let mail = Mail::from_metadata(metadata, sender, mail_content);
        let folder = self.registry.require_mut(account_name)?.deliver(mail)?;

        debug!("Account {account_name} received mail into {folder}");
        Ok(())
    }

    fn send_mail(
        &mut self,
        account_name: &str,
        mail_metadata: &str,
        mail_content: &str,
    ) -> Result<()> {
        require_non_blank(account_name, ValidationError::BlankAccountName)?;
        require_non_blank(mail_metadata, ValidationError::BlankMetadata)?;
        require_non_blank(mail_content, ValidationError::BlankContent)?;

        let sender = self.registry.require(account_name)?.account().clone();
        let metadata = MailMetadata::parse(mail_metadata)?;
        let recipients = metadata.recipients.clone();

        let mail = Mail::from_metadata(metadata, Some(sender), mail_content);
        self.registry.require_mut(account_name)?.record_sent(mail);
        debug!("Account {account_name} sent mail to {} recipient(s)", recipients.len());

        if !self.config.deliver_locally {
            return Ok(());
        }

        let mut local = Vec::new();
        for email in &recipients {
            match self.registry.find_by_email(email) {
                Some(account) => local.push(account.name.clone()),
                None => warn!("Dropping mail to {email}: no local account"),
            }
        }

        for recipient in local {
            self.receive_mail(&recipient, mail_metadata, mail_content)?;
        }
        Ok(())
    }

    fn mails_in_folder(&self, account_name: &str, folder_path: &str) -> Result<HashSet<Mail>> {
        require_non_blank(account_name, ValidationError::BlankAccountName)?;
        require_non_blank(folder_path, ValidationError::BlankFolderPath)?;

        self.registry
            .require(account_name)?
            .directory()
            .mails(folder_path)
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

    const METADATA: &str = concat!(
        "sender: a@x.com\n",
        "subject: MJT exam\n",
        "recipients: b@x.com\n",
        "received: 2022-12-08 14:14",
    );

    fn post_office() -> PostOffice {
        let mut office = PostOffice::new();
        office.add_account("a", "a@x.com").unwrap();
        office.add_account("b", "b@x.com").unwrap();
        office
    }

    #[test]
    fn test_add_account_blank_arguments() {
        let mut office = PostOffice::new();
        assert!(matches!(
            office.add_account(" ", "a@x.com"),
            Err(Error::Validation(ValidationError::BlankAccountName))
        ));
        assert!(matches!(
            office.add_account("a", ""),
            Err(Error::Validation(ValidationError::BlankEmail))
        ));
        assert!(office.registry().is_empty());
    }

    #[test]
    fn test_folders_of_new_account() {
        let office = post_office();
        let folders: Vec<String> = office
            .folders("a")
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(folders, vec!["/", "/inbox", "/sent"]);
    }

    #[test]
    fn test_create_folder_unknown_account() {
        let mut office = post_office();
        assert!(matches!(
            office.create_folder("ghost", "/inbox/x"),
            Err(Error::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_create_nested_folder_links_parent() {
        let mut office = post_office();
        office.create_folder("b", "/inbox/x").unwrap();
        office.create_folder("b", "/inbox/x/y").unwrap();

        let directory = office.registry().mailbox("b").unwrap().directory();
        assert_eq!(
            directory.parent("/inbox/x/y").unwrap().unwrap().as_str(),
            "/inbox/x"
        );
        assert_eq!(directory.parent("/inbox/x").unwrap(), Some(&FolderPath::inbox()));
        assert!(office.registry().contains("b"));
    }

    #[test]
    fn test_add_rule_priority_bounds() {
        let mut office = post_office();
        office.create_folder("b", "/inbox/school").unwrap();

        for priority in [i32::MIN, -1, 0, 11] {
            assert!(matches!(
                office.add_rule("b", "/inbox/school", "subject-includes: exam", priority),
                Err(Error::Validation(ValidationError::PriorityOutOfRange { .. }))
            ));
        }
        office
            .add_rule("b", "/inbox/school", "subject-includes: exam", 10)
            .unwrap();
    }

    #[test]
    fn test_add_rule_respects_configured_range() {
        let config = ClientConfig {
            max_priority: 3,
            ..ClientConfig::default()
        };
        let mut office = PostOffice::with_config(config).unwrap();
        office.add_account("b", "b@x.com").unwrap();

        assert!(office.add_rule("b", "/inbox", "subject-includes: exam", 4).is_err());
        assert!(office.add_rule("b", "/inbox", "subject-includes: exam", 3).is_ok());
    }

    #[test]
    fn test_add_rule_missing_folder() {
        let mut office = post_office();
        assert!(matches!(
            office.add_rule("b", "/inbox/none", "subject-includes: exam", 5),
            Err(Error::FolderNotFound(_))
        ));
    }

    #[test]
    fn test_receive_resolves_local_sender() {
        let mut office = post_office();
        office.receive_mail("b", METADATA, "see you there").unwrap();

        let inbox = office.mails_in_folder("b", "/inbox").unwrap();
        let mail = inbox.iter().next().unwrap();
        assert_eq!(mail.sender_email(), Some("a@x.com"));
    }

    #[test]
    fn test_receive_unknown_sender_is_not_an_error() {
        let mut office = post_office();
        let metadata = METADATA.replace("a@x.com", "stranger@y.com");
        office.receive_mail("b", &metadata, "hi").unwrap();

        let inbox = office.mails_in_folder("b", "/inbox").unwrap();
        assert!(inbox.iter().all(|mail| mail.sender.is_none()));
    }

    #[test]
    fn test_receive_bad_metadata() {
        let mut office = post_office();
        let err = office
            .receive_mail("b", "sender: a@x.com\nreceived: yesterday", "hi")
            .unwrap_err();
        assert!(err.is_input_error());
        assert!(office.mails_in_folder("b", "/inbox").unwrap().is_empty());
    }

    #[test]
    fn test_receive_blank_content() {
        let mut office = post_office();
        assert!(matches!(
            office.receive_mail("b", METADATA, "  "),
            Err(Error::Validation(ValidationError::BlankContent))
        ));
    }

    #[test]
    fn test_send_without_local_delivery() {
        let config = ClientConfig {
            deliver_locally: false,
            ..ClientConfig::default()
        };
        let mut office = PostOffice::with_config(config).unwrap();
        office.add_account("a", "a@x.com").unwrap();
        office.add_account("b", "b@x.com").unwrap();

        office.send_mail("a", METADATA, "hello").unwrap();

        assert_eq!(office.mails_in_folder("a", "/sent").unwrap().len(), 1);
        assert!(office.mails_in_folder("b", "/inbox").unwrap().is_empty());
    }

    #[test]
    fn test_with_registry_rejects_invalid_config() {
        let config = ClientConfig {
            min_priority: 0,
            ..ClientConfig::default()
        };
        assert!(matches!(
            PostOffice::with_registry(Registry::new(), config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_mails_in_unknown_folder() {
        let office = post_office();
        let err = office.mails_in_folder("a", "/inbox/none").unwrap_err();
        assert!(err.is_not_found());
    }
}
