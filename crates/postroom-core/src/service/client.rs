//! The mail client interface.

use std::collections::HashSet;

use crate::account::Account;
use crate::error::Result;
use crate::mail::Mail;

/// Operations of an in-memory mail client.
///
/// Every operation either succeeds completely or leaves the client unchanged.
pub trait MailClient {
    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Fails on blank arguments, or if the name or email is already used.
    fn add_account(&mut self, account_name: &str, email: &str) -> Result<Account>;

    /// Creates a folder below `/inbox` for the account.
    ///
    /// # Errors
    ///
    /// Fails on blank arguments, unknown accounts, malformed paths, missing
    /// parent folders and existing folders.
    fn create_folder(&mut self, account_name: &str, path: &str) -> Result<()>;

    /// Adds a filtering rule and applies it to mail already in `/inbox`.
    ///
    /// # Errors
    ///
    /// Fails on blank arguments, out-of-range priorities, unknown accounts or
    /// folders, repeated condition keys and conflicting rules.
    fn add_rule(
        &mut self,
        account_name: &str,
        folder_path: &str,
        rule_definition: &str,
        priority: i32,
    ) -> Result<()>;

    /// Delivers a mail to the account, filing it by its rules.
    ///
    /// # Errors
    ///
    /// Fails on blank arguments, unknown accounts and unparsable metadata.
    fn receive_mail(&mut self, account_name: &str, mail_metadata: &str, mail_content: &str)
    -> Result<()>;

    /// Sends a mail from the account to its recipients.
    ///
    /// A copy is kept in the sender's `/sent`; recipients that are not
    /// registered locally are skipped.
    ///
    /// # Errors
    ///
    /// Fails on blank arguments, unknown accounts and unparsable metadata.
    fn send_mail(&mut self, account_name: &str, mail_metadata: &str, mail_content: &str)
    -> Result<()>;

    /// Returns the mails in one of the account's folders.
    ///
    /// # Errors
    ///
    /// Fails on blank arguments, unknown accounts and unknown folders.
    fn mails_in_folder(&self, account_name: &str, folder_path: &str) -> Result<HashSet<Mail>>;
}
