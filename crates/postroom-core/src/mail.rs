//! Mail value object.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use postroom_text::MailMetadata;
use serde::{Deserialize, Serialize};

use crate::account::Account;

/// A delivered mail.
///
/// Equality is structural over every field, so two deliveries with identical
/// content are the same mail and collapse into one entry of a folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mail {
    /// Sending account, `None` if the sender is not registered locally.
    pub sender: Option<Account>,
    /// Recipient email addresses.
    pub recipients: BTreeSet<String>,
    /// Subject line.
    pub subject: String,
    /// Mail content.
    pub body: String,
    /// When the mail was received.
    pub received: NaiveDateTime,
}

impl Mail {
    /// Builds a mail from parsed metadata, a resolved sender and the body.
    #[must_use]
    pub fn from_metadata(
        metadata: MailMetadata,
        sender: Option<Account>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            recipients: metadata.recipients,
            subject: metadata.subject,
            body: body.into(),
            received: metadata.received,
        }
    }

    /// Email address of the sender, if resolved.
    #[must_use]
    pub fn sender_email(&self) -> Option<&str> {
        self.sender.as_ref().map(|account| account.email.as_str())
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
    use std::collections::HashSet;

    fn metadata() -> MailMetadata {
        MailMetadata::parse(
            "sender: a@x.com\nsubject: MJT exam\nrecipients: b@x.com\nreceived: 2022-12-08 14:14",
        )
        .unwrap()
    }

    #[test]
    fn test_from_metadata() {
        let sender = Account::new("a@x.com", "a");
        let mail = Mail::from_metadata(metadata(), Some(sender.clone()), "body");

        assert_eq!(mail.sender, Some(sender));
        assert_eq!(mail.sender_email(), Some("a@x.com"));
        assert_eq!(mail.subject, "MJT exam");
        assert_eq!(mail.body, "body");
        assert!(mail.recipients.contains("b@x.com"));
    }

    #[test]
    fn test_unresolved_sender() {
        let mail = Mail::from_metadata(metadata(), None, "body");
        assert!(mail.sender_email().is_none());
    }

    #[test]
    fn test_identical_mails_collapse_in_a_set() {
        let first = Mail::from_metadata(metadata(), None, "body");
        let second = Mail::from_metadata(metadata(), None, "body");
        let other = Mail::from_metadata(metadata(), None, "other body");

        let set: HashSet<Mail> = [first, second, other].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
