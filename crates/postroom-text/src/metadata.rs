//! Mail metadata blocks.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;

use crate::error::{Error, Result};
use crate::lines::{join_csv, split_csv, value_line};

/// Key of the sender line.
pub const SENDER_KEY: &str = "sender:";
/// Key of the subject line.
pub const SUBJECT_KEY: &str = "subject:";
/// Key of the recipients line.
pub const RECIPIENTS_KEY: &str = "recipients:";
/// Key of the received timestamp line.
pub const RECEIVED_KEY: &str = "received:";

/// `chrono` format of the received timestamp (`yyyy-MM-dd HH:mm`).
pub const RECEIVED_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Structured metadata extracted from a raw metadata block.
///
/// ```text
/// sender: a@x.com
/// subject: MJT exam
/// recipients: b@x.com, c@x.com
/// received: 2022-12-08 14:14
/// ```
///
/// Lines may come in any order and unknown lines are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MailMetadata {
    /// Sender email address (may be empty when the line is missing).
    pub sender: String,
    /// Subject line.
    pub subject: String,
    /// Recipient email addresses.
    pub recipients: BTreeSet<String>,
    /// When the mail was received.
    pub received: NaiveDateTime,
}

impl MailMetadata {
    /// Parses a metadata block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimestamp`] if the `received:` line is missing
    /// or does not match [`RECEIVED_FORMAT`].
    pub fn parse(text: &str) -> Result<Self> {
        let received_line = value_line(RECEIVED_KEY, text);
        let received = NaiveDateTime::parse_from_str(received_line, RECEIVED_FORMAT).map_err(
            |source| Error::InvalidTimestamp {
                value: received_line.to_string(),
                source,
            },
        )?;

        Ok(Self {
            sender: value_line(SENDER_KEY, text).to_string(),
            subject: value_line(SUBJECT_KEY, text).to_string(),
            recipients: split_csv(value_line(RECIPIENTS_KEY, text)),
            received,
        })
    }

    /// Parses a metadata block that may be absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingInput`] for `None`, otherwise see [`Self::parse`].
    pub fn parse_optional(text: Option<&str>) -> Result<Self> {
        text.map_or(Err(Error::MissingInput), Self::parse)
    }

    /// Recipients as a sorted, comma separated line.
    #[must_use]
    pub fn recipients_line(&self) -> String {
        join_csv(&self.recipients)
    }
}

impl fmt::Display for MailMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{SENDER_KEY} {}", self.sender)?;
        writeln!(f, "{SUBJECT_KEY} {}", self.subject)?;
        writeln!(f, "{RECIPIENTS_KEY} {}", self.recipients_line())?;
        write!(
            f,
            "{RECEIVED_KEY} {}",
            self.received.format(RECEIVED_FORMAT)
        )
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
    use proptest::prelude::*;

    const METADATA: &str = concat!(
        "sender: testy@gmail.com\n",
        "subject: Hello, MJT!\n",
        "recipients: pesho@gmail.com, gosho@gmail.com,\n",
        "received: 2022-12-08 14:14\n",
    );

    #[test]
    fn test_parse_all_fields() {
        let metadata = MailMetadata::parse(METADATA).unwrap();

        assert_eq!(metadata.sender, "testy@gmail.com");
        assert_eq!(metadata.subject, "Hello, MJT!");
        assert_eq!(metadata.recipients.len(), 2);
        assert!(metadata.recipients.contains("pesho@gmail.com"));
        assert!(metadata.recipients.contains("gosho@gmail.com"));
        assert_eq!(
            metadata.received,
            NaiveDate::from_ymd_opt(2022, 12, 8)
                .unwrap()
                .and_hms_opt(14, 14, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_parse_is_order_independent() {
        let shuffled = concat!(
            "received: 2022-12-08 14:14\n",
            "x-unknown: ignored\n",
            "recipients: gosho@gmail.com, pesho@gmail.com\n",
            "subject: Hello, MJT!\n",
            "sender: testy@gmail.com",
        );

        assert_eq!(
            MailMetadata::parse(shuffled).unwrap(),
            MailMetadata::parse(METADATA).unwrap()
        );
    }

    #[test]
    fn test_parse_missing_optional_lines() {
        let metadata = MailMetadata::parse("received: 2023-01-01 00:00").unwrap();
        assert!(metadata.sender.is_empty());
        assert!(metadata.subject.is_empty());
        assert!(metadata.recipients.is_empty());
    }

    #[test]
    fn test_parse_bad_timestamp() {
        let err = MailMetadata::parse("sender: a@x.com\nreceived: 08.12.2022 14:14").unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp { ref value, .. } if value == "08.12.2022 14:14"));
    }

    #[test]
    fn test_parse_timestamp_with_seconds_rejected() {
        assert!(MailMetadata::parse("received: 2022-12-08 14:14:59").is_err());
    }

    #[test]
    fn test_parse_missing_timestamp() {
        assert!(matches!(
            MailMetadata::parse("sender: a@x.com"),
            Err(Error::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_parse_absent_text() {
        assert!(matches!(
            MailMetadata::parse_optional(None),
            Err(Error::MissingInput)
        ));
        assert!(MailMetadata::parse_optional(Some(METADATA)).is_ok());
    }

    #[test]
    fn test_display_round_trip() {
        let metadata = MailMetadata::parse(METADATA).unwrap();
        let rendered = metadata.to_string();

        assert!(rendered.contains("recipients: gosho@gmail.com, pesho@gmail.com"));
        assert_eq!(MailMetadata::parse(&rendered).unwrap(), metadata);
    }

    proptest! {
        #[test]
        fn recipients_survive_reserialization(
            recipients in proptest::collection::btree_set("[a-z]{1,8}@[a-z]{1,6}\\.com", 1..6)
        ) {
            let line = recipients.iter().rev().cloned().collect::<Vec<_>>().join(",");
            let text = format!("recipients: {line}\nreceived: 2022-12-08 14:14");
            let metadata = MailMetadata::parse(&text).unwrap();

            prop_assert_eq!(&metadata.recipients, &recipients);

            let reparsed = MailMetadata::parse(&format!(
                "recipients: {}\nreceived: 2022-12-08 14:14",
                metadata.recipients_line()
            ))
            .unwrap();
            prop_assert_eq!(reparsed.recipients, recipients);
        }
    }
}
