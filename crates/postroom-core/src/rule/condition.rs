//! Rule conditions.

use std::collections::BTreeSet;

use postroom_text::{appears_at_most_once, split_csv, value_line};

use crate::mail::Mail;

/// The four kinds of rule condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConditionKind {
    /// `from:` - the sender's email equals every value.
    From,
    /// `recipients-includes:` - any value is one of the recipients.
    RecipientsIncludes,
    /// `subject-includes:` - every value is a substring of the subject.
    SubjectIncludes,
    /// `subject-or-body-includes:` - every value is a substring of subject + body.
    SubjectOrBodyIncludes,
}

impl ConditionKind {
    /// Every kind, in the order conditions are stored in a rule.
    pub const ALL: [Self; 4] = [
        Self::From,
        Self::RecipientsIncludes,
        Self::SubjectIncludes,
        Self::SubjectOrBodyIncludes,
    ];

    /// The definition key introducing this condition.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::From => "from:",
            Self::RecipientsIncludes => "recipients-includes:",
            Self::SubjectIncludes => "subject-includes:",
            Self::SubjectOrBodyIncludes => "subject-or-body-includes:",
        }
    }

    /// True if this kind's key occurs at most once in `text`.
    #[must_use]
    pub fn is_text_correct(self, text: &str) -> bool {
        appears_at_most_once(self.key(), text)
    }
}

/// A condition with its parsed values.
///
/// An empty condition (key absent from the definition) fits every mail.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    kind: ConditionKind,
    values: BTreeSet<String>,
}

impl Condition {
    /// Parses the values for `kind` out of a rule definition.
    #[must_use]
    pub fn parse(kind: ConditionKind, definition: &str) -> Self {
        Self {
            kind,
            values: split_csv(value_line(kind.key(), definition)),
        }
    }

    /// Kind of this condition.
    #[must_use]
    pub const fn kind(&self) -> ConditionKind {
        self.kind
    }

    /// Parsed values.
    #[must_use]
    pub const fn values(&self) -> &BTreeSet<String> {
        &self.values
    }

    /// True if the definition did not mention this condition.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Checks whether `mail` satisfies this condition.
    #[must_use]
    pub fn fits(&self, mail: &Mail) -> bool {
        if self.is_empty() {
            return true;
        }

        match self.kind {
            ConditionKind::From => mail
                .sender_email()
                .is_some_and(|email| self.values.iter().all(|value| value == email)),
            ConditionKind::RecipientsIncludes => self
                .values
                .iter()
                .any(|value| mail.recipients.contains(value)),
            ConditionKind::SubjectIncludes => self
                .values
                .iter()
                .all(|value| mail.subject.contains(value.as_str())),
            ConditionKind::SubjectOrBodyIncludes => {
                let text = format!("{}{}", mail.subject, mail.body);
                self.values.iter().all(|value| text.contains(value.as_str()))
            }
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
    use crate::account::Account;
    use chrono::NaiveDate;

    fn mail() -> Mail {
        Mail {
            sender: Some(Account::new("test@email.com", "Test Name")),
            recipients: BTreeSet::from(["pesho@gmail.com".to_string(), "gosho@gmail.com".to_string()]),
            subject: "testSubject".to_string(),
            body: "This a test body!".to_string(),
            received: NaiveDate::from_ymd_opt(2017, 1, 14)
                .unwrap()
                .and_hms_opt(10, 34, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_keys_are_distinct() {
        let keys: std::collections::HashSet<&str> =
            ConditionKind::ALL.into_iter().map(ConditionKind::key).collect();
        assert_eq!(keys.len(), ConditionKind::ALL.len());
    }

    mod from_tests {
        use super::*;

        fn from(definition: &str) -> Condition {
            Condition::parse(ConditionKind::From, definition)
        }

        #[test]
        fn parses_from_multiple_lines() {
            let condition = from(
                "subject-includes: mjt, izpit, 2022\nfrom: stoyo@fmi.bg\nsubject-or-body-includes: izpit\n",
            );
            assert_eq!(
                condition.values(),
                &BTreeSet::from(["stoyo@fmi.bg".to_string()])
            );
        }

        #[test]
        fn empty_when_key_absent() {
            let condition = from("test sentence no match");
            assert!(condition.is_empty());
            assert!(condition.fits(&mail()));
        }

        #[test]
        fn wrong_sender() {
            assert!(!from("from: stoyo@fmi.bg").fits(&mail()));
        }

        #[test]
        fn correct_sender() {
            assert!(from("from: test@email.com").fits(&mail()));
        }

        #[test]
        fn sender_by_name_does_not_fit() {
            assert!(!from("from: Test Name").fits(&mail()));
        }

        #[test]
        fn sender_substring_does_not_fit() {
            assert!(!from("from: test").fits(&mail()));
        }

        #[test]
        fn multiple_distinct_values_are_unsatisfiable() {
            assert!(!from("from: test@email.com, other@email.com").fits(&mail()));
        }

        #[test]
        fn unresolved_sender_does_not_fit() {
            let mut unresolved = mail();
            unresolved.sender = None;
            assert!(!from("from: test@email.com").fits(&unresolved));
            assert!(from("").fits(&unresolved));
        }

        #[test]
        fn duplicate_key_detected() {
            assert!(ConditionKind::From.is_text_correct("from: stoyo@fmi.bg"));
            assert!(!ConditionKind::From.is_text_correct("from: a@x.com\nfrom: b@x.com"));
        }
    }

    mod recipients_tests {
        use super::*;

        fn recipients(definition: &str) -> Condition {
            Condition::parse(ConditionKind::RecipientsIncludes, definition)
        }

        #[test]
        fn any_recipient_fits() {
            assert!(recipients("recipients-includes: nobody@x.com, gosho@gmail.com").fits(&mail()));
        }

        #[test]
        fn no_recipient_matches() {
            assert!(!recipients("recipients-includes: nobody@x.com, other@x.com").fits(&mail()));
        }

        #[test]
        fn values_are_trimmed() {
            let condition = recipients("recipients-includes:   pesho@gmail.com ,  x@y.com  ");
            assert_eq!(condition.values().len(), 2);
            assert!(condition.values().contains("pesho@gmail.com"));
        }
    }

    mod subject_tests {
        use super::*;

        fn subject(definition: &str) -> Condition {
            Condition::parse(ConditionKind::SubjectIncludes, definition)
        }

        #[test]
        fn all_tokens_must_appear() {
            assert!(subject("subject-includes: test, Subject").fits(&mail()));
            assert!(!subject("subject-includes: test, missing").fits(&mail()));
        }

        #[test]
        fn body_is_ignored() {
            assert!(!subject("subject-includes: body").fits(&mail()));
        }

        #[test]
        fn does_not_read_subject_or_body_key() {
            let condition = subject("subject-or-body-includes: izpit");
            assert!(condition.is_empty());
        }
    }

    mod subject_or_body_tests {
        use super::*;

        fn subject_or_body(definition: &str) -> Condition {
            Condition::parse(ConditionKind::SubjectOrBodyIncludes, definition)
        }

        #[test]
        fn tokens_across_subject_and_body() {
            assert!(subject_or_body("subject-or-body-includes: testSubject, body").fits(&mail()));
        }

        #[test]
        fn concatenation_has_no_separator() {
            assert!(subject_or_body("subject-or-body-includes: SubjectThis").fits(&mail()));
        }

        #[test]
        fn missing_token() {
            assert!(!subject_or_body("subject-or-body-includes: body, exam").fits(&mail()));
        }
    }
}
