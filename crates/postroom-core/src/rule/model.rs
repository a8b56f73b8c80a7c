//! Filtering rule.

use super::condition::{Condition, ConditionKind};
use crate::directory::FolderPath;
use crate::error::{Error, Result};
use crate::mail::Mail;

/// Routes mail that fits all of its conditions into a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    folder: FolderPath,
    priority: i32,
    conditions: [Condition; 4],
}

impl Rule {
    /// Builds a rule from a definition such as
    /// ```text
    /// subject-includes: mjt, exam
    /// from: stoyo@fmi.bg
    /// ```
    ///
    /// The priority range is enforced by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRuleKey`] if a condition key occurs more than once.
    pub fn new(folder: FolderPath, definition: &str, priority: i32) -> Result<Self> {
        if let Some(kind) = ConditionKind::ALL
            .into_iter()
            .find(|kind| !kind.is_text_correct(definition))
        {
            return Err(Error::DuplicateRuleKey(kind.key()));
        }

        Ok(Self {
            folder,
            priority,
            conditions: ConditionKind::ALL.map(|kind| Condition::parse(kind, definition)),
        })
    }

    /// Target folder.
    #[must_use]
    pub const fn folder(&self) -> &FolderPath {
        &self.folder
    }

    /// Priority, lower values are evaluated first.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// All four conditions.
    #[must_use]
    pub const fn conditions(&self) -> &[Condition; 4] {
        &self.conditions
    }

    /// The condition of the given kind.
    #[must_use]
    pub const fn condition(&self, kind: ConditionKind) -> &Condition {
        // Conditions are stored in `ConditionKind::ALL` order.
        &self.conditions[kind as usize]
    }

    /// True if `mail` fits every condition.
    #[must_use]
    pub fn fits(&self, mail: &Mail) -> bool {
        self.conditions.iter().all(|condition| condition.fits(mail))
    }

    /// Two rules conflict when they share priority and conditions, whatever
    /// their folders.
    #[must_use]
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.priority == other.priority && self.conditions == other.conditions
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
    use std::collections::BTreeSet;

    fn folder(path: &str) -> FolderPath {
        FolderPath::parse(path).unwrap()
    }

    fn mail(sender: &str, subject: &str, body: &str) -> Mail {
        Mail {
            sender: Some(Account::new(sender, "sender")),
            recipients: BTreeSet::from(["b@x.com".to_string()]),
            subject: subject.to_string(),
            body: body.to_string(),
            received: NaiveDate::from_ymd_opt(2022, 12, 8)
                .unwrap()
                .and_hms_opt(14, 14, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_parses_every_condition() {
        let rule = Rule::new(
            folder("/inbox/school"),
            "subject-includes: mjt, izpit, 2022\nsubject-or-body-includes: izpit\nrecipients-includes: b@x.com\nfrom: stoyo@fmi.bg",
            3,
        )
        .unwrap();

        assert_eq!(rule.priority(), 3);
        assert_eq!(rule.folder().as_str(), "/inbox/school");
        assert_eq!(rule.condition(ConditionKind::SubjectIncludes).values().len(), 3);
        assert_eq!(rule.condition(ConditionKind::From).values().len(), 1);
        assert_eq!(
            rule.condition(ConditionKind::RecipientsIncludes).kind(),
            ConditionKind::RecipientsIncludes
        );
        assert!(rule.conditions().iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = Rule::new(
            folder("/inbox/school"),
            "subject-includes: mjt\nfrom: a@x.com\nsubject-includes: exam",
            5,
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateRuleKey("subject-includes:")));
    }

    #[test]
    fn test_empty_rule_fits_everything() {
        let rule = Rule::new(folder("/inbox/all"), "nothing relevant here", 1).unwrap();
        assert!(rule.fits(&mail("a@x.com", "anything", "at all")));
    }

    #[test]
    fn test_fits_is_a_conjunction() {
        let rule = Rule::new(
            folder("/inbox/school"),
            "from: a@x.com\nsubject-includes: exam",
            5,
        )
        .unwrap();

        assert!(rule.fits(&mail("a@x.com", "MJT exam", "")));
        assert!(!rule.fits(&mail("c@x.com", "MJT exam", "")));
        assert!(!rule.fits(&mail("a@x.com", "MJT lecture", "")));
    }

    #[test]
    fn test_conflict_ignores_folder() {
        let first = Rule::new(folder("/inbox/a"), "subject-includes: exam", 5).unwrap();
        let second = Rule::new(folder("/inbox/b"), "subject-includes: exam", 5).unwrap();
        assert!(first.conflicts_with(&second));
        assert_ne!(first, second);
    }

    #[test]
    fn test_conflict_ignores_value_order() {
        let first = Rule::new(folder("/inbox/a"), "subject-includes: mjt, exam", 5).unwrap();
        let second = Rule::new(folder("/inbox/a"), "subject-includes: exam ,mjt", 5).unwrap();
        assert!(first.conflicts_with(&second));
    }

    #[test]
    fn test_no_conflict_on_different_priority_or_values() {
        let base = Rule::new(folder("/inbox/a"), "subject-includes: exam", 5).unwrap();
        let other_priority = Rule::new(folder("/inbox/a"), "subject-includes: exam", 6).unwrap();
        let other_values = Rule::new(folder("/inbox/a"), "subject-includes: lecture", 5).unwrap();

        assert!(!base.conflicts_with(&other_priority));
        assert!(!base.conflicts_with(&other_values));
    }
}
