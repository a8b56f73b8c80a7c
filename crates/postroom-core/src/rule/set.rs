//! Priority ordered rule collection.

use super::model::Rule;
use crate::error::{Error, Result};
use crate::mail::Mail;

/// Rules of one account, ordered by ascending priority.
///
/// Rules sharing a priority keep their insertion order, so the earlier one
/// wins when both fit a mail.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a rule after every rule with a lower or equal priority.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RuleConflict`] if an existing rule has the same
    /// priority and conditions.
    pub fn insert(&mut self, rule: Rule) -> Result<()> {
        if self.rules.iter().any(|existing| existing.conflicts_with(&rule)) {
            return Err(Error::RuleConflict {
                priority: rule.priority(),
                folder: rule.folder().to_string(),
            });
        }

        let index = self
            .rules
            .partition_point(|existing| existing.priority() <= rule.priority());
        self.rules.insert(index, rule);
        Ok(())
    }

    /// The first rule, in evaluation order, that fits `mail`.
    #[must_use]
    pub fn first_match(&self, mail: &Mail) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.fits(mail))
    }

    /// Rules in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Number of rules.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if there are no rules.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rules.is_empty()
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
    use crate::directory::FolderPath;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn rule(path: &str, definition: &str, priority: i32) -> Rule {
        Rule::new(FolderPath::parse(path).unwrap(), definition, priority).unwrap()
    }

    fn mail(subject: &str) -> Mail {
        Mail {
            sender: Some(Account::new("a@x.com", "a")),
            recipients: BTreeSet::from(["b@x.com".to_string()]),
            subject: subject.to_string(),
            body: String::new(),
            received: NaiveDate::from_ymd_opt(2022, 12, 8)
                .unwrap()
                .and_hms_opt(14, 14, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_ordered_by_priority() {
        let mut rules = RuleSet::new();
        rules.insert(rule("/inbox/c", "subject-includes: c", 7)).unwrap();
        rules.insert(rule("/inbox/a", "subject-includes: a", 1)).unwrap();
        rules.insert(rule("/inbox/b", "subject-includes: b", 4)).unwrap();

        let priorities: Vec<i32> = rules.iter().map(Rule::priority).collect();
        assert_eq!(priorities, vec![1, 4, 7]);
        assert_eq!(rules.len(), 3);
    }

    #[test]
    fn test_lowest_priority_wins() {
        let mut rules = RuleSet::new();
        rules.insert(rule("/inbox/late", "subject-includes: exam", 9)).unwrap();
        rules.insert(rule("/inbox/early", "subject-includes: MJT", 2)).unwrap();

        let matched = rules.first_match(&mail("MJT exam")).unwrap();
        assert_eq!(matched.folder().as_str(), "/inbox/early");
    }

    #[test]
    fn test_equal_priority_keeps_insertion_order() {
        let mut rules = RuleSet::new();
        rules.insert(rule("/inbox/first", "subject-includes: exam", 5)).unwrap();
        rules.insert(rule("/inbox/second", "subject-includes: MJT", 5)).unwrap();
        rules.insert(rule("/inbox/third", "subject-includes: MJT exam", 5)).unwrap();

        let folders: Vec<&str> = rules.iter().map(|r| r.folder().as_str()).collect();
        assert_eq!(folders, vec!["/inbox/first", "/inbox/second", "/inbox/third"]);
        assert_eq!(
            rules.first_match(&mail("MJT exam")).unwrap().folder().as_str(),
            "/inbox/first"
        );
    }

    #[test]
    fn test_conflicting_rule_rejected() {
        let mut rules = RuleSet::new();
        rules.insert(rule("/inbox/a", "subject-includes: exam", 5)).unwrap();

        let err = rules
            .insert(rule("/inbox/b", "subject-includes: exam", 5))
            .unwrap_err();
        assert!(matches!(err, Error::RuleConflict { priority: 5, .. }));
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_same_conditions_other_priority_retained() {
        let mut rules = RuleSet::new();
        rules.insert(rule("/inbox/a", "subject-includes: exam", 5)).unwrap();
        rules.insert(rule("/inbox/a", "subject-includes: exam", 6)).unwrap();
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_no_match() {
        let mut rules = RuleSet::new();
        assert!(rules.is_empty());
        rules.insert(rule("/inbox/a", "subject-includes: exam", 5)).unwrap();
        assert!(rules.first_match(&mail("party")).is_none());
    }
}
