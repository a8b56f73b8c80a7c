//! Folder tree of a single account.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use super::path::FolderPath;
use crate::error::{Error, Result};
use crate::mail::Mail;
use crate::rule::Rule;

/// A folder node.
#[derive(Debug, Clone, Default)]
struct Folder {
    parent: Option<FolderPath>,
    children: BTreeSet<FolderPath>,
    mails: HashSet<Mail>,
}

/// Folders of one account, keyed by path.
///
/// `/`, `/inbox` and `/sent` always exist. Every other folder is created
/// under `/inbox` and only once its parent exists, so each node is linked to
/// an existing parent at insertion time.
#[derive(Debug, Clone)]
pub struct Directory {
    folders: BTreeMap<FolderPath, Folder>,
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

impl Directory {
    /// Creates a directory with the fixed `/`, `/inbox` and `/sent` folders.
    #[must_use]
    pub fn new() -> Self {
        let mut directory = Self {
            folders: BTreeMap::new(),
        };
        directory.folders.insert(FolderPath::root(), Folder::default());
        directory.link(FolderPath::inbox(), FolderPath::root());
        directory.link(FolderPath::sent(), FolderPath::root());
        directory
    }

    fn link(&mut self, path: FolderPath, parent: FolderPath) {
        if let Some(node) = self.folders.get_mut(&parent) {
            node.children.insert(path.clone());
        }
        self.folders.insert(
            path,
            Folder {
                parent: Some(parent),
                ..Folder::default()
            },
        );
    }

    /// Creates a user folder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the path is malformed or its parent
    /// does not exist, and [`Error::FolderAlreadyExists`] if it exists.
    pub fn add_path(&mut self, path: &str) -> Result<FolderPath> {
        let path = FolderPath::parse(path)?;
        let parent = path
            .parent()
            .filter(|parent| self.folders.contains_key(parent))
            .ok_or_else(|| Error::InvalidPath(path.to_string()))?;

        if self.folders.contains_key(&path) {
            return Err(Error::FolderAlreadyExists(path.to_string()));
        }

        debug!("Created folder {} under {parent}", path.name());
        self.link(path.clone(), parent);
        Ok(path)
    }

    /// Returns true if a folder exists at `path`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.folders.contains_key(path)
    }

    /// Returns the stored path for `path`, if the folder exists.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&FolderPath> {
        self.folders.get_key_value(path).map(|(key, _)| key)
    }

    /// All folder paths in lexicographic order.
    pub fn paths(&self) -> impl Iterator<Item = &FolderPath> {
        self.folders.keys()
    }

    /// Immediate subfolders of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FolderNotFound`] if the folder does not exist.
    pub fn children(&self, path: &str) -> Result<Vec<&FolderPath>> {
        self.folder(path).map(|node| node.children.iter().collect())
    }

    /// Parent of the folder at `path` (`None` for the root).
    ///
    /// # Errors
    ///
    /// Returns [`Error::FolderNotFound`] if the folder does not exist.
    pub fn parent(&self, path: &str) -> Result<Option<&FolderPath>> {
        self.folder(path).map(|node| node.parent.as_ref())
    }

    fn folder(&self, path: &str) -> Result<&Folder> {
        self.folders
            .get(path)
            .ok_or_else(|| Error::FolderNotFound(path.to_string()))
    }

    fn folder_mut(&mut self, path: &str) -> Result<&mut Folder> {
        self.folders
            .get_mut(path)
            .ok_or_else(|| Error::FolderNotFound(path.to_string()))
    }

    /// Files a mail into the folder at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FolderNotFound`] if the folder does not exist.
    pub fn add_mail(&mut self, path: &str, mail: Mail) -> Result<()> {
        self.folder_mut(path)?.mails.insert(mail);
        Ok(())
    }

    /// Files a mail into `/inbox`.
    pub fn add_to_inbox(&mut self, mail: Mail) {
        self.fixed_mut(&FolderPath::inbox()).insert(mail);
    }

    /// Files a mail into `/sent`.
    pub fn add_to_sent(&mut self, mail: Mail) {
        self.fixed_mut(&FolderPath::sent()).insert(mail);
    }

    fn fixed_mut(&mut self, path: &FolderPath) -> &mut HashSet<Mail> {
        &mut self.folders.entry(path.clone()).or_default().mails
    }

    /// Returns a copy of the mails in the folder at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FolderNotFound`] if the folder does not exist.
    pub fn mails(&self, path: &str) -> Result<HashSet<Mail>> {
        self.folder(path).map(|node| node.mails.clone())
    }

    /// Returns a copy of the mails in `/inbox`.
    #[must_use]
    pub fn inbox(&self) -> HashSet<Mail> {
        self.folders
            .get(&FolderPath::inbox())
            .map(|node| node.mails.clone())
            .unwrap_or_default()
    }

    /// Moves every inbox mail that fits `rule` into the rule's folder.
    ///
    /// Returns the number of moved mails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FolderNotFound`] if the rule's folder does not exist.
    pub fn move_from_inbox_by_rule(&mut self, rule: &Rule) -> Result<usize> {
        let target = rule.folder();
        if !self.contains(target.as_str()) {
            return Err(Error::FolderNotFound(target.to_string()));
        }
        if *target == FolderPath::inbox() {
            return Ok(0);
        }

        let inbox = self.fixed_mut(&FolderPath::inbox());
        let (matching, remaining): (HashSet<Mail>, HashSet<Mail>) =
            std::mem::take(inbox).into_iter().partition(|mail| rule.fits(mail));
        *inbox = remaining;

        let moved = matching.len();
        self.folder_mut(target.as_str())?.mails.extend(matching);

        debug!("Moved {moved} mail(s) from /inbox to {target}");
        Ok(moved)
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

    fn mail(subject: &str) -> Mail {
        Mail {
            sender: Some(Account::new("test@email.com", "Test Name")),
            recipients: BTreeSet::from(["pesho@gmail.com".to_string()]),
            subject: subject.to_string(),
            body: "This a test body!".to_string(),
            received: NaiveDate::from_ymd_opt(2017, 1, 14)
                .unwrap()
                .and_hms_opt(10, 34, 0)
                .unwrap(),
        }
    }

    mod paths_tests {
        use super::*;

        #[test]
        fn seeded_folders() {
            let directory = Directory::new();
            let paths: Vec<&str> = directory.paths().map(FolderPath::as_str).collect();
            assert_eq!(paths, vec!["/", "/inbox", "/sent"]);
        }

        #[test]
        fn add_nested_path() {
            let mut directory = Directory::new();
            directory.add_path("/inbox/x").unwrap();
            directory.add_path("/inbox/x/y").unwrap();

            assert!(directory.contains("/inbox/x/y"));
            assert_eq!(
                directory.parent("/inbox/x/y").unwrap().unwrap().as_str(),
                "/inbox/x"
            );
            let children: Vec<&str> = directory
                .children("/inbox")
                .unwrap()
                .into_iter()
                .map(FolderPath::as_str)
                .collect();
            assert_eq!(children, vec!["/inbox/x"]);
        }

        #[test]
        fn missing_parent_is_invalid() {
            let mut directory = Directory::new();
            assert!(matches!(
                directory.add_path("/inbox/x/y"),
                Err(Error::InvalidPath(_))
            ));
            assert!(!directory.contains("/inbox/x/y"));
        }

        #[test]
        fn fixed_folders_can_not_be_created() {
            let mut directory = Directory::new();
            for path in ["/", "/inbox", "/sent"] {
                assert!(matches!(
                    directory.add_path(path),
                    Err(Error::InvalidPath(_))
                ));
            }
        }

        #[test]
        fn malformed_paths() {
            let mut directory = Directory::new();
            directory.add_path("/inbox/x").unwrap();
            for path in ["/inbox/x/", "/inbox//x", "/sent/x", "/inboxes"] {
                assert!(matches!(
                    directory.add_path(path),
                    Err(Error::InvalidPath(_))
                ));
            }
        }

        #[test]
        fn duplicate_path() {
            let mut directory = Directory::new();
            directory.add_path("/inbox/x").unwrap();
            assert!(matches!(
                directory.add_path("/inbox/x"),
                Err(Error::FolderAlreadyExists(_))
            ));
        }
    }

    mod mails_tests {
        use super::*;

        #[test]
        fn add_mail_to_unknown_folder() {
            let mut directory = Directory::new();
            assert!(matches!(
                directory.add_mail("/inbox/none", mail("x")),
                Err(Error::FolderNotFound(_))
            ));
        }

        #[test]
        fn mails_of_unknown_folder() {
            let directory = Directory::new();
            assert!(matches!(
                directory.mails("/inbox/none"),
                Err(Error::FolderNotFound(_))
            ));
        }

        #[test]
        fn mails_returns_a_copy() {
            let mut directory = Directory::new();
            directory.add_to_inbox(mail("a"));

            let mut copy = directory.mails("/inbox").unwrap();
            copy.clear();

            assert_eq!(directory.inbox().len(), 1);
        }

        #[test]
        fn inbox_and_sent() {
            let mut directory = Directory::new();
            directory.add_to_inbox(mail("in"));
            directory.add_to_sent(mail("out"));

            assert!(directory.inbox().contains(&mail("in")));
            assert!(directory.mails("/sent").unwrap().contains(&mail("out")));
            assert!(directory.mails("/").unwrap().is_empty());
        }

        #[test]
        fn identical_mails_deduplicate() {
            let mut directory = Directory::new();
            directory.add_to_inbox(mail("same"));
            directory.add_to_inbox(mail("same"));
            assert_eq!(directory.inbox().len(), 1);
        }
    }

    mod move_tests {
        use super::*;

        #[test]
        fn moves_only_matching_mails() {
            let mut directory = Directory::new();
            directory.add_path("/inbox/school").unwrap();
            directory.add_to_inbox(mail("MJT exam"));
            directory.add_to_inbox(mail("party"));

            let rule = Rule::new(
                FolderPath::parse("/inbox/school").unwrap(),
                "subject-includes: exam",
                5,
            )
            .unwrap();

            assert_eq!(directory.move_from_inbox_by_rule(&rule).unwrap(), 1);
            assert_eq!(directory.inbox(), HashSet::from([mail("party")]));
            assert_eq!(
                directory.mails("/inbox/school").unwrap(),
                HashSet::from([mail("MJT exam")])
            );
        }

        #[test]
        fn missing_target_folder() {
            let mut directory = Directory::new();
            directory.add_to_inbox(mail("MJT exam"));
            let rule = Rule::new(
                FolderPath::parse("/inbox/school").unwrap(),
                "subject-includes: exam",
                5,
            )
            .unwrap();

            assert!(matches!(
                directory.move_from_inbox_by_rule(&rule),
                Err(Error::FolderNotFound(_))
            ));
            assert_eq!(directory.inbox().len(), 1);
        }

        #[test]
        fn inbox_target_is_a_no_op() {
            let mut directory = Directory::new();
            directory.add_to_inbox(mail("MJT exam"));
            let rule = Rule::new(FolderPath::inbox(), "subject-includes: exam", 5).unwrap();

            assert_eq!(directory.move_from_inbox_by_rule(&rule).unwrap(), 0);
            assert_eq!(directory.inbox().len(), 1);
        }
    }
}
