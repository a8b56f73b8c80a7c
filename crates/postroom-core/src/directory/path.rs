//! Folder path type.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Separator between folder names.
pub const SEPARATOR: char = '/';

const ROOT: &str = "/";
const INBOX: &str = "/inbox";
const SENT: &str = "/sent";

/// Absolute path of a folder, e.g. `/inbox/school/mjt`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FolderPath(String);

impl FolderPath {
    /// The root folder `/`.
    #[must_use]
    pub fn root() -> Self {
        Self(ROOT.to_string())
    }

    /// The inbox `/inbox`.
    #[must_use]
    pub fn inbox() -> Self {
        Self(INBOX.to_string())
    }

    /// The sent folder `/sent`.
    #[must_use]
    pub fn sent() -> Self {
        Self(SENT.to_string())
    }

    /// Parses a user folder path.
    ///
    /// User folders live below `/inbox`, must not end with a separator and
    /// must not contain consecutive separators. Whether the parent exists is
    /// checked by the directory, not here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the path is malformed.
    pub fn parse(path: &str) -> Result<Self> {
        let below_inbox = path
            .strip_prefix(INBOX)
            .is_some_and(|rest| rest.starts_with(SEPARATOR));

        if !below_inbox || path.ends_with(SEPARATOR) || path.contains("//") {
            return Err(Error::InvalidPath(path.to_string()));
        }

        Ok(Self(path.to_string()))
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the immediate parent, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }

        let index = self.0.rfind(SEPARATOR)?;
        if index == 0 {
            Some(Self::root())
        } else {
            Some(Self(self.0[..index].to_string()))
        }
    }

    /// Returns the last folder name (empty for the root).
    #[must_use]
    pub fn name(&self) -> &str {
        self.0
            .rfind(SEPARATOR)
            .map_or(self.0.as_str(), |index| &self.0[index + 1..])
    }

    /// Returns true for `/`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == ROOT
    }
}

impl Borrow<str> for FolderPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
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
    use proptest::prelude::*;

    #[test]
    fn test_fixed_folders() {
        assert_eq!(FolderPath::root().as_str(), "/");
        assert_eq!(FolderPath::inbox().as_str(), "/inbox");
        assert_eq!(FolderPath::sent().as_str(), "/sent");
    }

    #[test]
    fn test_parse_valid() {
        assert_eq!(FolderPath::parse("/inbox/x").unwrap().as_str(), "/inbox/x");
        assert!(FolderPath::parse("/inbox/x/y").is_ok());
        assert!(FolderPath::parse("/inbox/important mail").is_ok());
    }

    #[test]
    fn test_parse_invalid() {
        for path in [
            "/inbox",
            "/inbox/",
            "/inbox/x/",
            "/inbox//x",
            "/inbox/x//y",
            "/inboxes",
            "/sent/x",
            "/x",
            "inbox/x",
            "/",
            "",
        ] {
            assert!(
                matches!(FolderPath::parse(path), Err(Error::InvalidPath(_))),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn test_parent() {
        let path = FolderPath::parse("/inbox/x/y").unwrap();
        assert_eq!(path.parent().unwrap().as_str(), "/inbox/x");
        assert_eq!(path.parent().unwrap().parent().unwrap(), FolderPath::inbox());
        assert_eq!(FolderPath::inbox().parent(), Some(FolderPath::root()));
        assert_eq!(FolderPath::sent().parent(), Some(FolderPath::root()));
        assert_eq!(FolderPath::root().parent(), None);
    }

    #[test]
    fn test_name() {
        assert_eq!(FolderPath::parse("/inbox/x/y").unwrap().name(), "y");
        assert_eq!(FolderPath::inbox().name(), "inbox");
        assert_eq!(FolderPath::root().name(), "");
    }

    proptest! {
        #[test]
        fn parsed_paths_have_inbox_ancestry(segments in proptest::collection::vec("[a-z0-9 ]{1,8}", 1..5)) {
            let path = format!("/inbox/{}", segments.join("/"));
            let mut current = FolderPath::parse(&path).unwrap();
            let mut depth = 0;
            while let Some(parent) = current.parent() {
                current = parent;
                depth += 1;
            }
            prop_assert!(current.is_root());
            prop_assert_eq!(depth, segments.len() + 1);
        }
    }
}
