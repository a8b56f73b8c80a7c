//! Folder hierarchy of an account.
//!
//! Every account owns a [`Directory`]: a tree rooted at `/` with the fixed
//! `/inbox` and `/sent` folders. User folders are created below `/inbox`,
//! one level at a time:
//!
//! ```
//! use postroom_core::directory::Directory;
//!
//! let mut directory = Directory::new();
//! directory.add_path("/inbox/school")?;
//! directory.add_path("/inbox/school/mjt")?;
//! assert!(directory.add_path("/inbox/work/urgent").is_err()); // no /inbox/work
//! # Ok::<(), postroom_core::Error>(())
//! ```

mod path;
mod tree;

pub use path::{FolderPath, SEPARATOR};
pub use tree::Directory;
