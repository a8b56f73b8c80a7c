//! # postroom-text
//!
//! Line-oriented text parsing for postroom.
//!
//! ## Features
//!
//! - **Keyed value lines**: Pull the value after `key:` out of a multi-line block
//! - **Value sets**: Split comma separated values into a trimmed, ordered set
//! - **Mail metadata**: Parse `sender:`/`subject:`/`recipients:`/`received:` blocks
//!
//! ## Quick Start
//!
//! ```
//! use postroom_text::{MailMetadata, split_csv, value_line};
//!
//! let definition = "from: a@x.com\nsubject-includes: mjt, exam";
//! assert_eq!(value_line("from:", definition), "a@x.com");
//! assert_eq!(split_csv(value_line("subject-includes:", definition)).len(), 2);
//!
//! let metadata = MailMetadata::parse(
//!     "sender: a@x.com\nsubject: MJT exam\nrecipients: b@x.com\nreceived: 2022-12-08 14:14",
//! )?;
//! assert!(metadata.recipients.contains("b@x.com"));
//! # Ok::<(), postroom_text::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod lines;
mod metadata;

pub use error::{Error, Result};
pub use lines::{appears_at_most_once, join_csv, occurrences, split_csv, value_line};
pub use metadata::{
    MailMetadata, RECEIVED_FORMAT, RECEIVED_KEY, RECIPIENTS_KEY, SENDER_KEY, SUBJECT_KEY,
};
