//! # postroom-core
//!
//! Core logic of an in-memory mail client.
//!
//! This crate provides:
//! - Account registration with unique names and emails
//! - Per-account folder trees rooted at `/inbox` and `/sent`
//! - **Rule-based routing** - filing mail by sender, recipients, subject and body
//! - Retroactive filing of queued inbox mail when a rule is added
//! - Local delivery of sent mail between registered accounts
//!
//! ```
//! use postroom_core::{MailClient, PostOffice};
//!
//! let mut client = PostOffice::new();
//! client.add_account("stoyo", "stoyo@fmi.bg")?;
//! client.create_folder("stoyo", "/inbox/important")?;
//! client.add_rule("stoyo", "/inbox/important", "subject-includes: exam", 1)?;
//!
//! let metadata = "sender: dean@fmi.bg\n\
//!                 subject: MJT exam\n\
//!                 recipients: stoyo@fmi.bg\n\
//!                 received: 2022-12-08 14:14";
//! client.receive_mail("stoyo", metadata, "Good luck!")?;
//!
//! assert_eq!(client.mails_in_folder("stoyo", "/inbox/important")?.len(), 1);
//! assert!(client.mails_in_folder("stoyo", "/inbox")?.is_empty());
//! # Ok::<(), postroom_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod account;
mod config;
pub mod directory;
mod error;
pub mod mail;
pub mod rule;
pub mod service;

pub use account::{Account, Mailbox, Registry, ValidationError};
pub use config::ClientConfig;
pub use directory::{Directory, FolderPath};
pub use error::{Error, Result};
pub use mail::Mail;
pub use rule::{Condition, ConditionKind, Rule, RuleSet};
pub use service::{MailClient, PostOffice};
