//! Account management module.
//!
//! Provides the account identity, the per-account mailbox aggregate, the
//! registry of all mailboxes and argument validation.

mod mailbox;
mod model;
mod registry;
mod validation;

pub use mailbox::Mailbox;
pub use model::Account;
pub use registry::Registry;
pub use validation::{ValidationError, require_non_blank, require_priority};
