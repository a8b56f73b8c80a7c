//! Filtering rules.
//!
//! A rule definition is a block of up to four condition lines, each key at
//! most once:
//!
//! ```text
//! from: stoyo@fmi.bg
//! recipients-includes: a@x.com, b@x.com
//! subject-includes: mjt, exam
//! subject-or-body-includes: izpit
//! ```
//!
//! A rule fits a mail when every condition fits; a condition whose key is
//! absent fits everything. Rules are evaluated by ascending priority and the
//! first fitting rule decides the folder.

mod condition;
mod model;
mod set;

pub use condition::{Condition, ConditionKind};
pub use model::Rule;
pub use set::RuleSet;
