//! Mail client service.
//!
//! This module provides the [`MailClient`] interface and [`PostOffice`], the
//! in-memory client that routes mail between registered accounts.

mod client;
mod post_office;

pub use client::MailClient;
pub use post_office::PostOffice;
