// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat domain logic for the Partyline matchmaking board.
//!
//! The pieces compose around the storage and collaborator traits from
//! `partyline-core`:
//! - [`ChatDirectory`] resolves post + participant pair to exactly one
//!   conversation, creating it on first contact.
//! - [`MessageLog`] validates and appends to the per-chat append-only log.
//! - [`ConnectionRegistry`] tracks live connections and their channel
//!   subscriptions.
//! - [`FanoutDispatcher`] persists a send, then pushes the refreshed log
//!   and a recipient notification to subscribers.
//! - [`InboxBuilder`] assembles the recency-sorted conversation list.
//! - [`Sweeper`] purges conversations idle past the inactivity window.

pub mod directory;
pub mod fanout;
pub mod inbox;
pub mod log;
pub mod registry;
pub mod shutdown;
pub mod sweeper;

pub use directory::ChatDirectory;
pub use fanout::FanoutDispatcher;
pub use inbox::InboxBuilder;
pub use log::MessageLog;
pub use registry::ConnectionRegistry;
pub use sweeper::Sweeper;
