// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait contracts between the chat core and its collaborators.
//!
//! The board application owns users and posts; the chat service reads them
//! through [`UserDirectory`] and [`PostStore`] and never writes back.
//! [`ChatStore`] is the persistence seam the chat components run on. All
//! three use `#[async_trait]` for dynamic dispatch compatibility.

pub mod chats;
pub mod posts;
pub mod users;

pub use chats::ChatStore;
pub use posts::PostStore;
pub use users::UserDirectory;
