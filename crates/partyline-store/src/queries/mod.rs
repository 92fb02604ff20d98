// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQL query modules, one per table family. Every function takes the shared
//! [`Database`](crate::database::Database) handle and runs its work on the
//! connection's writer thread.

pub mod chats;
pub mod messages;
pub mod posts;
pub mod users;
