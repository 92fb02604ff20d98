// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Partyline chat service.
//!
//! WAL-mode SQLite with embedded migrations. Writes are serialized through
//! `tokio-rusqlite`'s background thread, and [`SqliteStore`] implements the
//! `partyline-core` storage traits on top of per-table query modules covering
//! chats, message logs, user profiles, and board posts.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
