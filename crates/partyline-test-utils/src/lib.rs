// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Partyline integration tests.
//!
//! Provides mock collaborators and harness infrastructure for fast,
//! deterministic, CI-runnable tests without a running board application.
//!
//! # Components
//!
//! - [`MockUsers`] - In-memory `UserDirectory` with insert/remove
//! - [`MockPosts`] - In-memory `PostStore` with insert/remove
//! - [`TestHarness`] - Full chat stack over a temp SQLite database
//! - [`seed`] - Row seeders for the SQLite reference tables

pub mod harness;
pub mod mock_posts;
pub mod mock_users;
pub mod seed;

pub use harness::TestHarness;
pub use mock_posts::MockPosts;
pub use mock_users::MockUsers;
