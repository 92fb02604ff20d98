// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP and WebSocket gateway for the Partyline chat service.
//!
//! The gateway is a thin shell over [`partyline_chat`]: REST handlers call
//! straight into the directory, fan-out dispatcher and inbox builder, and the
//! WebSocket endpoint bridges sockets into the connection registry so fan-out
//! events reach browsers as JSON frames. It owns no business rules of its own
//! beyond mapping [`partyline_core::error::ChatError`] onto status codes.

pub mod handlers;
pub mod server;
pub mod ws;

pub use server::{build_router, start_server, GatewayState, ServerConfig};
