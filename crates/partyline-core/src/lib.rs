// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Partyline chat service.
//!
//! This crate provides the foundational trait contracts, error types, and
//! common types used throughout the Partyline workspace: chat identity,
//! message and summary shapes, channel addressing, and the read-only seams
//! to the board application's user directory and post catalog.

pub mod error;
pub mod events;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ChatError, ResourceKind};
pub use events::{ChannelName, ChatEvent, ClientCommand, NotificationKind};
pub use types::{
    Chat, ChatId, ChatRecord, ChatSummary, Message, MessageId, ParticipantPair, PostId, PostRef,
    UserId, UserProfile,
};

pub use traits::{ChatStore, PostStore, UserDirectory};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_error_has_all_variants() {
        // Verify all 7 error variants exist and can be constructed.
        let _config = ChatError::Config("test".into());
        let _storage = ChatError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _not_found = ChatError::NotFound {
            kind: ResourceKind::Chat,
            id: "c-1".into(),
        };
        let _forbidden = ChatError::Forbidden("test".into());
        let _invalid_argument = ChatError::InvalidArgument("test".into());
        let _invalid_operation = ChatError::InvalidOperation("test".into());
        let _internal = ChatError::Internal("test".into());
    }

    #[test]
    fn not_found_messages_name_the_resource() {
        let err = ChatError::NotFound {
            kind: ResourceKind::Post,
            id: "p-7".into(),
        };
        assert_eq!(err.to_string(), "post not found: p-7");
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // Compile-time check that the three collaborator seams are
        // accessible through the public API.
        fn _assert_user_directory<T: UserDirectory>() {}
        fn _assert_post_store<T: PostStore>() {}
        fn _assert_chat_store<T: ChatStore>() {}
    }
}
