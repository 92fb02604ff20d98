// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row mapping between SQLite and the canonical domain types.
//!
//! The canonical types live in `partyline-core::types`; this module
//! re-exports them and provides the timestamp codec and row mappers the
//! query modules share. Timestamps are stored as RFC 3339 UTC text with
//! millisecond precision (`2026-01-01T00:00:00.000Z`), which keeps
//! lexicographic order identical to chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use rusqlite::types::Type;

pub use partyline_core::types::{
    ChatId, ChatRecord, Message, MessageId, ParticipantPair, PostId, PostRef, UserId, UserProfile,
};

/// Format a timestamp the way every table column stores it.
pub(crate) fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp back, reporting the column index on failure.
pub(crate) fn parse_ts(idx: usize, raw: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Map a `chats` row in column order
/// `(id, post_id, participant_lo, participant_hi, created_at, last_activity_at)`.
pub(crate) fn map_chat_row(row: &Row<'_>) -> rusqlite::Result<ChatRecord> {
    let lo: String = row.get(2)?;
    let hi: String = row.get(3)?;
    let participants = ParticipantPair::new(UserId(lo), UserId(hi))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    Ok(ChatRecord {
        id: ChatId(row.get(0)?),
        post_id: row.get::<_, Option<String>>(1)?.map(PostId),
        participants,
        created_at: parse_ts(4, row.get(4)?)?,
        last_activity_at: parse_ts(5, row.get(5)?)?,
    })
}

/// Map a `messages` row in column order
/// `(id, chat_id, sender_id, seq, text, timestamp, is_read)`.
pub(crate) fn map_message_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: MessageId(row.get(0)?),
        chat_id: ChatId(row.get(1)?),
        sender_id: UserId(row.get(2)?),
        seq: row.get(3)?,
        text: row.get(4)?,
        timestamp: parse_ts(5, row.get(5)?)?,
        is_read: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_codec_round_trips() {
        let ts = DateTime::parse_from_rfc3339("2026-02-03T04:05:06.789Z")
            .unwrap()
            .with_timezone(&Utc);
        let stored = format_ts(&ts);
        assert_eq!(stored, "2026-02-03T04:05:06.789Z");
        assert_eq!(parse_ts(0, stored).unwrap(), ts);
    }

    #[test]
    fn stored_timestamps_sort_lexicographically() {
        let early = "2026-02-03T04:05:06.789Z";
        let late = "2026-02-03T04:05:07.000Z";
        assert!(early < late);
    }
}
