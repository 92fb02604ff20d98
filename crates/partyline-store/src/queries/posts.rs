// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board post rows, kept so chats can be annotated with their post title.

use rusqlite::params;

use partyline_core::ChatError;
use partyline_core::types::{PostId, PostRef, UserId};

use crate::database::Database;

/// Insert or refresh a post row. The author must already exist.
pub async fn upsert_post(db: &Database, post: &PostRef) -> Result<(), ChatError> {
    let id = post.id.0.clone();
    let title = post.title.clone();
    let author_id = post.author_id.0.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO posts (id, title, author_id) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                     title = excluded.title,
                     author_id = excluded.author_id",
                params![id, title, author_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

pub async fn get_post(db: &Database, id: &PostId) -> Result<Option<PostRef>, ChatError> {
    let id = id.0.clone();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare("SELECT id, title, author_id FROM posts WHERE id = ?1")?;
            let row = stmt.query_row(params![id], |row| {
                Ok(PostRef {
                    id: PostId(row.get(0)?),
                    title: row.get(1)?,
                    author_id: UserId(row.get(2)?),
                })
            });
            match row {
                Ok(post) => Ok(Some(post)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    use partyline_core::types::UserProfile;

    #[tokio::test]
    async fn upsert_then_get_round_trips() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();

        let author = UserProfile {
            id: UserId("u-1".into()),
            display_name: "Alice".into(),
            avatar_url: None,
        };
        crate::queries::users::upsert_user(&db, &author).await.unwrap();

        let post = PostRef {
            id: PostId("p-1".into()),
            title: "Looking for a duo partner".into(),
            author_id: author.id.clone(),
        };
        upsert_post(&db, &post).await.unwrap();

        let fetched = get_post(&db, &post.id).await.unwrap().unwrap();
        assert_eq!(fetched, post);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn post_author_must_exist() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();

        let post = PostRef {
            id: PostId("p-1".into()),
            title: "Orphan".into(),
            author_id: UserId("nobody".into()),
        };
        let result = upsert_post(&db, &post).await;
        assert!(result.is_err(), "foreign key on author_id must reject");

        db.close().await.unwrap();
    }
}
