//! Feed repository
//!
//! Ranked feed in three statements regardless of page size (no N+1):
//! - ranked page of tweets with author and like count (GROUP BY, LIMIT/OFFSET)
//! - attachments for the page (JOIN via tweet_media, = ANY)
//! - likers for the page (JOIN users, = ANY)

use std::collections::HashMap;

use serde::Serialize;
use sqlx::FromRow;

use crate::db::Session;
use crate::models::FeedWindow;
use crate::Result;

/// User reference embedded in feed and profile views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
}

/// A user who liked a tweet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Liker {
    pub user_id: i64,
    pub name: String,
}

/// Fully populated feed entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedTweet {
    pub id: i64,
    pub content: String,
    pub attachments: Vec<String>,
    pub author: UserInfo,
    pub likes: Vec<Liker>,
}

#[derive(FromRow)]
struct RankedRow {
    id: i64,
    content: String,
    author_id: i64,
    author_name: String,
}

#[derive(FromRow)]
struct AttachmentRow {
    tweet_id: i64,
    attachment: String,
}

#[derive(FromRow)]
struct LikerRow {
    tweet_id: i64,
    user_id: i64,
    name: String,
}

/// Feed repository
pub struct FeedRepo<'a> {
    session: &'a mut Session,
}

impl<'a> FeedRepo<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    /// Tweets ranked by like count (desc), then id (desc).
    ///
    /// The window applies only when both offset and limit are set.
    pub async fn list(&mut self, window: FeedWindow) -> Result<Vec<FeedTweet>> {
        let (limit, offset) = window.bounds();
        let conn = self.session.connection().await?;

        let ranked: Vec<RankedRow> = sqlx::query_as(
            r#"
            SELECT
                t.id,
                t.content,
                u.id AS author_id,
                u.name AS author_name
            FROM tweets t
            JOIN users u ON u.id = t.user_id
            LEFT JOIN likes l ON l.tweet_id = t.id
            GROUP BY t.id, t.content, u.id, u.name
            ORDER BY COUNT(l.id) DESC, t.id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await?;

        if ranked.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = ranked.iter().map(|r| r.id).collect();

        let attachment_rows: Vec<AttachmentRow> = sqlx::query_as(
            r#"
            SELECT tm.tweet_id, m.attachment
            FROM tweet_media tm
            JOIN medias m ON m.id = tm.media_id
            WHERE tm.tweet_id = ANY($1)
            ORDER BY tm.id
            "#,
        )
        .bind(&ids[..])
        .fetch_all(&mut *conn)
        .await?;

        let liker_rows: Vec<LikerRow> = sqlx::query_as(
            r#"
            SELECT l.tweet_id, u.id AS user_id, u.name
            FROM likes l
            JOIN users u ON u.id = l.user_id
            WHERE l.tweet_id = ANY($1)
            ORDER BY l.id
            "#,
        )
        .bind(&ids[..])
        .fetch_all(&mut *conn)
        .await?;

        Ok(assemble(ranked, attachment_rows, liker_rows))
    }
}

/// Stitch the three result sets together, keeping the ranked order.
fn assemble(
    ranked: Vec<RankedRow>,
    attachment_rows: Vec<AttachmentRow>,
    liker_rows: Vec<LikerRow>,
) -> Vec<FeedTweet> {
    let mut attachments: HashMap<i64, Vec<String>> = HashMap::new();
    for row in attachment_rows {
        attachments.entry(row.tweet_id).or_default().push(row.attachment);
    }

    let mut likes: HashMap<i64, Vec<Liker>> = HashMap::new();
    for row in liker_rows {
        likes.entry(row.tweet_id).or_default().push(Liker {
            user_id: row.user_id,
            name: row.name,
        });
    }

    ranked
        .into_iter()
        .map(|r| FeedTweet {
            id: r.id,
            content: r.content,
            attachments: attachments.remove(&r.id).unwrap_or_default(),
            author: UserInfo {
                id: r.author_id,
                name: r.author_name,
            },
            likes: likes.remove(&r.id).unwrap_or_default(),
        })
        .collect()
}
