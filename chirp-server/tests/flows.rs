//! Database-backed service flows
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p chirp-server -- --ignored

use chirp_server::blob::FsBlobStore;
use chirp_server::db::{
    Fields, Follow, Like, Media, PgRepository, Repository, Session, Tweet, TweetMediaLink,
};
use chirp_server::db::{Commit, ConstraintMessages};
use chirp_server::models::{ApiToken, FeedWindow, ImageName, MediaIds, TweetContent, UserName};
use chirp_server::services::{LikeService, MediaService, SocialService, TweetService, UserService};
use chirp_server::{Error, Result};
use sqlx::PgPool;
use tempfile::TempDir;

async fn register(session: &mut Session, name: &str, token: &str) -> Result<i64> {
    let user = UserService::new(session)
        .create(UserName::new(name)?, ApiToken::new(token)?)
        .await?;
    Ok(user.id)
}

async fn count<E: chirp_server::db::Entity>(session: &mut Session) -> Result<i64> {
    PgRepository::<E>::new().count(session).await
}

#[sqlx::test(migrator = "chirp_server::db::MIGRATOR")]
#[ignore = "requires database"]
async fn token_resolves_to_its_user(pool: PgPool) -> Result<()> {
    let mut session = Session::new(pool);
    let id = register(&mut session, "alice", "secret-a").await?;

    let mut users = UserService::new(&mut session);
    let found = users.resolve_token("secret-a").await?.map(|u| u.id);
    assert_eq!(found, Some(id));
    assert!(users.resolve_token("secret-b").await?.is_none());

    let err = register(&mut session, "mallory", "secret-a").await.unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));
    Ok(())
}

#[sqlx::test(migrator = "chirp_server::db::MIGRATOR")]
#[ignore = "requires database"]
async fn follow_shows_on_both_profiles(pool: PgPool) -> Result<()> {
    let mut session = Session::new(pool);
    let a = register(&mut session, "a", "token-a").await?;
    let b = register(&mut session, "b", "token-b").await?;

    // a follows b
    SocialService::new(&mut session).subscribe(b, a).await?;
    let err = SocialService::new(&mut session)
        .subscribe(b, a)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));
    assert_eq!(count::<Follow>(&mut session).await?, 1);

    let profile_b = UserService::new(&mut session).profile(b).await?;
    assert_eq!(profile_b.followers.iter().map(|u| u.id).collect::<Vec<_>>(), vec![a]);
    let profile_a = UserService::new(&mut session).profile(a).await?;
    assert_eq!(profile_a.following.iter().map(|u| u.id).collect::<Vec<_>>(), vec![b]);

    SocialService::new(&mut session).unsubscribe(b, a).await?;
    let err = SocialService::new(&mut session)
        .unsubscribe(b, a)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    Ok(())
}

#[sqlx::test(migrator = "chirp_server::db::MIGRATOR")]
#[ignore = "requires database"]
async fn self_follow_and_missing_target(pool: PgPool) -> Result<()> {
    let mut session = Session::new(pool);
    let a = register(&mut session, "a", "token-a").await?;

    for user in [a, 999_999] {
        let err = SocialService::new(&mut session)
            .subscribe(user, user)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
    let err = SocialService::new(&mut session)
        .subscribe(999_999, a)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ReferencedNotFound(_)));
    assert_eq!(count::<Follow>(&mut session).await?, 0);
    Ok(())
}

#[sqlx::test(migrator = "chirp_server::db::MIGRATOR")]
#[ignore = "requires database"]
async fn missing_media_leaves_nothing_behind(pool: PgPool) -> Result<()> {
    let dir = TempDir::new()?;
    let blobs = FsBlobStore::new(dir.path(), "/media");
    let mut session = Session::new(pool);
    let author = register(&mut session, "a", "token-a").await?;

    let media_id = MediaService::new(&mut session, &blobs)
        .save(b"img", &ImageName::new("a.png")?, author)
        .await?;

    let err = TweetService::new(&mut session, &blobs)
        .create(
            TweetContent::new("hello")?,
            MediaIds::new(vec![media_id, 424_242])?,
            author,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ReferencedNotFound(ref m) if m == "The picture does not exist."));
    assert_eq!(count::<Tweet>(&mut session).await?, 0);
    assert_eq!(count::<TweetMediaLink>(&mut session).await?, 0);
    Ok(())
}

#[sqlx::test(migrator = "chirp_server::db::MIGRATOR")]
#[ignore = "requires database"]
async fn feed_ranks_by_likes_then_id(pool: PgPool) -> Result<()> {
    let dir = TempDir::new()?;
    let blobs = FsBlobStore::new(dir.path(), "/media");
    let mut session = Session::new(pool);
    let a = register(&mut session, "a", "token-a").await?;
    let b = register(&mut session, "b", "token-b").await?;

    let mut ids = Vec::new();
    for text in ["t1", "t2", "t3"] {
        let id = TweetService::new(&mut session, &blobs)
            .create(TweetContent::new(text)?, MediaIds::default(), a)
            .await?;
        ids.push(id);
    }
    for tweet in [ids[1], ids[2]] {
        for user in [a, b] {
            LikeService::new(&mut session).like(tweet, user).await?;
        }
    }

    let feed = TweetService::new(&mut session, &blobs)
        .feed(FeedWindow::all())
        .await?;
    assert_eq!(
        feed.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![ids[2], ids[1], ids[0]]
    );
    assert_eq!(feed[0].likes.len(), 2);
    assert_eq!(feed[0].author.name, "a");

    let page = TweetService::new(&mut session, &blobs)
        .feed(FeedWindow::page(2, 2))
        .await?;
    assert_eq!(page.iter().map(|t| t.id).collect::<Vec<_>>(), vec![ids[0]]);
    Ok(())
}

#[sqlx::test(migrator = "chirp_server::db::MIGRATOR")]
#[ignore = "requires database"]
async fn delete_removes_rows_and_blobs(pool: PgPool) -> Result<()> {
    let dir = TempDir::new()?;
    let blobs = FsBlobStore::new(dir.path(), "/media");
    let mut session = Session::new(pool);
    let author = register(&mut session, "a", "token-a").await?;
    let other = register(&mut session, "b", "token-b").await?;

    let media_id = MediaService::new(&mut session, &blobs)
        .save(b"img", &ImageName::new("a.png")?, author)
        .await?;
    let media = PgRepository::<Media>::new()
        .get_by(&mut session, Fields::new().with("id", media_id))
        .await?
        .ok_or_else(|| Error::Internal("media row missing".into()))?;
    let on_disk = dir
        .path()
        .join(media.attachment.trim_start_matches("/media/"));
    assert!(on_disk.exists());

    let tweet_id = TweetService::new(&mut session, &blobs)
        .create(TweetContent::new("bye")?, MediaIds::new(vec![media_id])?, author)
        .await?;

    let err = TweetService::new(&mut session, &blobs)
        .delete(tweet_id, other)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    assert!(TweetService::new(&mut session, &blobs)
        .delete(tweet_id, author)
        .await?);
    assert_eq!(count::<Tweet>(&mut session).await?, 0);
    assert_eq!(count::<TweetMediaLink>(&mut session).await?, 0);
    assert_eq!(count::<Media>(&mut session).await?, 0);
    assert!(!on_disk.exists());
    Ok(())
}

#[sqlx::test(migrator = "chirp_server::db::MIGRATOR")]
#[ignore = "requires database"]
async fn likes_are_unique(pool: PgPool) -> Result<()> {
    let dir = TempDir::new()?;
    let blobs = FsBlobStore::new(dir.path(), "/media");
    let mut session = Session::new(pool);
    let a = register(&mut session, "a", "token-a").await?;
    let tweet = TweetService::new(&mut session, &blobs)
        .create(TweetContent::new("x")?, MediaIds::default(), a)
        .await?;

    let mut likes = LikeService::new(&mut session);
    let err = likes.unlike(tweet, a).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    likes.like(tweet, a).await?;
    let err = likes.like(tweet, a).await.unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));

    let err = likes.like(999_999, a).await.unwrap_err();
    assert!(matches!(err, Error::ReferencedNotFound(_)));
    assert_eq!(count::<Like>(&mut session).await?, 1);
    Ok(())
}

#[sqlx::test(migrator = "chirp_server::db::MIGRATOR")]
#[ignore = "requires database"]
async fn deferred_failure_keeps_earlier_statements(pool: PgPool) -> Result<()> {
    let users = PgRepository::<chirp_server::db::User>::new();
    let mut session = Session::new(pool);

    let fields = || Fields::new().with("name", "a").with("token", "t");
    users
        .create(&mut session, fields(), ConstraintMessages::default(), Commit::Deferred)
        .await?;
    let err = users
        .create(&mut session, fields(), ConstraintMessages::default(), Commit::Deferred)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));

    // the first insert is still pending in the same transaction
    assert_eq!(users.count(&mut session).await?, 1);
    session.commit().await?;
    assert_eq!(users.count(&mut session).await?, 1);
    Ok(())
}

#[sqlx::test(migrator = "chirp_server::db::MIGRATOR")]
#[ignore = "requires database"]
async fn immediate_failure_discards_pending_unit(pool: PgPool) -> Result<()> {
    let users = PgRepository::<chirp_server::db::User>::new();
    let mut session = Session::new(pool.clone());

    let user = |name: &str, token: &str| Fields::new().with("name", name).with("token", token);
    users
        .create(&mut session, user("x", "tx"), ConstraintMessages::default(), Commit::Now)
        .await?;
    users
        .create(
            &mut session,
            user("pending", "tp"),
            ConstraintMessages::default(),
            Commit::Deferred,
        )
        .await?;

    let err = users
        .create(&mut session, user("x", "tx"), ConstraintMessages::default(), Commit::Now)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));
    assert!(!session.in_transaction());

    // only the first, committed row is visible from outside the session
    let names: Vec<String> = sqlx::query_scalar("SELECT name FROM users ORDER BY id")
        .fetch_all(&pool)
        .await?;
    assert_eq!(names, vec!["x"]);
    Ok(())
}
