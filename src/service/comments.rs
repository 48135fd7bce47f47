//! Comments on videos.
//!
//! Every video caches its number of comments in `commentsNumber`. Posting and
//! deleting a comment update that counter in the same transaction as the
//! comment itself, so the two never drift apart. The counter is not clamped at
//! zero.

use tracing::instrument;

use crate::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CommentError {
    #[snafu(display(
        "Invalid Comment Operation Error: failed to post comment. reason: comment is empty"
    ))]
    EmptyComment,

    #[snafu(display(
        "Invalid Comment Operation Error: failed to delete comment. reason: comment does not exist"
    ))]
    MissingComment { comment_id: Record<Comment> },

    #[snafu(display("{source}"))]
    CommentStore { source: DatabaseQueryError },
}

/// A comment together with the counter of its video right after the change.
///
/// `comments_number` is `None` when the video no longer exists.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentChange {
    pub comment: Comment,
    pub comments_number: Option<i64>,
}

impl CommentChange {
    fn new(comment: Comment, video: Option<Video>) -> Self {
        Self {
            comment,
            comments_number: video.map(|video| video.comments_number),
        }
    }
}

/// All comments of a video, oldest first.
#[instrument(skip_all, fields(video_key = %video.video_key))]
pub async fn list(video: &Video, db: &Database) -> Result<Vec<Comment>, CommentError> {
    Comment::for_video(&video.video_key, db)
        .await
        .context(CommentStoreSnafu)
}

/// Posts a comment by `author` under `video`, snapshotting the author's current username.
#[instrument(skip_all, fields(video_key = %video.video_key, commentor_id = %author.id))]
pub async fn post(
    video: &Video,
    author: &User,
    body: &str,
    db: &Database,
) -> Result<CommentChange, CommentError> {
    ensure!(!body.trim().is_empty(), EmptyCommentSnafu);

    let comment = Comment::new(
        video.video_key.clone(),
        author.id.clone(),
        author.username.clone(),
        body.to_string(),
    );

    let (comment, video) = comment.publish(db).await.context(CommentStoreSnafu)?;
    let change = CommentChange::new(comment, video);

    tracing::info!(
        comment_id = %change.comment.id,
        comments_number = ?change.comments_number,
        "posted comment"
    );

    Ok(change)
}

/// Loads a comment for deletion. When `video_key` is given the comment must belong to that video.
#[instrument(skip(db))]
pub async fn find(
    comment_id: &Record<Comment>,
    video_key: Option<&str>,
    db: &Database,
) -> Result<Comment, CommentError> {
    let comment = Comment::get(comment_id, db)
        .await
        .context(CommentStoreSnafu)?
        .filter(|comment| video_key.map_or(true, |key| key == comment.video_key));

    comment.context(MissingCommentSnafu {
        comment_id: comment_id.clone(),
    })
}

/// Deletes `comment` from `video`. Fails without touching any counter when the
/// comment no longer exists or the video was deleted in the meantime.
#[instrument(skip_all, fields(video_key = %video.video_key, comment_id = %comment.id))]
pub async fn delete(
    video: &Video,
    comment: &Comment,
    db: &Database,
) -> Result<CommentChange, CommentError> {
    let (comment, video) = Comment::retract(&comment.id, &video.video_key, db)
        .await
        .context(CommentStoreSnafu)?
        .context(MissingCommentSnafu {
            comment_id: comment.id.clone(),
        })?;

    let change = CommentChange::new(comment, Some(video));

    tracing::info!(comments_number = ?change.comments_number, "deleted comment");

    Ok(change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fixtures;

    async fn comments_number(video_key: &str, db: &Database) -> i64 {
        Video::by_key(video_key, db)
            .await
            .unwrap()
            .expect("video should exist")
            .comments_number
    }

    #[tokio::test]
    async fn posting_increments_the_counter() {
        let db = fixtures::database().await;
        let uploader = fixtures::user("uploader", &db).await;
        let fubuki = fixtures::user("fubuki", &db).await;
        let video = fixtures::video("intro", &uploader, &db).await;

        let change = post(&video, &fubuki, "first!", &db).await.unwrap();

        assert_eq!(change.comments_number, Some(1));
        assert_eq!(change.comment.video_key, "intro");
        assert_eq!(change.comment.commentor_id, fubuki.id);
        assert_eq!(change.comment.commentor_username, "fubuki");
        assert_eq!(change.comment.comment, "first!");
        assert_eq!(comments_number("intro", &db).await, 1);
    }

    #[tokio::test]
    async fn listing_returns_comments_in_posting_order() {
        let db = fixtures::database().await;
        let uploader = fixtures::user("uploader", &db).await;
        let video = fixtures::video("intro", &uploader, &db).await;
        let other = fixtures::video("outro", &uploader, &db).await;

        post(&video, &uploader, "one", &db).await.unwrap();
        post(&other, &uploader, "elsewhere", &db).await.unwrap();
        post(&video, &uploader, "two", &db).await.unwrap();

        let comments = list(&video, &db).await.unwrap();
        let bodies: Vec<&str> = comments.iter().map(|c| c.comment.as_str()).collect();
        assert_eq!(bodies, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn deleting_decrements_the_counter() {
        let db = fixtures::database().await;
        let uploader = fixtures::user("uploader", &db).await;
        let video = fixtures::video("intro", &uploader, &db).await;

        let first = post(&video, &uploader, "one", &db).await.unwrap();
        post(&video, &uploader, "two", &db).await.unwrap();

        let change = delete(&video, &first.comment, &db).await.unwrap();
        assert_eq!(change.comment, first.comment);
        assert_eq!(change.comments_number, Some(1));
        assert_eq!(list(&video, &db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_missing_comment_leaves_counters_alone() {
        let db = fixtures::database().await;
        let uploader = fixtures::user("uploader", &db).await;
        let video = fixtures::video("intro", &uploader, &db).await;
        let posted = post(&video, &uploader, "one", &db).await.unwrap();

        delete(&video, &posted.comment, &db).await.unwrap();
        let result = delete(&video, &posted.comment, &db).await;
        assert!(matches!(result, Err(CommentError::MissingComment { .. })));

        let result = find(&posted.comment.id, None, &db).await;
        assert!(matches!(result, Err(CommentError::MissingComment { .. })));

        let result = find(&Record::uuid(), None, &db).await;
        assert!(matches!(result, Err(CommentError::MissingComment { .. })));

        assert_eq!(comments_number("intro", &db).await, 0);
    }

    #[tokio::test]
    async fn comments_are_only_found_under_their_own_video() {
        let db = fixtures::database().await;
        let uploader = fixtures::user("uploader", &db).await;
        let video = fixtures::video("intro", &uploader, &db).await;
        fixtures::video("outro", &uploader, &db).await;
        let posted = post(&video, &uploader, "one", &db).await.unwrap();

        let found = find(&posted.comment.id, None, &db).await.unwrap();
        assert_eq!(found, posted.comment);

        let found = find(&posted.comment.id, Some("intro"), &db).await.unwrap();
        assert_eq!(found, posted.comment);

        let result = find(&posted.comment.id, Some("outro"), &db).await;
        assert!(matches!(result, Err(CommentError::MissingComment { .. })));
    }

    #[tokio::test]
    async fn comments_of_a_deleted_video_are_kept() {
        let db = fixtures::database().await;
        let uploader = fixtures::user("uploader", &db).await;
        let video = fixtures::video("intro", &uploader, &db).await;
        let posted = post(&video, &uploader, "one", &db).await.unwrap();

        crate::service::videos::delete(&uploader.id, "intro", &db)
            .await
            .unwrap();

        let result = delete(&video, &posted.comment, &db).await;
        assert!(matches!(result, Err(CommentError::MissingComment { .. })));

        let stored = Comment::get(&posted.comment.id, &db).await.unwrap();
        assert_eq!(stored, Some(posted.comment));
    }

    #[tokio::test]
    async fn counter_matches_stored_comments_after_mixed_operations() {
        let db = fixtures::database().await;
        let uploader = fixtures::user("uploader", &db).await;
        let video = fixtures::video("intro", &uploader, &db).await;

        let mut posted = Vec::new();
        for body in ["a", "b", "c", "d", "e"] {
            posted.push(post(&video, &uploader, body, &db).await.unwrap());
        }
        delete(&video, &posted[1].comment, &db).await.unwrap();
        delete(&video, &posted[3].comment, &db).await.unwrap();
        post(&video, &uploader, "f", &db).await.unwrap();

        let stored = list(&video, &db).await.unwrap().len() as i64;
        assert_eq!(stored, 4);
        assert_eq!(comments_number("intro", &db).await, stored);
    }

    #[tokio::test]
    async fn blank_comments_are_rejected() {
        let db = fixtures::database().await;
        let uploader = fixtures::user("uploader", &db).await;
        let video = fixtures::video("intro", &uploader, &db).await;

        let result = post(&video, &uploader, "   ", &db).await;
        assert!(matches!(result, Err(CommentError::EmptyComment)));
        assert_eq!(comments_number("intro", &db).await, 0);
    }
}
