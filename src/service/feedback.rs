//! Likes on videos.
//!
//! A like is membership of the user in the video's `likes` set. Liking and
//! unliking are single atomic set updates that hand back the video as it was
//! before the update. The outcome is decided from that snapshot: a user
//! already in the set cannot like again, a user missing from it cannot unlike.
//!
//! Two identical requests racing each other may both read the same snapshot
//! and both report success. The stored set is still correct because the set
//! update itself is idempotent.

use tracing::instrument;

use crate::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FeedbackError {
    #[snafu(display("Video not found"))]
    FeedbackVideoMissing { video_key: String },

    #[snafu(display(
        "Invalid Feedback Operation Error: failed to like video post. reason: video was already liked"
    ))]
    AlreadyLiked { likes_count: usize },

    #[snafu(display(
        "Invalid Feedback Operation Error: failed to unlike video post. reason: video post was not liked"
    ))]
    NotLiked { likes_count: usize },

    #[snafu(display("{source}"))]
    FeedbackStore { source: DatabaseQueryError },
}

impl FeedbackError {
    /// The unchanged like count, when the failure happened on an existing video.
    pub fn likes_count(&self) -> Option<usize> {
        match self {
            FeedbackError::AlreadyLiked { likes_count } | FeedbackError::NotLiked { likes_count } => {
                Some(*likes_count)
            }
            FeedbackError::FeedbackVideoMissing { .. } | FeedbackError::FeedbackStore { .. } => None,
        }
    }
}

/// Adds `user` to the likers of the video and returns the new like count.
#[instrument(skip(db))]
pub async fn like(
    user: &Record<User>,
    video_key: &str,
    db: &Database,
) -> Result<usize, FeedbackError> {
    let before = Video::add_like(video_key, user, db)
        .await
        .context(FeedbackStoreSnafu)?
        .context(FeedbackVideoMissingSnafu { video_key })?;

    let likes_count = before.likes_count();
    ensure!(!before.is_liked_by(user), AlreadyLikedSnafu { likes_count });

    tracing::info!(likes_count = likes_count + 1, "liked video");
    Ok(likes_count + 1)
}

/// Removes `user` from the likers of the video and returns the new like count.
#[instrument(skip(db))]
pub async fn unlike(
    user: &Record<User>,
    video_key: &str,
    db: &Database,
) -> Result<usize, FeedbackError> {
    let before = Video::remove_like(video_key, user, db)
        .await
        .context(FeedbackStoreSnafu)?
        .context(FeedbackVideoMissingSnafu { video_key })?;

    let likes_count = before.likes_count();
    ensure!(before.is_liked_by(user), NotLikedSnafu { likes_count });

    tracing::info!(likes_count = likes_count - 1, "unliked video");
    Ok(likes_count - 1)
}
