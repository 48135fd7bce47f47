//! Resource existence checks run before a handler touches anything.

use super::error::{ApiError, UserNotFoundSnafu, VideoNotFoundSnafu};
use crate::prelude::*;

pub async fn require_video(video_key: &str, db: &Database) -> Result<Video, ApiError> {
    Video::by_key(video_key, db)
        .await?
        .context(VideoNotFoundSnafu { video_key })
}

pub async fn require_user(user_id: &Record<User>, db: &Database) -> Result<User, ApiError> {
    User::get(user_id, db).await?.context(UserNotFoundSnafu {
        user_id: user_id.key(),
    })
}
