use tracing::instrument;

use crate::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum VideoError {
    #[snafu(display("Video key is required"))]
    MissingKey,

    #[snafu(display("Video '{video_key}' already exists"))]
    DuplicateKey { video_key: String },

    #[snafu(display("Video not found"))]
    VideoMissing { video_key: String },

    #[snafu(display("Only the uploader can delete this video"))]
    NotUploader { video_key: String },

    #[snafu(display("{source}"))]
    VideoStore { source: DatabaseQueryError },
}

/// Registers a freshly uploaded video with no likes and no comments.
#[instrument(skip(uploader, db), fields(uploader_id = %uploader.id))]
pub async fn upload(
    uploader: &User,
    video_key: &str,
    caption: Option<String>,
    db: &Database,
) -> Result<Video, VideoError> {
    let video_key = video_key.trim();
    ensure!(!video_key.is_empty(), MissingKeySnafu);

    let existing = Video::by_key(video_key, db).await.context(VideoStoreSnafu)?;
    ensure!(existing.is_none(), DuplicateKeySnafu { video_key });

    let caption = caption
        .map(|caption| caption.trim().to_string())
        .filter(|caption| !caption.is_empty());

    let video = Video::new(video_key.to_string(), uploader.id.clone(), caption)
        .insert(db)
        .await
        .context(VideoStoreSnafu)?;

    tracing::info!(video_key = %video.video_key, "uploaded video");
    Ok(video)
}

/// Deletes a video on behalf of `requester`, who must be its uploader.
///
/// Comments on the video are left in place.
#[instrument(skip(requester, db), fields(requester_id = %requester))]
pub async fn delete(
    requester: &Record<User>,
    video_key: &str,
    db: &Database,
) -> Result<Video, VideoError> {
    let video = Video::by_key(video_key, db)
        .await
        .context(VideoStoreSnafu)?
        .context(VideoMissingSnafu { video_key })?;

    ensure!(video.is_uploaded_by(requester), NotUploaderSnafu { video_key });

    let deleted = Video::remove(video_key, db)
        .await
        .context(VideoStoreSnafu)?
        .context(VideoMissingSnafu { video_key })?;

    tracing::info!(video_key = %deleted.video_key, "deleted video");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fixtures;

    #[tokio::test]
    async fn uploaded_videos_start_empty() {
        let db = fixtures::database().await;
        let uploader = fixtures::user("uploader", &db).await;

        let video = upload(&uploader, "intro", Some("  hello  ".into()), &db)
            .await
            .unwrap();

        assert_eq!(video.uploader_id, uploader.id);
        assert_eq!(video.caption.as_deref(), Some("hello"));
        assert_eq!(video.likes_count(), 0);
        assert_eq!(video.comments_number, 0);

        let found = Video::by_key("intro", &db).await.unwrap();
        assert_eq!(found, Some(video));
    }

    #[tokio::test]
    async fn video_keys_are_unique() {
        let db = fixtures::database().await;
        let uploader = fixtures::user("uploader", &db).await;
        fixtures::video("intro", &uploader, &db).await;

        let result = upload(&uploader, "intro", None, &db).await;
        assert!(matches!(result, Err(VideoError::DuplicateKey { .. })));
    }

    #[tokio::test]
    async fn only_the_uploader_can_delete() {
        let db = fixtures::database().await;
        let uploader = fixtures::user("uploader", &db).await;
        let stranger = fixtures::user("stranger", &db).await;
        fixtures::video("intro", &uploader, &db).await;

        let result = delete(&stranger.id, "intro", &db).await;
        assert!(matches!(result, Err(VideoError::NotUploader { .. })));
        assert!(Video::by_key("intro", &db).await.unwrap().is_some());

        let deleted = delete(&uploader.id, "intro", &db).await.unwrap();
        assert_eq!(deleted.video_key, "intro");
        assert!(Video::by_key("intro", &db).await.unwrap().is_none());

        let result = delete(&uploader.id, "intro", &db).await;
        assert!(matches!(result, Err(VideoError::VideoMissing { .. })));
    }
}
