use crate::prelude::*;

/// A short video. Only metadata lives here, the media itself sits in object storage under `video_key`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[new(default)]
    pub id: Record<Video>,
    #[new(default)]
    pub created_at: Timestamp,

    pub video_key: String,
    pub uploader_id: Record<User>,
    #[serde(default)]
    pub caption: Option<String>,

    /// Users who liked the video. Never contains duplicates.
    #[new(default)]
    #[serde(default)]
    pub likes: Vec<Record<User>>,
    /// Cached number of comments on the video.
    #[new(default)]
    #[serde(default)]
    pub comments_number: i64,
}

define_table!("videos" : Video = id);

impl Video {
    pub fn likes_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_liked_by(&self, user: &Record<User>) -> bool {
        self.likes.contains(user)
    }

    pub fn is_uploaded_by(&self, user: &Record<User>) -> bool {
        &self.uploader_id == user
    }
}

define_relation! {
    Video > by_key(video_key: &str) > Option<Video>
        where "SELECT * FROM videos WHERE videoKey = $video_key LIMIT 1"
}

impl Video {
    /// Stores a new video. Fails when the video key is already in use.
    #[tracing::instrument(level = "debug", skip(db))]
    pub async fn insert(&self, db: &Database) -> Result<Video, DatabaseQueryError> {
        db.sql("CREATE videos CONTENT $video")
            .bind(("video", self))
            .fetch_one()
            .await
    }
}

define_relation! {
    Video > remove(video_key: &str) > Option<Video>
        where "DELETE videos WHERE videoKey = $video_key RETURN BEFORE"
}

// Both statements return the document as it was before the update, which
// tells the caller whether the set actually changed.
define_relation! {
    Video > add_like(video_key: &str, user: &Record<User>) > Option<Video>
        where "UPDATE videos SET likes = array::add(likes, $user) WHERE videoKey = $video_key RETURN BEFORE"
}

define_relation! {
    Video > remove_like(video_key: &str, user: &Record<User>) > Option<Video>
        where "UPDATE videos SET likes = array::complement(likes, [$user]) WHERE videoKey = $video_key RETURN BEFORE"
}
