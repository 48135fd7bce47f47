use crate::database::query::take;
use crate::database::NoResultsSnafu;
use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[new(default)]
    pub id: Record<Comment>,
    #[new(default)]
    pub created_at: Timestamp,

    pub video_key: String,
    pub commentor_id: Record<User>,
    /// The commentor's username at the time the comment was posted.
    pub commentor_username: String,
    pub comment: String,
}

define_table!("comments" : Comment = id);

define_relation! {
    Comment > for_video(video_key: &str) > Vec<Comment>
        where "SELECT * FROM comments WHERE videoKey = $video_key ORDER BY createdAt ASC"
}

define_relation! {
    Comment > get(id: &Record<Comment>) > Option<Comment>
        where "SELECT * FROM comments WHERE id = $id LIMIT 1"
}

const PUBLISH: &str = r#"
BEGIN TRANSACTION;
CREATE comments CONTENT $comment;
UPDATE videos SET commentsNumber += 1 WHERE videoKey = $video_key RETURN AFTER;
COMMIT TRANSACTION;
"#;

// Both statements are conditional on the comment still belonging to a video
// that exists, so a missing comment or a deleted video changes nothing.
const RETRACT: &str = r#"
BEGIN TRANSACTION;
UPDATE videos SET commentsNumber -= 1 WHERE videoKey = $video_key AND $comment.videoKey = $video_key RETURN AFTER;
DELETE $comment WHERE videoKey = $video_key AND $video_key INSIDE (SELECT VALUE videoKey FROM videos WHERE videoKey = $video_key) RETURN BEFORE;
COMMIT TRANSACTION;
"#;

impl Comment {
    /// Stores the comment and bumps the owning video's counter in a single transaction.
    ///
    /// Returns the stored comment and the video as it is after the increment,
    /// or `None` for the video when no video with the comment's key exists.
    #[tracing::instrument(level = "debug", skip(db))]
    pub async fn publish(
        &self,
        db: &Database,
    ) -> Result<(Comment, Option<Video>), DatabaseQueryError> {
        let mut response = db
            .sql(PUBLISH)
            .bind(("comment", self))
            .bind(("video_key", &self.video_key))
            .execute()
            .await?;

        let comment: Option<Comment> = take(&mut response, 0)?;
        let video: Option<Video> = take(&mut response, 1)?;

        let comment = comment.context(NoResultsSnafu)?;
        Ok((comment, video))
    }

    /// Deletes the comment and decrements the counter of the video `video_key` in a single transaction.
    ///
    /// Returns `None` when no comment with this id exists under an existing video
    /// `video_key`, in which case nothing was changed.
    #[tracing::instrument(level = "debug", skip(db))]
    pub async fn retract(
        id: &Record<Comment>,
        video_key: &str,
        db: &Database,
    ) -> Result<Option<(Comment, Video)>, DatabaseQueryError> {
        let mut response = db
            .sql(RETRACT)
            .bind(("comment", id))
            .bind(("video_key", video_key))
            .execute()
            .await?;

        let video: Option<Video> = take(&mut response, 0)?;
        let comment: Option<Comment> = take(&mut response, 1)?;

        match comment {
            Some(comment) => Ok(Some((comment, video.context(NoResultsSnafu)?))),
            None => Ok(None),
        }
    }
}
