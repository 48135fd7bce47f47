//! JSON documents returned to clients. Record ids are exposed as their bare key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Comment, User, Video};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDocument {
    pub id: String,
    pub video_key: String,
    pub commentor_id: String,
    pub commentor_username: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentDocument {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.key(),
            video_key: comment.video_key,
            commentor_id: comment.commentor_id.key(),
            commentor_username: comment.commentor_username,
            comment: comment.comment,
            created_at: comment.created_at.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDocument {
    fn from(user: User) -> Self {
        Self {
            id: user.id.key(),
            username: user.username,
            created_at: user.created_at.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDocument {
    pub id: String,
    pub video_key: String,
    pub uploader_id: String,
    pub caption: Option<String>,
    pub likes: Vec<String>,
    pub likes_count: usize,
    pub comments_number: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Video> for VideoDocument {
    fn from(video: Video) -> Self {
        Self {
            id: video.id.key(),
            likes_count: video.likes_count(),
            likes: video.likes.iter().map(|user| user.key()).collect(),
            video_key: video.video_key,
            uploader_id: video.uploader_id.key(),
            caption: video.caption,
            comments_number: video.comments_number,
            created_at: video.created_at.0,
        }
    }
}
