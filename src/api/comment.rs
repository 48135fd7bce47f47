use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tracing::instrument;

use super::{guard, App, CommentDocument, Result, Success};
use crate::prelude::*;
use crate::service::comments::{self, CommentChange};

pub fn routes() -> Router<App> {
    Router::new()
        .route("/getComments", get(list))
        .route("/postComment", post(create))
        .route("/delete", delete(remove))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListComments {
    pub video_key: String,
}

#[derive(Debug, Serialize)]
pub struct CommentList {
    pub comments: Vec<CommentDocument>,
}

#[instrument(skip_all)]
async fn list(
    State(app): State<App>,
    query: Result<Query<ListComments>, QueryRejection>,
) -> Result<Success<CommentList>> {
    let Query(ListComments { video_key }) = query?;
    let video = guard::require_video(&video_key, &app.database).await?;

    let comments = comments::list(&video, &app.database).await?;

    Ok(Success::new(CommentList {
        comments: comments.into_iter().map(CommentDocument::from).collect(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostComment {
    pub video_key: String,
    pub commentor_id: String,
    pub comment: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostedComment {
    pub comment_document: CommentDocument,
    pub new_comments_number: Option<i64>,
}

#[instrument(skip_all)]
async fn create(
    State(app): State<App>,
    body: Result<Json<PostComment>, JsonRejection>,
) -> Result<Success<PostedComment>> {
    let Json(payload) = body?;
    let video = guard::require_video(&payload.video_key, &app.database).await?;
    let commentor = Record::parse(&payload.commentor_id);
    let commentor = guard::require_user(&commentor, &app.database).await?;

    let CommentChange {
        comment,
        comments_number,
    } = comments::post(&video, &commentor, &payload.comment, &app.database).await?;

    Ok(Success::new(PostedComment {
        comment_document: comment.into(),
        new_comments_number: comments_number,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteComment {
    pub comment_id: String,
    /// When present, the comment must belong to this video.
    #[serde(default)]
    pub video_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedComment {
    pub deleted_comment_document: CommentDocument,
    pub new_comments_number: Option<i64>,
}

#[instrument(skip_all)]
async fn remove(
    State(app): State<App>,
    query: Result<Query<DeleteComment>, QueryRejection>,
) -> Result<Success<DeletedComment>> {
    let Query(DeleteComment {
        comment_id,
        video_key,
    }) = query?;

    let comment =
        comments::find(&Record::parse(&comment_id), video_key.as_deref(), &app.database).await?;
    let video = guard::require_video(&comment.video_key, &app.database).await?;

    let CommentChange {
        comment,
        comments_number,
    } = comments::delete(&video, &comment, &app.database).await?;

    Ok(Success::new(DeletedComment {
        deleted_comment_document: comment.into(),
        new_comments_number: comments_number,
    }))
}
