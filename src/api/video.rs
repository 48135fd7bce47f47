use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tracing::instrument;

use super::{guard, App, Result, Success, VideoDocument};
use crate::auth::Caller;
use crate::prelude::*;
use crate::service::videos;

pub fn routes() -> Router<App> {
    Router::new()
        .route("/upload", post(upload))
        .route("/delete/:video_key", delete(remove))
        .route("/:video_key", get(info))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    pub uploader_id: String,
    pub video_key: String,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Uploaded {
    pub video_document: VideoDocument,
}

#[instrument(skip_all, fields(caller = %caller.0.id))]
async fn upload(
    State(app): State<App>,
    caller: Caller,
    body: Result<Json<Upload>, JsonRejection>,
) -> Result<Success<Uploaded>> {
    let Json(payload) = body?;
    let uploader_id = Record::parse(&payload.uploader_id);
    caller.require_self(&uploader_id)?;
    let uploader = guard::require_user(&uploader_id, &app.database).await?;

    let video = videos::upload(&uploader, &payload.video_key, payload.caption, &app.database).await?;

    Ok(Success::new(Uploaded {
        video_document: video.into(),
    }))
}

#[instrument(skip(app))]
async fn info(State(app): State<App>, Path(video_key): Path<String>) -> Result<Success<Uploaded>> {
    let video = guard::require_video(&video_key, &app.database).await?;

    Ok(Success::new(Uploaded {
        video_document: video.into(),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedVideo {
    pub deleted_video_document: VideoDocument,
}

#[instrument(skip(app, caller), fields(caller = %caller.0.id))]
async fn remove(
    State(app): State<App>,
    caller: Caller,
    Path(video_key): Path<String>,
) -> Result<Success<DeletedVideo>> {
    let video = videos::delete(&caller.user(), &video_key, &app.database).await?;

    Ok(Success::new(DeletedVideo {
        deleted_video_document: video.into(),
    }))
}
