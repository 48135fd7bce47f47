use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::put;
use axum::{Json, Router};
use tracing::instrument;

use super::{guard, App, Result, Success};
use crate::auth::Caller;
use crate::prelude::*;
use crate::service::feedback;

pub fn routes() -> Router<App> {
    Router::new()
        .route("/likeVideo", put(like))
        .route("/unlikeVideo", put(unlike))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub user_id: String,
    pub video_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikesCount {
    pub likes_count: usize,
}

/// Checks that the caller acts as itself and that the acting user exists.
async fn acting_user(caller: &Caller, payload: &Feedback, app: &App) -> Result<User> {
    let user_id = Record::parse(&payload.user_id);
    caller.require_self(&user_id)?;
    guard::require_user(&user_id, &app.database).await
}

#[instrument(skip_all, fields(caller = %caller.0.id))]
async fn like(
    State(app): State<App>,
    caller: Caller,
    body: Result<Json<Feedback>, JsonRejection>,
) -> Result<Success<LikesCount>> {
    let Json(payload) = body?;
    let user = acting_user(&caller, &payload, &app).await?;

    let likes_count = feedback::like(&user.id, &payload.video_key, &app.database).await?;

    Ok(Success::new(LikesCount { likes_count }))
}

#[instrument(skip_all, fields(caller = %caller.0.id))]
async fn unlike(
    State(app): State<App>,
    caller: Caller,
    body: Result<Json<Feedback>, JsonRejection>,
) -> Result<Success<LikesCount>> {
    let Json(payload) = body?;
    let user = acting_user(&caller, &payload, &app).await?;

    let likes_count = feedback::unlike(&user.id, &payload.video_key, &app.database).await?;

    Ok(Success::new(LikesCount { likes_count }))
}
