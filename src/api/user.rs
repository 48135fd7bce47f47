use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::instrument;

use super::{guard, App, Result, Success, UserDocument};
use crate::prelude::*;
use crate::service::users;

pub fn routes() -> Router<App> {
    Router::new()
        .route("/register", post(register))
        .route("/:user_id", get(info))
}

#[derive(Debug, Deserialize)]
pub struct Register {
    pub username: String,
    pub fingerprint: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registered {
    pub user_document: UserDocument,
    pub access_token: String,
}

#[instrument(skip_all)]
async fn register(
    State(app): State<App>,
    body: Result<Json<Register>, JsonRejection>,
) -> Result<Success<Registered>> {
    let Json(payload) = body?;
    let user = users::register(&payload.username, &payload.fingerprint, &app.database).await?;
    let access_token = app.authenticator.issue(&user)?;

    Ok(Success::new(Registered {
        user_document: user.into(),
        access_token,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_document: UserDocument,
}

#[instrument(skip(app))]
async fn info(State(app): State<App>, Path(user_id): Path<String>) -> Result<Success<UserInfo>> {
    let user = guard::require_user(&Record::parse(&user_id), &app.database).await?;

    Ok(Success::new(UserInfo {
        user_document: user.into(),
    }))
}
