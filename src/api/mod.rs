use axum::extract::State;
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

mod comment;
mod error;
mod feedback;
mod guard;
mod response;
mod state;
mod user;
mod video;
mod view;

pub use error::*;
pub use response::*;
pub use state::*;
pub use view::*;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Builds the HTTP router with every route mounted under its prefix.
pub fn create_router(app: App) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/comment", comment::routes())
        .nest("/feedback", feedback::routes())
        .nest("/user", user::routes())
        .nest("/video", video::routes())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app)
}

#[derive(Debug, serde::Serialize)]
struct Healthy {}

#[tracing::instrument(skip_all)]
async fn health(State(app): State<App>) -> Result<Success<Healthy>> {
    app.database
        .sql("RETURN true")
        .execute()
        .await?;

    Ok(Success::new(Healthy {}))
}
