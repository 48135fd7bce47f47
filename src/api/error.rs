use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use snafu::Snafu;

use super::Failure;
use crate::auth::AuthError;
use crate::database::DatabaseQueryError;
use crate::service::comments::CommentError;
use crate::service::feedback::FeedbackError;
use crate::service::users::UserError;
use crate::service::videos::VideoError;

/// Every way a request can fail. All of them are reported as
/// `{ success: false, error }`, with status 400 unless authentication failed.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApiError {
    #[snafu(display("Video not found"))]
    VideoNotFound { video_key: String },

    #[snafu(display("User not found"))]
    UserNotFound { user_id: String },

    #[snafu(context(false), display("{source}"))]
    Comment { source: CommentError },

    #[snafu(context(false), display("{source}"))]
    Feedback { source: FeedbackError },

    #[snafu(context(false), display("{source}"))]
    User { source: UserError },

    #[snafu(context(false), display("{source}"))]
    Video { source: VideoError },

    #[snafu(context(false), display("{source}"))]
    Auth { source: AuthError },

    #[snafu(context(false), display("{source}"))]
    Store { source: DatabaseQueryError },

    #[snafu(context(false), display("{source}"))]
    Body { source: JsonRejection },

    #[snafu(context(false), display("{source}"))]
    QueryString { source: QueryRejection },
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth { source } => source.status(),
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn likes_count(&self) -> Option<usize> {
        match self {
            ApiError::Feedback { source } => source.likes_count(),
            _ => None,
        }
    }

    fn is_unexpected(&self) -> bool {
        matches!(
            self,
            ApiError::Store { .. }
                | ApiError::Comment {
                    source: CommentError::CommentStore { .. }
                }
                | ApiError::Feedback {
                    source: FeedbackError::FeedbackStore { .. }
                }
                | ApiError::User {
                    source: UserError::UserStore { .. }
                }
                | ApiError::Video {
                    source: VideoError::VideoStore { .. }
                }
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if self.is_unexpected() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::info!(error = %self, "request rejected");
        }

        Failure::new(self.to_string())
            .with_likes_count(self.likes_count())
            .with_status(self.status())
    }
}
