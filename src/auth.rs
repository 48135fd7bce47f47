use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, TokenData, Validation};
use secrecy::{ExposeSecret as _, SecretString};

use crate::api::{App, Failure};
use crate::prelude::*;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
pub struct UserCredentials {
    // public claims
    pub exp: i64,

    // user data
    pub id: String,
    pub username: String,
}

impl UserCredentials {
    pub fn user(&self) -> Record<User> {
        Record::parse(&self.id)
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AuthError {
    #[snafu(display("failed to decode JWT token"))]
    Decode {
        source: jsonwebtoken::errors::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to encode JWT token"))]
    Encode {
        source: jsonwebtoken::errors::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("request is not authenticated"))]
    ExtractToken {
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("not allowed to act on behalf of another user"))]
    NotSelf { acting: String, caller: String },
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::NotSelf { .. } => StatusCode::FORBIDDEN,
            AuthError::Encode { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Decode { .. } | AuthError::ExtractToken { .. } => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        tracing::warn!(error = ?self, "rejected request");
        Failure::new(self.to_string()).with_status(self.status())
    }
}

/// Issues and verifies HS256 access tokens.
#[derive(Debug, Clone)]
pub struct Authenticator {
    pub secret: SecretString,
    pub algorithm: Algorithm,
    pub validation: Validation,
    pub token_lifetime: Duration,
}

impl Authenticator {
    pub fn new(secret: SecretString, token_lifetime: Duration) -> Self {
        let algorithm = Algorithm::HS256;

        Self {
            secret,
            algorithm,
            validation: Validation::new(algorithm),
            token_lifetime,
        }
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.expose_secret().as_ref())
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.secret.expose_secret().as_ref())
    }

    fn header(&self) -> jsonwebtoken::Header {
        jsonwebtoken::Header::new(self.algorithm)
    }

    pub fn decode(&self, token: &str) -> Result<TokenData<UserCredentials>, AuthError> {
        jsonwebtoken::decode(token, &self.decoding_key(), &self.validation).context(DecodeSnafu)
    }

    pub fn encode(&self, claims: &UserCredentials) -> Result<String, AuthError> {
        jsonwebtoken::encode(&self.header(), claims, &self.encoding_key()).context(EncodeSnafu)
    }

    pub fn expiration(&self) -> i64 {
        (Utc::now() + self.token_lifetime).timestamp()
    }

    pub fn as_credentials(&self, user: &User) -> UserCredentials {
        UserCredentials {
            exp: self.expiration(),
            id: user.id.key(),
            username: user.username.clone(),
        }
    }

    /// Issues an access token for `user`.
    pub fn issue(&self, user: &User) -> Result<String, AuthError> {
        self.encode(&self.as_credentials(user))
    }

    pub fn extract_token(&self, headers: &HeaderMap) -> Result<TokenData<UserCredentials>, AuthError> {
        let header = headers
            .get(header::AUTHORIZATION)
            .context(ExtractTokenSnafu)?;

        let token = header.to_str().ok().context(ExtractTokenSnafu)?;
        let token = token.strip_prefix("Bearer ").context(ExtractTokenSnafu)?;

        self.decode(token)
    }
}

/// The authenticated user making the request.
#[derive(Debug, Clone)]
pub struct Caller(pub UserCredentials);

impl Caller {
    pub fn user(&self) -> Record<User> {
        self.0.user()
    }

    /// Fails unless the caller is the user the request claims to act as.
    pub fn require_self(&self, acting: &Record<User>) -> Result<(), AuthError> {
        let caller = self.user();
        ensure!(
            &caller == acting,
            NotSelfSnafu {
                acting: acting.key(),
                caller: caller.key(),
            }
        );
        Ok(())
    }
}

#[axum::async_trait]
impl FromRequestParts<App> for Caller {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, app: &App) -> Result<Self, Self::Rejection> {
        let token = app.authenticator.extract_token(&parts.headers)?;
        Ok(Caller(token.claims))
    }
}
