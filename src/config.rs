use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::auth::Authenticator;
use crate::database::{DatabaseConnectionError, SurrealConfig};
use crate::error::{ConfigSnafu, CorsOriginSnafu, InitError};
use crate::prelude::*;

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub surreal: SurrealConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(rename = "host_address")]
    pub host: SocketAddr,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Origin allowed to call the API from a browser. Any origin when unset.
    #[serde(default)]
    pub cors_origin: Option<String>,

    #[serde(rename = "auth_secret")]
    pub secret: String,
    #[serde(rename = "auth_token_days", default = "default_token_days")]
    pub token_days: i64,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_token_days() -> i64 {
    7
}

impl Config {
    pub fn from_env() -> Result<Config, InitError> {
        Ok(Config {
            server: envy::from_env().context(ConfigSnafu)?,
            surreal: envy::from_env().context(ConfigSnafu)?,
        })
    }

    pub async fn database(&self) -> Result<Database, DatabaseConnectionError> {
        Database::connect(&self.surreal).await
    }

    pub fn authenticator(&self) -> Arc<Authenticator> {
        let secret = SecretString::new(self.server.secret.clone());
        let lifetime = chrono::Duration::days(self.server.token_days);

        Arc::new(Authenticator::new(secret, lifetime))
    }

    pub fn cors(&self) -> Result<CorsLayer, InitError> {
        let origin = match &self.server.cors_origin {
            Some(origin) => {
                let origin: HeaderValue = origin.parse().context(CorsOriginSnafu { origin })?;
                AllowOrigin::exact(origin)
            }
            None => AllowOrigin::any(),
        };

        Ok(CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any))
    }
}
