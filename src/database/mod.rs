use std::ops::Deref;

use serde::Deserialize;
use snafu::{Location, ResultExt as _, Snafu};
use surrealdb::engine::any::Any;
use surrealdb::opt::auth;
use surrealdb::Surreal;
use url::Url;

/// Helper for executing arbitrary SurrealQL queries.
pub mod query;

/// Typed record ids.
pub mod record;

pub use query::Bindings;
pub use record::Record;
pub use surrealdb::sql::Thing;

/// Timestamps are stored as native SurrealDB datetimes so they sort correctly.
pub type Timestamp = surrealdb::sql::Datetime;

const SCHEMA: &str = include_str!("../../schema.surrealql");

/// Represents a database record that belongs to a table.
pub trait Table {
    /// Returns the ID of the record.
    fn id(&self) -> &Thing;

    /// Returns the name of the table associated with the record.
    fn table() -> &'static str;
}

impl<T: Table> Table for &T {
    fn id(&self) -> &Thing {
        (*self).id()
    }

    fn table() -> &'static str {
        T::table()
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DatabaseQueryError {
    #[snafu(display("failed to execute the query: {source}"))]
    MalformedQuery {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("a statement in the query failed: {source}"))]
    Statement {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("failed to deserialize the database response: {source}"))]
    Deserialize {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("expected exactly one result, but got none"))]
    NoResults {
        #[snafu(implicit)]
        location: Location,
    },
}

impl DatabaseQueryError {
    /// Whether a statement was rejected by a `UNIQUE` index.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DatabaseQueryError::Statement { source, .. } => match source {
                surrealdb::Error::Db(surrealdb::error::Db::IndexExists { .. }) => true,
                // remote engines only carry the message
                other => other.to_string().contains("already contains"),
            },
            _ => false,
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DatabaseConnectionError {
    #[snafu(display("`{endpoint}` is not a valid database endpoint: {source}"))]
    Endpoint {
        endpoint: String,
        source: url::ParseError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cannot connect to the database `{endpoint}`: {source}"))]
    Connect {
        endpoint: Url,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cannot sign in to the database as `{username}`: {source}"))]
    Signin {
        username: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cannot select namespace `{namespace}` and database `{database}`: {source}"))]
    Select {
        namespace: String,
        database: String,
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("cannot apply the database schema: {source}"))]
    Schema {
        source: surrealdb::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

#[derive(Debug, Deserialize, Clone)]
pub struct SurrealConfig {
    #[serde(rename = "surreal_endpoint")]
    pub endpoint: Url,
    #[serde(rename = "surreal_namespace")]
    pub namespace: String,
    #[serde(rename = "surreal_database")]
    pub database: String,
    #[serde(rename = "surreal_username", default)]
    pub username: Option<String>,
    #[serde(rename = "surreal_password", default)]
    pub password: Option<String>,
}

/// Represents a database wrapper.
///
/// Cloning is cheap, every clone shares the same underlying connection.
#[derive(Debug, Clone)]
pub struct Database {
    inner: Surreal<Any>,
}

impl Database {
    /// Connects to the configured endpoint, signs in as root when credentials are present,
    /// selects the namespace and database, then applies the schema.
    #[tracing::instrument(skip_all, fields(endpoint = %config.endpoint))]
    pub async fn connect(config: &SurrealConfig) -> Result<Self, DatabaseConnectionError> {
        let inner = surrealdb::engine::any::connect(config.endpoint.as_str())
            .await
            .context(ConnectSnafu {
                endpoint: config.endpoint.clone(),
            })?;

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            inner
                .signin(auth::Root {
                    username: username.as_str(),
                    password: password.as_str(),
                })
                .await
                .context(SigninSnafu { username })?;
        }

        inner
            .use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .context(SelectSnafu {
                namespace: &config.namespace,
                database: &config.database,
            })?;

        let database = Database { inner };
        database.setup().await?;

        tracing::info!(
            namespace = %config.namespace,
            database = %config.database,
            "connected to the database"
        );

        Ok(database)
    }

    /// Connects to a fresh in-memory datastore. Every call gets its own isolated store.
    pub async fn memory() -> Result<Self, DatabaseConnectionError> {
        const ENDPOINT: &str = "mem://";

        let config = SurrealConfig {
            endpoint: Url::parse(ENDPOINT).context(EndpointSnafu { endpoint: ENDPOINT })?,
            namespace: "reelfeed".into(),
            database: "reelfeed".into(),
            username: None,
            password: None,
        };

        Self::connect(&config).await
    }

    async fn setup(&self) -> Result<(), DatabaseConnectionError> {
        self.inner
            .query(SCHEMA)
            .await
            .context(SchemaSnafu)?
            .check()
            .context(SchemaSnafu)?;

        Ok(())
    }

    /// Create a builder to execute arbitrary SQL code on the database.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let comments: Vec<Comment> = db
    ///     .sql("SELECT * FROM comments WHERE videoKey = $video_key")
    ///     .bind(("video_key", "intro"))
    ///     .fetch_first()
    ///     .await?;
    /// ```
    pub fn sql(&self, query: &str) -> Bindings<'_> {
        Bindings::new(self.inner.query(query))
    }
}

impl Deref for Database {
    type Target = Surreal<Any>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_databases_are_isolated() {
        let first = Database::memory().await.unwrap();
        let second = Database::memory().await.unwrap();

        first
            .sql("CREATE users SET username = 'fubuki'")
            .execute()
            .await
            .unwrap();

        let count = |db: Database| async move {
            db.sql("SELECT VALUE username FROM users")
                .fetch_first::<Vec<String>>()
                .await
                .unwrap()
                .len()
        };

        assert_eq!(count(first).await, 1);
        assert_eq!(count(second).await, 0);
    }
}
