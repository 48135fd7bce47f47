use derive_new::new;
use serde::de::DeserializeOwned;
use snafu::{OptionExt as _, ResultExt as _};
use surrealdb::opt::QueryResult;

use super::*;

/// A query builder returned by [Database::sql]. Parameters can be bound using the [bind](Bindings::bind) method which takes any serializable data structure.
///
/// # Example
/// ```ignore
/// let comments_by_fubuki: Vec<Comment> = database.sql("SELECT * FROM comments WHERE commentorId = $user")
///     .bind(("user", &fubuki.id))
///     .fetch_first()
///     .await?;
/// ```
#[derive(Debug, new)]
pub struct Bindings<'a> {
    query: surrealdb::method::Query<'a, Any>,
}

impl Bindings<'_> {
    pub fn bind(mut self, params: impl serde::Serialize) -> Self {
        let query = self.query;
        self.query = query.bind(params);
        self
    }

    /// Execute the query and return a [surrealdb::Response] which is SurrealDB's way to represent a list of statements returned from the database.
    ///
    /// This means that you can execute multiple queries in a single call and get all the results back.
    /// Fails if any of the statements failed, which includes every statement of a cancelled transaction.
    pub async fn execute(self) -> Result<surrealdb::Response, DatabaseQueryError> {
        let response = self.query.await.context(MalformedQuerySnafu)?;
        tracing::trace!(?response, "executed query");
        response.check().context(StatementSnafu)
    }

    /// Execute the query and return the first result as a deserialized value.
    pub async fn fetch_first<T: DeserializeOwned>(self) -> Result<T, DatabaseQueryError>
    where
        usize: QueryResult<T>,
    {
        let mut statements = self.execute().await?;
        take(&mut statements, 0)
    }

    /// Execute the query and return the first result, failing when the statement produced nothing.
    pub async fn fetch_one<T: DeserializeOwned>(self) -> Result<T, DatabaseQueryError>
    where
        usize: QueryResult<Option<T>>,
    {
        self.fetch_first::<Option<T>>()
            .await?
            .context(NoResultsSnafu)
    }
}

/// Deserialize the result of the statement at `index` in a response.
pub fn take<T: DeserializeOwned>(
    response: &mut surrealdb::Response,
    index: usize,
) -> Result<T, DatabaseQueryError>
where
    usize: QueryResult<T>,
{
    response.take::<T>(index).context(DeserializeSnafu)
}
