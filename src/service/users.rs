use tracing::instrument;

use crate::model::{validate_username, InvalidUsername};
use crate::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum UserError {
    #[snafu(display("{source}"))]
    InvalidName { source: InvalidUsername },

    #[snafu(display("Fingerprint is required"))]
    MissingFingerprint,

    #[snafu(display("Username '{username}' is already taken"))]
    UsernameTaken { username: String },

    #[snafu(display("{source}"))]
    UserStore { source: DatabaseQueryError },
}

/// Registers a new user under a unique, validated display name.
#[instrument(skip(db))]
pub async fn register(username: &str, fingerprint: &str, db: &Database) -> Result<User, UserError> {
    let username = validate_username(username).context(InvalidNameSnafu)?;

    let fingerprint = fingerprint.trim();
    ensure!(!fingerprint.is_empty(), MissingFingerprintSnafu);

    let existing = User::by_username(username, db)
        .await
        .context(UserStoreSnafu)?;
    ensure!(existing.is_none(), UsernameTakenSnafu { username });

    let user = store(User::new(username.to_string(), fingerprint.to_string()), db).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "registered user");
    Ok(user)
}

/// Inserts `user`. The unique index rejects a concurrent registration of the same name.
async fn store(user: User, db: &Database) -> Result<User, UserError> {
    match user.insert(db).await {
        Ok(user) => Ok(user),
        Err(error) if error.is_unique_violation() => UsernameTakenSnafu {
            username: user.username,
        }
        .fail(),
        Err(error) => Err(error).context(UserStoreSnafu),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fixtures;

    #[tokio::test]
    async fn registered_users_can_be_found_again() {
        let db = fixtures::database().await;

        let user = register(" Ina Norman ", "device-a", &db).await.unwrap();
        assert_eq!(user.username, "Ina Norman");

        let found = User::get(&user.id, &db).await.unwrap();
        assert_eq!(found, Some(user));
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let db = fixtures::database().await;
        fixtures::user("mabelle", &db).await;

        let result = register("mabelle", "device-b", &db).await;
        assert!(matches!(result, Err(UserError::UsernameTaken { .. })));
    }

    #[tokio::test]
    async fn index_conflicts_are_reported_as_taken_names() {
        let db = fixtures::database().await;
        fixtures::user("mabelle", &db).await;

        let error = User::new("mabelle".into(), "device-b".into())
            .insert(&db)
            .await
            .unwrap_err();
        assert!(error.is_unique_violation());

        let result = store(User::new("mabelle".into(), "device-c".into()), &db).await;
        let error = result.unwrap_err();
        assert!(matches!(error, UserError::UsernameTaken { .. }));
        assert_eq!(error.to_string(), "Username 'mabelle' is already taken");
    }

    #[tokio::test]
    async fn invalid_names_and_fingerprints_are_rejected() {
        let db = fixtures::database().await;

        let result = register("no/slashes", "device", &db).await;
        assert!(matches!(
            result,
            Err(UserError::InvalidName { source: InvalidUsername::Charset })
        ));

        let result = register("stokes", "   ", &db).await;
        assert!(matches!(result, Err(UserError::MissingFingerprint)));
    }
}
