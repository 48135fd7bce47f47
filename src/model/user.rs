use crate::prelude::*;

pub const USERNAME_MAX_LENGTH: usize = 24;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[new(default)]
    pub id: Record<User>,
    #[new(default)]
    pub created_at: Timestamp,
    pub username: String,
    pub fingerprint: String,
}

define_table!("users" : User = id);

define_relation! {
    User > get(id: &Record<User>) > Option<User>
        where "SELECT * FROM users WHERE id = $id LIMIT 1"
}

define_relation! {
    User > by_username(username: &str) > Option<User>
        where "SELECT * FROM users WHERE username = $username LIMIT 1"
}

impl User {
    /// Stores a new user. Fails when the username is already taken.
    #[tracing::instrument(level = "debug", skip(db))]
    pub async fn insert(&self, db: &Database) -> Result<User, DatabaseQueryError> {
        db.sql("CREATE users CONTENT $user")
            .bind(("user", self))
            .fetch_one()
            .await
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum InvalidUsername {
    #[snafu(display("Username is required"))]
    Empty,

    #[snafu(display("Username max length is {USERNAME_MAX_LENGTH} characters"))]
    TooLong,

    #[snafu(display("Username can only include letters, numbers, underscores, and spaces"))]
    Charset,
}

/// Trims a requested display name and checks it against the username rules.
pub fn validate_username(username: &str) -> Result<&str, InvalidUsername> {
    let username = username.trim();

    ensure!(!username.is_empty(), EmptySnafu);
    ensure!(username.chars().count() <= USERNAME_MAX_LENGTH, TooLongSnafu);
    ensure!(
        username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' '),
        CharsetSnafu
    );

    Ok(username)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_letters_digits_underscores_and_spaces() {
        assert_eq!(validate_username("  Ina_Norman 2 "), Ok("Ina_Norman 2"));
    }

    #[test]
    fn rejects_blank_names() {
        assert_eq!(validate_username("   "), Err(InvalidUsername::Empty));
    }

    #[test]
    fn length_limit_applies_after_trimming() {
        let exact = "a".repeat(USERNAME_MAX_LENGTH);
        assert!(validate_username(&format!("  {exact}  ")).is_ok());
        assert_eq!(
            validate_username(&"a".repeat(USERNAME_MAX_LENGTH + 1)),
            Err(InvalidUsername::TooLong)
        );
    }

    #[test]
    fn rejects_punctuation_and_non_ascii() {
        assert_eq!(validate_username("mabelle!"), Err(InvalidUsername::Charset));
        assert_eq!(validate_username("byrd-stokes"), Err(InvalidUsername::Charset));
        assert_eq!(validate_username("fubukí"), Err(InvalidUsername::Charset));
    }
}
