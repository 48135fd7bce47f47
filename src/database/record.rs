use super::{Table, Thing};

/// A typed record id for a database record. type `T` must implement [Table] trait so that the table name can be inferred.
///
/// This type implements [Default] which creates a new record with a random UUID as the identifier.
pub struct Record<T> {
    inner: Thing,
    _marker: std::marker::PhantomData<T>,
}

impl<T: Table> Record<T> {
    /// Creates a new `Record` from the specified `id` and inferred the table's name from `T`.
    pub fn new(id: impl Into<surrealdb::sql::Id>) -> Self {
        let inner = Thing {
            tb: T::table().to_string(),
            id: id.into(),
        };

        Record {
            inner,
            _marker: std::marker::PhantomData,
        }
    }

    /// Creates a new `Record` with a random UUID as the identifier.
    pub fn uuid() -> Self {
        // string keys, so ids parsed back from clients compare equal
        Self::new(surrealdb::sql::Id::uuid().to_raw())
    }

    /// Parses an id sent by a client. Accepts the raw key (`abc`) as well as the
    /// qualified form (`users:abc`, `users:⟨abc⟩`).
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let key = input
            .strip_prefix(T::table())
            .and_then(|rest| rest.strip_prefix(':'))
            .unwrap_or(input);

        let key = key
            .strip_prefix('⟨')
            .and_then(|rest| rest.strip_suffix('⟩'))
            .unwrap_or(key);

        Self::new(key.to_string())
    }
}

impl<T> Record<T> {
    /// The key of the record without its table name, as exposed to clients.
    pub fn key(&self) -> String {
        self.inner.id.to_raw()
    }
}

impl<T> AsRef<Thing> for Record<T> {
    fn as_ref(&self) -> &Thing {
        &self.inner
    }
}

impl<T: Table> std::default::Default for Record<T> {
    fn default() -> Self {
        Self::uuid()
    }
}

impl<T> std::ops::Deref for Record<T> {
    type Target = Thing;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> std::fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

impl<T> std::fmt::Display for Record<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.inner.fmt(f)
    }
}

impl<T> std::clone::Clone for Record<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T> serde::Serialize for Record<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

impl<'de, T: Table> serde::Deserialize<'de> for Record<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let thing = Thing::deserialize(deserializer)?;

        let expected = T::table();
        let actual = &thing.tb;

        if expected != actual {
            return Err(serde::de::Error::custom(format!(
                "table name mismatch, expected '{expected}' but got '{actual}'"
            )));
        }

        Ok(Record {
            inner: thing,
            _marker: std::marker::PhantomData,
        })
    }
}

impl<T> std::cmp::PartialEq for Record<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> std::cmp::Eq for Record<T> {}

impl<T> std::hash::Hash for Record<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Clip;

    impl Table for Clip {
        fn id(&self) -> &Thing {
            unreachable!("only the table name is needed")
        }

        fn table() -> &'static str {
            "clips"
        }
    }

    #[test]
    fn parse_accepts_raw_and_qualified_ids() {
        let raw = Record::<Clip>::parse("abc");
        let qualified = Record::<Clip>::parse("clips:abc");
        let bracketed = Record::<Clip>::parse("clips:⟨abc⟩");

        assert_eq!(raw, qualified);
        assert_eq!(raw, bracketed);
        assert_eq!(raw.key(), "abc");
        assert_eq!(raw.tb, "clips");
    }

    #[test]
    fn parse_keeps_foreign_table_prefix_in_the_key() {
        let record = Record::<Clip>::parse("users:abc");
        assert_eq!(record.key(), "users:abc", "only the record's own table prefix is stripped");
    }

    #[test]
    fn uuid_records_are_unique() {
        let a = Record::<Clip>::uuid();
        let b = Record::<Clip>::uuid();
        assert_ne!(a, b);
        assert_eq!(a.tb, "clips");
    }
}
