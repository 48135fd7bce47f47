pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod logger;
pub mod model;
pub mod service;

mod macros;

pub mod prelude {
    pub use derive_new::new;
    pub use serde::{Deserialize, Serialize};
    pub use snafu::{ensure, Location, OptionExt as _, ResultExt as _, Snafu};

    pub use crate::database::{Database, DatabaseQueryError, Record, Table, Thing, Timestamp};
    pub use crate::model::{Comment, User, Video};
    pub use crate::{define_relation, define_table};
}
