use std::sync::Arc;

use derive_new::new;

use crate::auth::Authenticator;
use crate::database::Database;

/// Shared state handed to every request handler.
#[derive(Debug, Clone, new)]
pub struct App {
    pub database: Database,
    pub authenticator: Arc<Authenticator>,
}
