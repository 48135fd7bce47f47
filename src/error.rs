use std::net::SocketAddr;

use snafu::{Location, Snafu};

use crate::database::DatabaseConnectionError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum InitError {
    /// could not parse the configuration from the environment
    #[snafu(display("could not load the configuration: {source}"))]
    Config {
        source: envy::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not initialize the logger
    #[snafu(display("could not initialize the logger: {source}"))]
    InitializeLogger {
        source: tracing::subscriber::SetGlobalDefaultError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("{source}"))]
    ConnectDatabase {
        source: DatabaseConnectionError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("`{origin}` is not a valid CORS origin: {source}"))]
    CorsOrigin {
        origin: String,
        source: axum::http::header::InvalidHeaderValue,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not bind to the given address, check if it's already in use
    #[snafu(display("could not bind to {address}: {source}"))]
    BindAddress {
        address: SocketAddr,
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },

    /// Could not serve the application
    #[snafu(display("the web server stopped unexpectedly: {source}"))]
    WebServer {
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },
}
