use dotenvy::dotenv;
use snafu::ResultExt;
use tokio::net::TcpListener;

use reelfeed::api::{self, App};
use reelfeed::config::Config;
use reelfeed::error::{BindAddressSnafu, ConnectDatabaseSnafu, InitError, WebServerSnafu};
use reelfeed::logger;

#[tokio::main]
async fn main() -> Result<(), InitError> {
    dotenv().ok();

    let config = Config::from_env()?;

    let _guard = logger::init(&config)?;

    let database = config.database().await.context(ConnectDatabaseSnafu)?;
    let app = App::new(database, config.authenticator());

    let router = api::create_router(app).layer(config.cors()?);

    let address = config.server.host;
    let listener = TcpListener::bind(address)
        .await
        .context(BindAddressSnafu { address })?;

    tracing::info!(%address, "listening for requests");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown())
        .await
        .context(WebServerSnafu)
}

async fn shutdown() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {}", err);
        std::future::pending::<()>().await;
    }

    tracing::info!("shutting down");
}
