#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use std::net::SocketAddr;

use anyhow::Result;
use axum::Extension;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::api::JwtKeys;
use crate::api::router;
use crate::notifier::Notifier;
use crate::scratchpad::Scratchpad;
use crate::storage::Storage;
use crate::storage::setup;
use crate::uploads::UploadStore;
use crate::utils::env_var_or_else;

mod api;
mod graceful_shutdown;
mod notifier;
mod pages;
mod password;
mod projects;
mod scratchpad;
mod storage;
#[cfg(test)]
mod tests;
mod trips;
mod uploads;
mod users;
mod utils;

const DEFAULT_RUST_LOG: &str = "opsportal=debug,tower_http=debug";
const DEFAULT_ADDRESS: &str = "0.0.0.0:6000";
const DEFAULT_UPLOAD_DIR: &str = "uploads/network-diagrams";
const DEFAULT_WORK_REPORT_DIR: &str = "uploads/work-reports";

/// Upload size limit of 16 MiB; larger requests are refused with 413
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let app = setup_app().await?;

    let address = setup_address()?;
    tracing::info!("Listening on {}", address);

    let listener = tokio::net::TcpListener::bind(address).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await?;

    Ok(())
}

/// Create and setup the app with its dependencies
///
/// # Errors
///
/// Will return `Err` if any of its dependencies fail to load:
/// - Storage backend
/// - Upload bucket directories
pub async fn setup_app() -> Result<Router> {
    let storage = setup().await;

    let upload_store = UploadStore::open(
        env_var_or_else("UPLOAD_DIR", || String::from(DEFAULT_UPLOAD_DIR)),
        env_var_or_else("WORK_REPORT_DIR", || String::from(DEFAULT_WORK_REPORT_DIR)),
    )
    .await?;

    Ok(create_router(
        storage,
        upload_store,
        Scratchpad::new(),
        Notifier::log_only(),
        setup_jwt_keys(),
    ))
}

/// Create the router for the portal
fn create_router<S: Storage>(
    storage: S,
    upload_store: UploadStore,
    scratchpad: Scratchpad,
    notifier: Notifier,
    jwt_keys: JwtKeys,
) -> Router {
    router::<S>()
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(Extension(storage))
        .layer(Extension(upload_store))
        .layer(Extension(scratchpad))
        .layer(Extension(notifier))
        .layer(Extension(jwt_keys))
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.into()),
        ))
        .with(fmt::layer())
        .init();
}

fn setup_jwt_keys() -> JwtKeys {
    use crate::password::generate;

    let jwt_secret = env_var_or_else("JWT_SECRET", || {
        let jwt_secret = generate();
        tracing::info!("`JWT_SECRET` is not set, generating temporary one: {jwt_secret}");
        jwt_secret
    });

    JwtKeys::new(jwt_secret.as_bytes())
}

fn setup_address() -> Result<SocketAddr> {
    let mut address =
        env_var_or_else("ADDRESS", || String::from(DEFAULT_ADDRESS)).parse::<SocketAddr>()?;

    // optional override of just the port
    if let Ok(port) = std::env::var("PORT") {
        // only check non-empty strings
        if !port.is_empty() {
            let port = port.parse::<u16>()?;

            address.set_port(port);
        }
    }

    Ok(address)
}
