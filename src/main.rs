use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cinemai_playback_api::{
    api::{create_router, AppState},
    config::Config,
    services::{
        providers::{RestCatalogProvider, RestIdentityProvider, S3UrlSigner},
        PlaybackService,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let upstream_timeout = Duration::from_secs(config.upstream_timeout_secs);

    // Provider clients are built once here and injected; the issuer's
    // dependencies stay visible in its signature and mockable in tests.
    let identity = RestIdentityProvider::new(
        config.identity_url.clone(),
        config.identity_api_key.clone(),
        upstream_timeout,
    )?;
    let catalog = RestCatalogProvider::new(
        config.catalog_url.clone(),
        config.catalog_api_key.clone(),
        upstream_timeout,
    )?;
    let signer = S3UrlSigner::new(
        config.storage_bucket.clone(),
        config.storage_region.clone(),
        config.storage_endpoint.clone(),
        config.storage_access_key_id.clone(),
        config.storage_secret_access_key.clone(),
    )?;

    let playback = PlaybackService::new(
        Arc::new(identity),
        Arc::new(catalog),
        Arc::new(signer),
        config.storage_bucket.clone(),
        Duration::from_secs(config.signed_url_ttl_secs),
    );

    let app = create_router(AppState::new(playback));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Playback API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
