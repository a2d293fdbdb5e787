use anyhow::Result;
use wayfarer_api::{build_app, ApiConfig};
use wayfarer_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("wayfarer_api");

    let config = ApiConfig::from_env();
    let app = build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(
        bind = %config.bind,
        attractions = config.upstream.places_api_key.is_some(),
        "wayfarer api started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
