use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use translation_backend::{create_app, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("translation_backend=debug,tower_http=debug")),
        )
        .init();

    let config = Config::discover()?;
    let server = config.server_config.clone();

    let app_state = AppState::new(config)?;
    info!("Using translation provider: {}", app_state.translator.name());

    let app = create_app(app_state);

    let listener = tokio::net::TcpListener::bind((server.host.as_str(), server.port)).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
