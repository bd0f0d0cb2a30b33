use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use persona_relay::config::Config;
use persona_relay::cors::OriginPolicy;
use persona_relay::routes;
use persona_relay::services::providers::openai::OpenAiProvider;
use persona_relay::services::relay::ChatRelay;
use persona_relay::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("persona_relay=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env().context("invalid configuration")?;

    if let Some(e) = config.startup_check().context("REQUIRE_API_KEY is set")? {
        tracing::warn!(error = %e, "/chat will answer 503 until a key is configured");
    }

    let persona = config.load_persona()?;
    let provider = OpenAiProvider::new(config.openai_config()).context("building provider client")?;
    let relay = ChatRelay::new(Arc::new(provider), persona, config.completion_params());

    let app = routes::app(
        AppState::shared(relay),
        OriginPolicy::new(&config.allowed_origins),
    );

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!(
        model = %config.model,
        origins = ?config.allowed_origins,
        "🚀 persona relay running at http://localhost:{}",
        config.port
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}
