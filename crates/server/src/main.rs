//! Travel Desk Server Entry Point

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use travel_desk_agent::{DialogueEngine, EngineConfig, EnginePorts};
use travel_desk_catalog::create_catalog;
use travel_desk_config::{load_settings, Settings};
use travel_desk_llm::{OpenAIBackend, OpenAIConfig};
use travel_desk_persistence::{create_stores, Stores};
use travel_desk_server::{create_router, housekeeping::spawn_housekeeping, init_metrics, AppState};
use travel_desk_transport::{BridgeConfig, BridgeSender};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Priority: env vars > config/{env}.toml > config/default.toml > defaults
    let env = std::env::var("TRAVEL_DESK_ENV").ok();
    let config = load_settings(env.as_deref()).context("failed to load configuration")?;

    init_tracing(&config);

    tracing::info!("Starting Travel Desk Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?config.environment,
        config_path = env.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    let llm = OpenAIBackend::new(OpenAIConfig::from(&config.llm)).context("LLM backend")?;
    tracing::info!(model = %config.llm.model, "LLM backend ready");

    let catalog = create_catalog(&config.catalog).context("catalog source")?;

    let stores = match create_stores(&config.persistence, &config.history).await {
        Ok(stores) => {
            if config.persistence.enabled {
                tracing::info!(
                    hosts = ?config.persistence.scylla_hosts,
                    keyspace = %config.persistence.keyspace,
                    "ScyllaDB persistence initialized"
                );
            }
            stores
        }
        Err(e) => {
            tracing::error!(
                "Failed to initialize ScyllaDB: {}. Falling back to in-memory.",
                e
            );
            Stores::in_memory()
        }
    };

    let sender = BridgeSender::new(BridgeConfig::from(&config)).context("delivery bridge")?;

    let engine = Arc::new(DialogueEngine::new(
        EngineConfig::from(&config),
        EnginePorts {
            llm: Arc::new(llm),
            catalog,
            sessions: stores.sessions,
            history: stores.history,
            sender: Arc::new(sender),
        },
    ));

    let mut state = AppState::new(config.clone(), engine.clone());
    if config.observability.metrics_enabled {
        state = state.with_metrics(init_metrics()?);
        tracing::info!("Initialized Prometheus metrics at /metrics");
    }

    let housekeeping = spawn_housekeeping(engine, config.history.clone());

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    housekeeping.abort();
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("travel_desk={},tower_http=debug", level).into()
    });

    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
