use std::process::ExitCode;

use rail_gateway::config::GatewayConfig;
use rail_gateway::rtt::RttClient;
use rail_gateway::web::{AppState, create_router};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "rail_gateway=info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before the subscriber so RUST_LOG can come from it
    let dotenv = dotenvy::dotenv();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => debug!("no .env file, using process environment"),
        Err(e) => warn!(error = %e, "failed to read .env file"),
    }

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "configuration error");
            return ExitCode::FAILURE;
        }
    };

    info!(
        base_url = %config.upstream.base_url,
        timeout_secs = config.upstream.timeout_secs,
        max_concurrent = config.upstream.max_concurrent,
        "upstream configured"
    );

    let client = match RttClient::new(config.upstream.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to create upstream client");
            return ExitCode::FAILURE;
        }
    };

    let app = create_router(AppState::new(client));

    let listener = match tokio::net::TcpListener::bind(config.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(addr = %config.bind, "rail gateway listening");
    info!("  GET  /services/{{station}}");
    info!("  GET  /services/{{station}}/to/{{toStation}}");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }

    info!("shut down");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
