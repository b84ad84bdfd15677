//! Storefront driver entry point.
//!
//! Reads one JSON [`app::Command`] per line from stdin and writes one JSON
//! result per line to stdout. Logs go to stderr.

use std::sync::Arc;

use app::{Command, Config, LogFormat, Storefront};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, shutting down");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, shutting down");
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn serve_ops(storefront: Arc<Storefront>, addr: std::net::SocketAddr) {
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");
    let router = app::create_ops_router(storefront, metrics_handle);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind metrics address");
    tracing::info!(%addr, "serving health and metrics");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "ops server stopped");
        }
    });
}

async fn handle_line(storefront: &Storefront, line: &str) -> serde_json::Value {
    let result = match Command::parse(line) {
        Ok(command) => storefront.execute(command).await,
        Err(e) => Err(e.into()),
    };
    match result {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(error = %e, "command failed");
            json!({ "error": e.to_string() })
        }
    }
}

#[tokio::main]
async fn main() {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    init_tracing(&config);

    // 2. Build the storefront
    let storefront =
        Arc::new(Storefront::from_config(&config).expect("failed to build storefront"));
    tracing::info!(backend_api = %config.backend_api, "storefront ready");

    // 3. Expose health and metrics if requested
    if let Some(addr) = config.metrics_addr {
        serve_ops(storefront.clone(), addr).await;
    }

    // 4. Execute commands until stdin closes or a signal arrives
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => {
                    let output = handle_line(&storefront, &line).await;
                    println!("{output}");
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "failed to read stdin");
                    break;
                }
            },
        }
    }

    tracing::info!("storefront stopped");
}
