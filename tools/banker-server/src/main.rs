//! Banker's Algorithm Server
//!
//! Serves `POST /bankers` and the presentation assets.

use banker_server::{router, ServerConfig};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info");
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.log_level);

    let addr = config.addr();
    let app = router(&config);

    println!("╔═══════════════════════════════════════════════════╗");
    println!("║           Banker's Algorithm Safety Server        ║");
    println!("╠═══════════════════════════════════════════════════╣");
    println!("║  URL: http://{:<37}║", addr);
    println!("║  Press Ctrl+C to stop                             ║");
    println!("╚═══════════════════════════════════════════════════╝");
    println!();

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, "failed to bind: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(%addr, web_dir = %config.web_dir.display(), cors = config.cors, "listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("server error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("shut down");
    ExitCode::SUCCESS
}

/// `RUST_LOG` wins; otherwise `fallback` (from `BANKER_LOG`)
fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
