//! Credit Ledger server
//!
//! Serves the five-account ledger over HTTP.
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! cargo run -- --addr 127.0.0.1:9999 --data-dir /var/lib/ledger
//! FOLDER=/tmp/ledger TIMEOUT=50 WORKERS=4 cargo run -- --reset-data
//! ```
//!
//! Logs are JSON lines on stdout, filtered by `RUST_LOG` (default `info`).
//! The server stops accepting connections on Ctrl-C and exits once in-flight
//! requests have finished.
//!
//! # Exit Codes
//!
//! - 0: Clean shutdown
//! - 1: Runtime, bootstrap or listener failure

use credit_ledger::{bootstrap, cli, http, telemetry};
use std::process;
use std::sync::Arc;
use tracing::{error, info};

fn main() {
    let args = cli::parse_args();
    telemetry::init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(args.worker_threads())
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!(%err, "failed to build runtime");
            process::exit(1);
        }
    };

    if let Err(message) = runtime.block_on(run(args)) {
        error!(%message, "ledger stopped");
        process::exit(1);
    }
}

async fn run(args: cli::CliArgs) -> Result<(), String> {
    let config = args.to_ledger_config();
    let ledger = Arc::new(bootstrap(&config).await.map_err(|err| err.to_string())?);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .map_err(|err| format!("failed to bind {}: {err}", args.addr))?;

    let served = http::serve(listener, Arc::clone(&ledger), shutdown_signal()).await;

    ledger.close().await;
    info!("ledger shut down");
    served.map_err(|err| err.to_string())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
