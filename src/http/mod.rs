//! HTTP binding of the ledger
//!
//! A thin JSON layer over [`Ledger`]: it decodes request bodies, forwards them
//! to the core and maps [`LedgerError`] to status codes. No business rule lives
//! here.
//!
//! [`Ledger`]: crate::core::Ledger
//! [`LedgerError`]: crate::types::LedgerError

pub mod dto;
pub mod errors;
pub mod routes;

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::core::Ledger;

pub use routes::router;

/// Serve the ledger on `listener` until `shutdown` resolves
///
/// In-flight requests are allowed to finish once shutdown starts.
pub async fn serve<F>(listener: TcpListener, ledger: Arc<Ledger>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "listening");
    }

    axum::serve(listener, router(ledger))
        .with_graceful_shutdown(shutdown)
        .await
}
