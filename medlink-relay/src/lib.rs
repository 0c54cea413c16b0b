//! Reference in-memory signaling relay.
//!
//! Serves the REST boundary the negotiation core polls against:
//! offer/answer slots plus per-role candidate lists, keyed by room.
//! Rooms live in memory only; this is dev and test infrastructure,
//! not a durable store.

mod routes;
mod store;

pub use routes::router;
pub use store::RelayStore;

use tokio::net::TcpListener;
use tracing::info;

/// Run the relay on an already-bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, store: RelayStore) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("signaling relay listening on {addr}");
    }
    axum::serve(listener, router(store)).await
}
