// Server module entry point
// Accept loop of the page server with Ctrl+C shutdown

pub mod connection;
pub mod handler;
pub mod listener;

pub use listener::create_listener;

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;

/// Accept connections until Ctrl+C
pub async fn run(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    run_until(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            logger::log_warning(&format!("Failed to listen for Ctrl+C: {e}"));
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Accept connections until `shutdown` completes
///
/// Connections already accepted keep running in their own tasks.
pub async fn run_until(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()>,
) -> std::io::Result<()> {
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        logger::log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
                        connection::handle_connection(stream, Arc::clone(&state));
                    }
                    Err(e) => {
                        let reason = format!("failed to accept connection: {e}");
                        state.observers.app_error(&reason, None);
                    }
                }
            }

            () = &mut shutdown => {
                logger::write_info("[Shutdown] Stopped accepting connections");
                return Ok(());
            }
        }
    }
}
