// Connection handling module
// Serves a single accepted TCP connection

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::handler;
use crate::config::AppState;

/// Serve `stream` in an observed task
///
/// A connection that fails, panics or is cancelled is reported as an
/// unhandled rejection with origin `connection`.
pub fn handle_connection(stream: tokio::net::TcpStream, state: Arc<AppState>) -> JoinHandle<()> {
    let observers = state.observers.clone();
    observers.spawn_observed("connection", async move {
        let io = TokioIo::new(stream);
        http1::Builder::new()
            .keep_alive(true)
            .serve_connection(
                io,
                service_fn(move |req| handler::handle_request(req, Arc::clone(&state))),
            )
            .await
    })
}
