// Connection handling module
// Accepts a single TCP connection and serves it with hyper

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpStream;

use super::dispatch;
use super::ServerState;
use crate::logger;

/// Accept a connection, enforcing the optional connection cap.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - State shared by every connection of this server
pub fn accept_connection(stream: TcpStream, peer_addr: SocketAddr, state: &Arc<ServerState>) {
    let limit = state
        .config
        .performance
        .max_connections
        .map(|max| usize::try_from(max).unwrap_or(usize::MAX));

    let Some(conn_guard) = state.connections.try_track(limit) else {
        logger::log_warning(&format!(
            "Max connections reached ({}). Connection from {peer_addr} rejected.",
            limit.unwrap_or_default()
        ));
        drop(stream);
        return;
    };

    let state = Arc::clone(state);
    tokio::spawn(async move {
        let _conn_guard = conn_guard;
        serve_connection(stream, peer_addr, state).await;
    });
}

/// Serve HTTP/1.1 on the connection until the peer goes away.
async fn serve_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<ServerState>) {
    let io = TokioIo::new(stream);

    let mut builder = http1::Builder::new();
    builder
        .timer(TokioTimer::new())
        .keep_alive(state.config.performance.keep_alive_timeout > 0)
        // EOF from the peer must end the connection so in-flight requests get cancelled
        .half_close(false);

    let conn = builder.serve_connection(
        io,
        service_fn(move |req| dispatch::respond(req, peer_addr, Arc::clone(&state))),
    );

    if let Err(err) = conn.await {
        // A peer hanging up mid-request is the cancellation path, not a failure.
        if !err.is_incomplete_message() {
            logger::log_connection_error(&err);
        }
    }
}
