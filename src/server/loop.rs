// Server loop module
// Accepts connections forever; each one is served on its own task

use std::sync::Arc;

use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::ServerState;
use crate::logger;

pub async fn run_server_loop(listener: TcpListener, state: Arc<ServerState>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
            Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
        }
    }
}
