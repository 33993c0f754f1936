// Server module entry point
// Listener setup, accept loop, per-connection serving and request dispatch

mod connection;
mod dispatch;
mod listener;
mod tracker;

// `loop` is a keyword, so the file is mounted under another name
#[path = "loop.rs"]
mod server_loop;

pub use listener::create_listener;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::Error;
use crate::handler::RequestHandler;
use tracker::Counter;

/// State shared by every connection of one server
pub(crate) struct ServerState {
    pub handler: RequestHandler,
    pub config: Config,
    pub connections: Counter,
    pub in_flight: Counter,
}

/// A bound server, ready to accept connections.
pub struct Server {
    listener: TcpListener,
    state: Arc<ServerState>,
}

impl Server {
    /// Bind `addr` and prepare to serve every request with `handler`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(addr: SocketAddr, handler: RequestHandler, config: Config) -> Result<Self, Error> {
        let listener = create_listener(addr).map_err(|source| Error::Bind { addr, source })?;
        let state = Arc::new(ServerState {
            handler,
            config,
            connections: Counter::new(),
            in_flight: Counter::new(),
        });

        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Counters that stay readable after [`Server::run`] takes the server.
    pub fn stats(&self) -> ServerStats {
        ServerStats {
            state: Arc::clone(&self.state),
        }
    }

    /// Accept and serve connections forever.
    pub async fn run(self) {
        server_loop::run_server_loop(self.listener, self.state).await;
    }
}

/// Live view of a server's connection and request counts
#[derive(Clone)]
pub struct ServerStats {
    state: Arc<ServerState>,
}

impl ServerStats {
    /// Open client connections
    pub fn active_connections(&self) -> usize {
        self.state.connections.get()
    }

    /// Handler tasks that have neither completed nor observed cancellation yet
    pub fn in_flight(&self) -> usize {
        self.state.in_flight.get()
    }
}
