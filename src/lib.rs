//! An HTTP server whose every request takes a fixed two seconds of simulated
//! work, and is abandoned early when the client disconnects first.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use error::Error;
pub use handler::{Outcome, RequestContext, RequestHandler};
pub use server::Server;
