// Request dispatch module
// Ties a request's cancellation signal to the lifetime of the hyper service future

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::{Request, Response, Version};
use tokio::sync::oneshot;
use tokio::time::Instant;

use super::ServerState;
use crate::handler::{Outcome, RequestContext};
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Serve one request with the shared handler.
///
/// The handler task, its context and the in-flight count are set up as soon as
/// hyper calls the service, before the returned future is first polled. The
/// future holds the guard for the request's cancellation signal: hyper drops
/// it when the peer closes the connection mid-request (possibly without ever
/// polling it), which cancels the handler. Method, path, headers and body play
/// no part in the outcome.
pub fn respond(
    req: Request<Incoming>,
    peer_addr: SocketAddr,
    state: Arc<ServerState>,
) -> impl Future<Output = Result<Response<Full<Bytes>>, Infallible>> + Send {
    let started = Instant::now();
    let access = state
        .config
        .logging
        .access_log
        .then(|| access_entry(&req, peer_addr));
    // hyper drains or discards whatever body is left unread
    drop(req);

    let (ctx, guard) = RequestContext::new();
    let (tx, rx) = oneshot::channel::<Bytes>();
    let handler = state.handler;
    let in_flight = state.in_flight.track();

    tokio::spawn(async move {
        let _in_flight = in_flight;
        if let Outcome::Completed(body) = handler.handle(&ctx).await {
            // Fails only if the peer left after the timer fired; nothing to report.
            let _ = tx.send(body);
        }
    });

    async move {
        let Ok(body) = rx.await else {
            // Sender dropped without sending while the peer still waits: the handler panicked.
            logger::log_error("Request handler stopped without producing a response");
            return Ok(http::build_500_response());
        };
        drop(guard.disarm());

        if let Some(mut entry) = access {
            entry.body_bytes = body.len();
            entry.request_time_us =
                u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
            logger::log_access(&entry, &state.config.logging.access_log_format);
        }

        Ok(http::build_body_response(body))
    }
}

fn access_entry(req: &Request<Incoming>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().to_string(),
    );
    entry.http_version = version_str(req.version()).to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
