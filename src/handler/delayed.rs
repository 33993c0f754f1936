//! Fixed-delay work simulation
//!
//! A request resolves to exactly one [`Outcome`]: the timer wins and the body is
//! produced, or the cancellation signal wins and only a log line is left behind.

use std::time::Duration;

use hyper::body::Bytes;

use super::RequestContext;
use crate::logger;

/// How long every request "works" before answering.
pub const WORK_DELAY: Duration = Duration::from_secs(2);

/// Body written when the work completes.
pub const RESPONSE_BODY: &[u8] = b"request processed";

/// Result of handling one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Delay elapsed first; the bytes go to the client.
    Completed(Bytes),
    /// The client went away first; nothing is written.
    Cancelled,
}

impl Outcome {
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Races the work delay against the request's cancellation signal.
#[derive(Debug, Clone, Copy)]
pub struct RequestHandler {
    delay: Duration,
}

impl RequestHandler {
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Handle one request.
    ///
    /// Suspends exactly once, until either the delay elapses or `ctx` fires.
    /// If both are ready at the same poll, either branch may be taken.
    pub async fn handle(&self, ctx: &RequestContext) -> Outcome {
        tokio::select! {
            () = tokio::time::sleep(self.delay) => {
                Outcome::Completed(Bytes::from_static(RESPONSE_BODY))
            }
            () = ctx.cancelled() => {
                logger::log_request_cancelled();
                Outcome::Cancelled
            }
        }
    }
}

impl Default for RequestHandler {
    fn default() -> Self {
        Self::new(WORK_DELAY)
    }
}
