// Request context module
// Cancellation signal tied to the lifetime of a single client request

use tokio_util::sync::{CancellationToken, DropGuard};

/// Cancellation signal handed to the handler for one request.
///
/// The serving side owns the cancelling half; the handler can only observe it.
#[derive(Debug, Clone)]
pub struct RequestContext {
    token: CancellationToken,
}

impl RequestContext {
    /// Create a context together with the guard that cancels it.
    ///
    /// Whoever is waiting on the peer keeps the guard alive. Dropping it
    /// (e.g. because hyper abandoned the request) fires the signal; calling
    /// [`DropGuard::disarm`] releases it without cancelling.
    pub fn new() -> (Self, DropGuard) {
        let token = CancellationToken::new();
        let guard = token.clone().drop_guard();
        (Self { token }, guard)
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the request has been cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}
