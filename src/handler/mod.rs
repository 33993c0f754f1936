//! Request handler module
//!
//! The single unit of work behind the endpoint: wait out a fixed delay, or give
//! up early once the connection that asked for it has gone away.

mod context;
mod delayed;

pub use context::RequestContext;
pub use delayed::{Outcome, RequestHandler, RESPONSE_BODY, WORK_DELAY};
