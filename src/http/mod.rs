//! HTTP protocol layer module
//!
//! Response builders, decoupled from the request handling logic.

pub mod response;

pub use response::{build_500_response, build_body_response};
