//! HTTP layer for SignGate.
//!
//! - [`handler`] - the signed-request pipeline ([`GateHandler`])
//! - [`response`] - error and object response construction
//! - [`body`] - the response body type ([`GateResponseBody`])
//! - [`service`] - hyper `Service` implementation ([`GateHttpService`])
//! - [`server`] - accept loop with graceful shutdown ([`server::serve`])

pub mod body;
pub mod handler;
pub mod response;
pub mod server;
pub mod service;

pub use body::GateResponseBody;
pub use handler::{GateHandler, GateHttpConfig};
pub use response::error_to_response;
pub use service::GateHttpService;
