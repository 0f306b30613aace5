//! The resilient read/write facade.
//!
//! Clients of the battle system talk through one contract,
//! [`GatewayApi`], which has two interchangeable implementations:
//!
//! - [`HttpGateway`]: the primary path, a plain JSON client against
//!   the HTTP surface.
//! - [`DirectGateway`]: the fallback, the same five operations run
//!   straight against the in-process services. Same ground truth,
//!   different road.
//!
//! [`Resilient`] stacks one on the other: a transport-level failure on
//! the primary is retried once via the fallback; a domain failure
//! (`Conflict`, `NotFound`, ...) is final, because replaying a rejected
//! attack through another path would apply a now-illegal move.

#![allow(async_fn_in_trait)]

mod api;
mod direct;
mod http;
mod resilient;

pub use api::{GatewayApi, GatewayError};
pub use direct::DirectGateway;
pub use http::HttpGateway;
pub use resilient::Resilient;
