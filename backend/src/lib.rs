//! User administration backend library.
//!
//! The user resource is split along hexagonal lines: [`domain`] holds the
//! types, ports, and service; [`inbound`] adapts HTTP onto the driving
//! ports; [`outbound`] implements the driven ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
