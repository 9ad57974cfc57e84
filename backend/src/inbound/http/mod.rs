//! HTTP inbound adapter exposing the user resource and health probes.

pub mod envelope;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register extractor error handling, health probes, and the user routes.
///
/// Callers supply `web::Data<HttpState>` and `web::Data<HealthState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    validation::configure_extractors(cfg);
    cfg.service(health::ready).service(health::live);
    users::configure(cfg);
}
