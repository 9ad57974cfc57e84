//! Server construction and middleware wiring.

mod config;

pub use config::ServerSettings;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use zeus_backend::Trace;
#[cfg(debug_assertions)]
use zeus_backend::doc::ApiDoc;
use zeus_backend::domain::{EditPolicy, UserAdminService};
use zeus_backend::inbound::http;
use zeus_backend::inbound::http::health::HealthState;
use zeus_backend::inbound::http::state::HttpState;
use zeus_backend::outbound::memory::{InMemoryPermissionResolver, InMemoryUserStore};

/// Wire the in-memory adapters into the user administration service.
///
/// # Errors
/// Returns [`std::io::Error`] if the demo data cannot be loaded.
fn build_http_state(settings: &ServerSettings) -> std::io::Result<web::Data<HttpState>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let store = if settings.seed_demo_users {
        InMemoryUserStore::with_demo_users(clock)
            .map_err(|err| std::io::Error::other(format!("demo users failed to load: {err}")))?
    } else {
        InMemoryUserStore::new(clock)
    };
    let store = Arc::new(store);
    let permissions = if settings.seed_demo_users {
        InMemoryPermissionResolver::with_demo_grants(store.clone())
            .map_err(|err| std::io::Error::other(format!("demo grants failed to load: {err}")))?
    } else {
        InMemoryPermissionResolver::new(store.clone())
    };
    let edit_policy = EditPolicy::from_lenient(settings.lenient_edits);
    let service = Arc::new(
        UserAdminService::new(store, Arc::new(permissions)).with_edit_policy(edit_policy),
    );
    info!(?edit_policy, seeded = settings.seed_demo_users, "user service ready");
    Ok(web::Data::new(HttpState::new(service.clone(), service)))
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(http::configure);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and settings.
///
/// Readiness flips once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when wiring adapters, binding the socket, or
/// starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    settings: &ServerSettings,
) -> std::io::Result<Server> {
    let http_state = build_http_state(settings)?;
    let server_health_state = health_state.clone();
    let bind_addr = settings.bind_addr();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "server listening");
    health_state.mark_ready();
    Ok(server)
}
