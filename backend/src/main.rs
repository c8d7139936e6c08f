//! Service entry-point: wires REST endpoints, the expiration sweeper, and
//! OpenAPI docs.

use std::env;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use booking_backend::domain::DEFAULT_SWEEP_INTERVAL;
use booking_backend::inbound::http::health::{live, ready, HealthState};
use booking_backend::seed::seed_demo_data;
use booking_backend::server::{configure, AppContext};
#[cfg(debug_assertions)]
use booking_backend::ApiDoc;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
    let sweep_interval = env::var("SWEEP_INTERVAL_SECS")
        .ok()
        .and_then(|value| value.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_SWEEP_INTERVAL);

    let context = AppContext::in_memory(sweep_interval);

    if env::var("SEED_DEMO_DATA").ok().as_deref() == Some("1") {
        match seed_demo_data(&context.state.users, &context.state.units).await {
            Ok(outcome) => info!(?outcome, "demo data seeding finished"),
            Err(error) => warn!(%error, "demo data seeding failed"),
        }
    }

    context.state.availability.warm_up().await;
    let sweeper_handle = context.sweeper.clone().spawn();

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays accessible.
    let server_health_state = health_state.clone();
    let state = context.state.clone();
    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(server_health_state.clone())
            .configure(configure(state.clone()))
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr.as_str())?;

    info!(%bind_addr, sweep_interval_secs = sweep_interval.as_secs(), "server starting");
    health_state.mark_ready();
    let result = server.run().await;
    sweeper_handle.abort();
    result
}
