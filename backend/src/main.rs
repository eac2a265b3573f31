//! Backend entry-point: wires the REST endpoints and OpenAPI docs.

use actix_web::{web, App, HttpServer};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::api::health::HealthState;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::outbound::store::StoreClient;
use backend::server::{self, AppConfig};
use backend::RequestId;

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

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    let store = StoreClient::new(
        config.store_url.clone(),
        config.store_anon_key.clone(),
        config.store_timeout,
    )
    .map_err(std::io::Error::other)?;

    let store = web::Data::new(store);
    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the probe state stays reachable.
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let app = App::new()
            .wrap(RequestId)
            .configure(server::configure(
                store.clone(),
                server_health_state.clone(),
            ));
        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
        app
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
