//! Server wiring: configuration, shared state, and route registration.

mod config;

pub use config::{AppConfig, ConfigError};

use actix_web::{web, HttpResponse};

use crate::api::health::HealthState;
use crate::api::{auth, envelope, health, orders, products};
use crate::outbound::store::StoreClient;

/// JSON extractor configuration rendering body failures through the
/// response envelope instead of actix's default error body.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        actix_web::error::InternalError::from_response(err, envelope::validation(message, None))
            .into()
    })
}

/// Register shared state and every route on a service config.
///
/// Returned as a closure so `HttpServer::new` can apply it per worker.
pub fn configure(
    store: web::Data<StoreClient>,
    health_state: web::Data<HealthState>,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(store)
            .app_data(health_state)
            .app_data(json_config())
            .service(products::list_products)
            .service(products::create_product)
            .service(products::get_product)
            .service(products::update_product)
            .service(products::delete_product)
            .service(orders::list_orders)
            .service(orders::create_order)
            .service(orders::get_order)
            .service(orders::update_order)
            .service(orders::delete_order)
            .service(auth::signup)
            .service(auth::login)
            .service(auth::logout)
            .service(auth::me)
            .service(health::ready)
            .service(health::live)
            .default_service(web::route().to(not_found));
    }
}

async fn not_found() -> HttpResponse {
    envelope::not_found("Resource")
}
