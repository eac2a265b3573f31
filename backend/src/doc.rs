//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint and the wire schemas. The
//! generated document backs Swagger UI in debug builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::{
    AuthUser, Order, OrderItem, OrderStatus, OrderWithItems, Product, ProductSummary, Rating,
    RatingsSummary, Session, UserProfile,
};

/// Enrich the generated document with the bearer token scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the storefront API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Storefront backend API",
        description = "Products, orders, and account endpoints over a hosted store."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::api::products::list_products,
        crate::api::products::create_product,
        crate::api::products::get_product,
        crate::api::products::update_product,
        crate::api::products::delete_product,
        crate::api::orders::list_orders,
        crate::api::orders::create_order,
        crate::api::orders::get_order,
        crate::api::orders::update_order,
        crate::api::orders::delete_order,
        crate::api::auth::signup,
        crate::api::auth::login,
        crate::api::auth::logout,
        crate::api::auth::me,
        crate::api::health::ready,
        crate::api::health::live,
    ),
    components(schemas(
        Product,
        ProductSummary,
        Rating,
        RatingsSummary,
        Order,
        OrderItem,
        OrderStatus,
        OrderWithItems,
        AuthUser,
        Session,
        UserProfile,
    )),
    tags(
        (name = "products", description = "Catalogue management"),
        (name = "orders", description = "Order placement and tracking"),
        (name = "auth", description = "Account and session endpoints"),
        (name = "health", description = "Probes for orchestration")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_covers_every_endpoint() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/api/products",
            "/api/products/{id}",
            "/api/orders",
            "/api/orders/{id}",
            "/api/auth/signup",
            "/api/auth/login",
            "/api/auth/logout",
            "/api/auth/me",
            "/health/ready",
            "/health/live",
        ] {
            assert!(paths.contains(&expected), "missing path {expected}");
        }
    }
}
