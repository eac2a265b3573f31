//! Catalogue endpoints: list, create, fetch, update, delete.

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::{envelope, page_params, ApiResult};
use crate::domain::validation::is_valid_uuid;
use crate::domain::DomainError;
use crate::models::{Product, ProductSortField, Rating, RatingsSummary};
use crate::outbound::store::{id_filter, ListQuery, StoreClient, StoreError};
use pagination::SortOrder;

/// Columns returned for each review on the product detail view.
const RATING_SELECT: &str = "id,rating,review,user_id,created_at";

/// Query string accepted by the products list endpoint.
///
/// Everything arrives as raw strings so that pagination values can
/// clamp instead of failing deserialisation.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    /// One-based page number.
    pub page: Option<String>,
    /// Page size, capped at 100.
    pub limit: Option<String>,
    /// Exact category filter.
    pub category: Option<String>,
    /// Case-insensitive substring match on name or description.
    pub search: Option<String>,
    /// Sort column; defaults to `created_at`.
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// Sort direction; defaults to `desc`.
    pub order: Option<String>,
}

/// List products with optional filtering, sorting, and pagination.
#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<String>, Query, description = "One-based page number"),
        ("limit" = Option<String>, Query, description = "Page size, capped at 100"),
        ("category" = Option<String>, Query, description = "Exact category filter"),
        ("search" = Option<String>, Query, description = "Substring match on name or description"),
        ("sortBy" = Option<String>, Query, description = "One of price, name, created_at, stock"),
        ("order" = Option<String>, Query, description = "asc or desc")
    ),
    responses(
        (status = 200, description = "One page of products", body = [Product]),
        (status = 400, description = "Invalid sort field or order"),
        (status = 500, description = "Store failure")
    ),
    tags = ["products"],
    operation_id = "listProducts"
)]
#[get("/api/products")]
pub async fn list_products(
    store: web::Data<StoreClient>,
    query: web::Query<ProductListQuery>,
) -> ApiResult<HttpResponse> {
    let order: SortOrder = query
        .order
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(|e: pagination::SortOrderParseError| DomainError::validation(e.to_string()))?
        .unwrap_or_default();
    let sort_by: ProductSortField = query
        .sort_by
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(|e: crate::models::ProductSortFieldParseError| {
            DomainError::validation(e.to_string())
        })?
        .unwrap_or_default();
    let params = page_params(query.page.as_deref(), query.limit.as_deref());

    let mut filters = Vec::new();
    if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
        filters.push(("category".to_owned(), format!("eq.{category}")));
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        filters.push((
            "or".to_owned(),
            format!("(name.ilike.%{search}%,description.ilike.%{search}%)"),
        ));
    }

    let list = ListQuery {
        filters,
        order: Some(format!("{}.{}", sort_by.column(), order.as_str())),
        range: Some((params.offset(), params.range_end())),
        count: true,
        ..ListQuery::default()
    };
    let (products, total) = store
        .select_list::<Product>("products", &list)
        .await
        .map_err(StoreError::into_domain)?;

    Ok(envelope::paginated(
        products,
        params.meta(total.unwrap_or(0)),
    ))
}

/// Create a product.
#[utoipa::path(
    post,
    path = "/api/products",
    responses(
        (status = 201, description = "Created product", body = Product),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Duplicate product"),
        (status = 500, description = "Store failure")
    ),
    tags = ["products"],
    operation_id = "createProduct"
)]
#[post("/api/products")]
pub async fn create_product(
    store: web::Data<StoreClient>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let name = body
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty());
    // Presence and numeric validity are separate failures: an absent
    // price is a missing field, a null or negative one is invalid.
    let (Some(name), Some(price_value)) = (name, body.get("price")) else {
        return Err(DomainError::validation("Missing required fields: name and price").into());
    };
    let Some(price) = price_value.as_f64().filter(|p| *p >= 0.0) else {
        return Err(DomainError::validation("Price must be a positive number").into());
    };

    let optional = |key: &str| body.get(key).filter(|v| !v.is_null()).cloned();
    let row = json!({
        "name": name,
        "description": optional("description"),
        "price": price,
        "category": optional("category"),
        "stock": body.get("stock").and_then(Value::as_i64).unwrap_or(0),
        "calories": body.get("calories").and_then(Value::as_i64),
        "spicy_level": optional("spicy_level"),
        "image_url": optional("image_url"),
    });
    let product: Product = store
        .insert("products", &row)
        .await
        .map_err(StoreError::into_domain)?;
    Ok(envelope::created(product))
}

/// Fetch one product together with its ratings summary.
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Product with ratings", body = Product),
        (status = 400, description = "Malformed identifier"),
        (status = 404, description = "Unknown product"),
        (status = 500, description = "Store failure")
    ),
    tags = ["products"],
    operation_id = "getProduct"
)]
#[get("/api/products/{id}")]
pub async fn get_product(
    store: web::Data<StoreClient>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !is_valid_uuid(&id) {
        return Err(DomainError::validation("Invalid product ID format").into());
    }

    let mut product: Value = store
        .select_single("products", "*", &id_filter(&id))
        .await
        .map_err(|e| e.into_domain().for_resource("Product"))?;

    // Ratings are decoration: a failed fetch degrades to an empty
    // block rather than failing the product view.
    let ratings_query = ListQuery {
        select: RATING_SELECT.to_owned(),
        filters: vec![("product_id".to_owned(), format!("eq.{id}"))],
        order: Some("created_at.desc".to_owned()),
        ..ListQuery::default()
    };
    let reviews = match store.select_list::<Rating>("product_ratings", &ratings_query).await {
        Ok((reviews, _)) => reviews,
        Err(error) => {
            warn!(product_id = %id, %error, "failed to fetch product ratings");
            Vec::new()
        }
    };
    let summary = serde_json::to_value(RatingsSummary::from_ratings(reviews))
        .map_err(|e| DomainError::internal(e.to_string()))?;
    if let Some(fields) = product.as_object_mut() {
        fields.insert("ratings".to_owned(), summary);
    }

    Ok(envelope::success(product))
}

/// Apply a partial update to a product.
#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 400, description = "Malformed identifier or invalid price"),
        (status = 404, description = "Unknown product"),
        (status = 500, description = "Store failure")
    ),
    tags = ["products"],
    operation_id = "updateProduct"
)]
#[patch("/api/products/{id}")]
pub async fn update_product(
    store: web::Data<StoreClient>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !is_valid_uuid(&id) {
        return Err(DomainError::validation("Invalid product ID format").into());
    }
    if let Some(price) = body.get("price") {
        if price.as_f64().filter(|p| *p >= 0.0).is_none() {
            return Err(DomainError::validation("Price must be a positive number").into());
        }
    }

    let updated: Value = store
        .update_single("products", "*", &id_filter(&id), &body)
        .await
        .map_err(|e| e.into_domain().for_resource("Product"))?;
    Ok(envelope::success(updated))
}

/// Delete a product.
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product identifier")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 400, description = "Malformed identifier"),
        (status = 500, description = "Store failure")
    ),
    tags = ["products"],
    operation_id = "deleteProduct"
)]
#[delete("/api/products/{id}")]
pub async fn delete_product(
    store: web::Data<StoreClient>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !is_valid_uuid(&id) {
        return Err(DomainError::validation("Invalid product ID format").into());
    }
    store
        .delete("products", &id_filter(&id))
        .await
        .map_err(|e| e.into_domain().for_resource("Product"))?;
    Ok(envelope::success(json!({
        "message": "Product deleted successfully"
    })))
}
