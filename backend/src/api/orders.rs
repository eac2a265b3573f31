//! Order endpoints: list, checkout, fetch, status update, delete.

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{envelope, page_params, ApiResult};
use crate::domain::validation::{is_valid_uuid, missing_fields};
use crate::domain::{orders, DomainError};
use crate::models::{
    NewOrderItemRecord, NewOrderRecord, Order, OrderSortField, OrderStatus, OrderWithItems,
};
use crate::outbound::store::{id_filter, ListQuery, StoreClient, StoreError};
use pagination::SortOrder;

/// Projection for the order detail view: header plus embedded items
/// and their product columns.
const ORDER_DETAIL_SELECT: &str = "id,user_id,total_price,status,created_at,updated_at,\
    order_items(id,product_id,quantity,price,\
    products(id,name,description,image_url,category,price))";

/// Projection returned after a status update; a slimmer product embed
/// than the detail view.
const ORDER_UPDATE_SELECT: &str = "id,user_id,total_price,status,created_at,updated_at,\
    order_items(id,product_id,quantity,price,products(id,name,image_url))";

/// Query string accepted by the orders list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    /// One-based page number.
    pub page: Option<String>,
    /// Page size, capped at 100.
    pub limit: Option<String>,
    /// Lifecycle state filter.
    pub status: Option<String>,
    /// Owning customer filter.
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    /// Sort column; defaults to `created_at`.
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// Sort direction; defaults to `desc`.
    pub order: Option<String>,
}

/// List orders with optional status and customer filters.
#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("page" = Option<String>, Query, description = "One-based page number"),
        ("limit" = Option<String>, Query, description = "Page size, capped at 100"),
        ("status" = Option<String>, Query, description = "Lifecycle state filter"),
        ("userId" = Option<String>, Query, description = "Owning customer filter"),
        ("sortBy" = Option<String>, Query, description = "One of created_at, total_price, status"),
        ("order" = Option<String>, Query, description = "asc or desc")
    ),
    responses(
        (status = 200, description = "One page of orders", body = [Order]),
        (status = 400, description = "Invalid filter, sort field, or order"),
        (status = 500, description = "Store failure")
    ),
    tags = ["orders"],
    operation_id = "listOrders"
)]
#[get("/api/orders")]
pub async fn list_orders(
    store: web::Data<StoreClient>,
    query: web::Query<OrderListQuery>,
) -> ApiResult<HttpResponse> {
    let order: SortOrder = query
        .order
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(|e: pagination::SortOrderParseError| DomainError::validation(e.to_string()))?
        .unwrap_or_default();
    let sort_by: OrderSortField = query
        .sort_by
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(|e: crate::models::OrderSortFieldParseError| {
            DomainError::validation(e.to_string())
        })?
        .unwrap_or_default();
    let params = page_params(query.page.as_deref(), query.limit.as_deref());

    let mut filters = Vec::new();
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        let status: OrderStatus = status
            .parse()
            .map_err(|e: crate::models::OrderStatusParseError| {
                DomainError::validation(e.to_string())
            })?;
        filters.push(("status".to_owned(), format!("eq.{}", status.as_str())));
    }
    if let Some(user_id) = query.user_id.as_deref().filter(|u| !u.is_empty()) {
        if !is_valid_uuid(user_id) {
            return Err(DomainError::validation("Invalid userId format").into());
        }
        filters.push(("user_id".to_owned(), format!("eq.{user_id}")));
    }

    let list = ListQuery {
        filters,
        order: Some(format!("{}.{}", sort_by.column(), order.as_str())),
        range: Some((params.offset(), params.range_end())),
        count: true,
        ..ListQuery::default()
    };
    let (rows, total) = store
        .select_list::<Order>("orders", &list)
        .await
        .map_err(StoreError::into_domain)?;

    Ok(envelope::paginated(rows, params.meta(total.unwrap_or(0))))
}

/// Create an order header and its line items.
#[utoipa::path(
    post,
    path = "/api/orders",
    responses(
        (status = 201, description = "Placed order with items", body = OrderWithItems),
        (status = 400, description = "Missing or invalid fields"),
        (status = 500, description = "Store failure")
    ),
    tags = ["orders"],
    operation_id = "createOrder"
)]
#[post("/api/orders")]
pub async fn create_order(
    store: web::Data<StoreClient>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let mut missing = missing_fields(&body, &["user_id"]);
    // items and total_price carry falsy-but-valid values (an empty
    // array, a zero total), so for them only absence counts as missing.
    for field in ["items", "total_price"] {
        if body.get(field).is_none() {
            missing.push(field.to_owned());
        }
    }
    if !missing.is_empty() {
        return Err(
            DomainError::validation(format!("Missing required fields: {}", missing.join(", ")))
                .into(),
        );
    }

    let user_id = body
        .get("user_id")
        .and_then(Value::as_str)
        .filter(|raw| is_valid_uuid(raw))
        .and_then(|raw| raw.parse::<Uuid>().ok())
        .ok_or_else(|| DomainError::validation("Invalid user_id format"))?;

    let items = body
        .get("items")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| DomainError::validation("Order must contain at least one item"))?;
    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let (Some(product_id), Some(quantity), Some(price)) = (
            item.get("product_id").and_then(Value::as_str),
            item.get("quantity").and_then(Value::as_i64),
            item.get("price").and_then(Value::as_f64),
        ) else {
            return Err(DomainError::validation(
                "Each item requires product_id, quantity and price",
            )
            .into());
        };
        if !is_valid_uuid(product_id) {
            return Err(DomainError::validation("Invalid product_id format in items").into());
        }
        if quantity < 1 {
            return Err(DomainError::validation("Item quantity must be at least 1").into());
        }
        if price < 0.0 {
            return Err(DomainError::validation("Item price must be a positive number").into());
        }
        let product_id = product_id
            .parse()
            .map_err(|_| DomainError::validation("Invalid product_id format in items"))?;
        records.push(NewOrderItemRecord {
            product_id,
            quantity,
            price,
        });
    }

    let total_price = body
        .get("total_price")
        .and_then(Value::as_f64)
        .filter(|t| *t >= 0.0)
        .ok_or_else(|| DomainError::validation("Total price must be a positive number"))?;

    let status = match body.get("status").and_then(Value::as_str) {
        Some(raw) => raw
            .parse()
            .map_err(|e: crate::models::OrderStatusParseError| {
                DomainError::validation(e.to_string())
            })?,
        None => OrderStatus::Pending,
    };

    let placed = orders::place_order(
        store.get_ref(),
        NewOrderRecord {
            user_id,
            total_price,
            status,
        },
        records,
    )
    .await?;

    Ok(envelope::created(placed))
}

/// Fetch one order with its items and product details.
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order with items", body = OrderWithItems),
        (status = 400, description = "Malformed identifier"),
        (status = 404, description = "Unknown order"),
        (status = 500, description = "Store failure")
    ),
    tags = ["orders"],
    operation_id = "getOrder"
)]
#[get("/api/orders/{id}")]
pub async fn get_order(
    store: web::Data<StoreClient>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !is_valid_uuid(&id) {
        return Err(DomainError::validation("Invalid order ID format").into());
    }

    let row: OrderWithItems = store
        .select_single("orders", ORDER_DETAIL_SELECT, &id_filter(&id))
        .await
        .map_err(|e| e.into_domain().for_resource("Order"))?;
    Ok(envelope::success(row))
}

/// Update an order's lifecycle status.
#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    params(("id" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Updated order", body = OrderWithItems),
        (status = 400, description = "Malformed identifier or invalid status"),
        (status = 404, description = "Unknown order"),
        (status = 500, description = "Store failure")
    ),
    tags = ["orders"],
    operation_id = "updateOrder"
)]
#[patch("/api/orders/{id}")]
pub async fn update_order(
    store: web::Data<StoreClient>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !is_valid_uuid(&id) {
        return Err(DomainError::validation("Invalid order ID format").into());
    }

    let Some(raw_status) = body.get("status") else {
        return Err(DomainError::validation(
            "No updateable fields provided. Currently only \"status\" can be updated",
        )
        .into());
    };
    let status: OrderStatus = raw_status
        .as_str()
        .unwrap_or_default()
        .parse()
        .map_err(|e: crate::models::OrderStatusParseError| DomainError::validation(e.to_string()))?;

    // Existence check first so a missing order is a 404 rather than an
    // empty update.
    store
        .select_single::<Value>("orders", "id", &id_filter(&id))
        .await
        .map_err(|e| e.into_domain().for_resource("Order"))?;

    let updated: OrderWithItems = store
        .update_single(
            "orders",
            ORDER_UPDATE_SELECT,
            &id_filter(&id),
            &json!({ "status": status.as_str() }),
        )
        .await
        .map_err(|e| e.into_domain().for_resource("Order"))?;
    Ok(envelope::success(updated))
}

/// Delete an order and its line items.
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(("id" = String, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order deleted"),
        (status = 400, description = "Malformed identifier"),
        (status = 404, description = "Unknown order"),
        (status = 500, description = "Store failure")
    ),
    tags = ["orders"],
    operation_id = "deleteOrder"
)]
#[delete("/api/orders/{id}")]
pub async fn delete_order(
    store: web::Data<StoreClient>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !is_valid_uuid(&id) {
        return Err(DomainError::validation("Invalid order ID format").into());
    }

    store
        .select_single::<Value>("orders", "id", &id_filter(&id))
        .await
        .map_err(|e| e.into_domain().for_resource("Order"))?;

    // Items first; the store enforces the foreign key.
    store
        .delete("order_items", &[("order_id".to_owned(), format!("eq.{id}"))])
        .await
        .map_err(StoreError::into_domain)?;
    store
        .delete("orders", &id_filter(&id))
        .await
        .map_err(StoreError::into_domain)?;

    Ok(envelope::success(json!({
        "message": "Order deleted successfully"
    })))
}
