//! Reqwest-backed PostgREST row access.
//!
//! This adapter owns transport details only: request construction,
//! header conventions (`Range` rows, `Prefer` counts and returning
//! representations, the single-object `Accept`), and decoding into
//! model types. Classification of failures lives in
//! [`StoreError`](super::StoreError).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use super::StoreError;
use crate::domain::ports::OrderPersistence;
use crate::domain::DomainResult;
use crate::models::{NewOrderItemRecord, NewOrderRecord, Order, OrderItem};

/// Media type asking PostgREST for exactly one row.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Failures constructing a [`StoreClient`].
#[derive(Debug, Error)]
pub enum StoreInitError {
    /// The configured base URL cannot carry path segments.
    #[error("store base URL must be an absolute http(s) URL")]
    InvalidBaseUrl,
    /// The underlying HTTP client could not be built.
    #[error("failed to build store HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Process-wide, immutable handle to the hosted store.
///
/// Built once at startup and shared read-only across request handlers;
/// connection pooling and backpressure are the HTTP client's concern.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: Client,
    base: Url,
    anon_key: String,
}

/// Parameters for a list read: projection, filters, ordering, row
/// range, and whether to ask for an exact total.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// PostgREST `select` projection; empty means `*`.
    pub select: String,
    /// Query-string filter pairs, e.g. `("category", "eq.ramen")` or
    /// `("or", "(name.ilike.%soup%,description.ilike.%soup%)")`.
    pub filters: Vec<(String, String)>,
    /// `order` parameter, e.g. `price.asc`.
    pub order: Option<String>,
    /// Inclusive zero-based row range for this page.
    pub range: Option<(u64, u64)>,
    /// Ask the store for an exact total row count.
    pub count: bool,
}

impl StoreClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Fails when `base` cannot carry path segments or the HTTP client
    /// cannot be constructed.
    pub fn new(
        base: Url,
        anon_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoreInitError> {
        if base.cannot_be_a_base() {
            return Err(StoreInitError::InvalidBaseUrl);
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base,
            anon_key: anon_key.into(),
        })
    }

    /// Resolve an endpoint under the configured base URL.
    pub(super) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments.iter().copied());
        }
        url
    }

    /// The public key sent as `apikey` on every request.
    pub(super) fn anon_key(&self) -> &str {
        &self.anon_key
    }

    pub(super) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
    }

    fn rest(&self, method: Method, table: &str) -> RequestBuilder {
        self.request(method, self.endpoint(&["rest", "v1", table]))
            .bearer_auth(&self.anon_key)
    }

    /// Read a page of rows, optionally with the exact total count.
    ///
    /// # Errors
    ///
    /// Transport failures and non-success store responses surface as
    /// [`StoreError`].
    pub async fn select_list<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &ListQuery,
    ) -> Result<(Vec<T>, Option<u64>), StoreError> {
        let select = if query.select.is_empty() {
            "*"
        } else {
            query.select.as_str()
        };
        let mut request = self.rest(Method::GET, table).query(&[("select", select)]);
        for (name, filter) in &query.filters {
            request = request.query(&[(name.as_str(), filter.as_str())]);
        }
        if let Some(order) = &query.order {
            request = request.query(&[("order", order.as_str())]);
        }
        if let Some((start, end)) = query.range {
            request = request
                .header("Range-Unit", "items")
                .header(header::RANGE, format!("{start}-{end}"));
        }
        if query.count {
            request = request.header("Prefer", "count=exact");
        }

        let response = request.send().await.map_err(|e| StoreError::transport(&e))?;
        let total = response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total);
        let rows = read_json(response).await?;
        Ok((rows, total))
    }

    /// Fetch exactly one row; zero rows surfaces the store's
    /// no-rows code and becomes a 404 downstream.
    ///
    /// # Errors
    ///
    /// Transport failures and non-success store responses surface as
    /// [`StoreError`].
    pub async fn select_single<T: DeserializeOwned>(
        &self,
        table: &str,
        select: &str,
        filters: &[(String, String)],
    ) -> Result<T, StoreError> {
        let mut request = self
            .rest(Method::GET, table)
            .header(header::ACCEPT, HeaderValue::from_static(SINGLE_OBJECT))
            .query(&[("select", select)]);
        for (name, filter) in filters {
            request = request.query(&[(name.as_str(), filter.as_str())]);
        }
        let response = request.send().await.map_err(|e| StoreError::transport(&e))?;
        read_json(response).await
    }

    /// Insert one row and return its stored representation.
    ///
    /// # Errors
    ///
    /// Transport failures and non-success store responses surface as
    /// [`StoreError`].
    pub async fn insert<T: DeserializeOwned>(
        &self,
        table: &str,
        row: &Value,
    ) -> Result<T, StoreError> {
        let mut rows = self.insert_many(table, std::slice::from_ref(row)).await?;
        rows.pop().ok_or_else(|| StoreError {
            code: None,
            message: format!("insert into {table} returned no rows"),
        })
    }

    /// Insert several rows and return their stored representations.
    ///
    /// # Errors
    ///
    /// Transport failures and non-success store responses surface as
    /// [`StoreError`].
    pub async fn insert_many<T: DeserializeOwned>(
        &self,
        table: &str,
        rows: &[Value],
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .rest(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await
            .map_err(|e| StoreError::transport(&e))?;
        read_json(response).await
    }

    /// Apply a partial update to the rows matching `filters` and return
    /// the single updated row under the given projection.
    ///
    /// # Errors
    ///
    /// Transport failures and non-success store responses surface as
    /// [`StoreError`]; zero matching rows surfaces the no-rows code.
    pub async fn update_single<T: DeserializeOwned>(
        &self,
        table: &str,
        select: &str,
        filters: &[(String, String)],
        patch: &Value,
    ) -> Result<T, StoreError> {
        let mut request = self
            .rest(Method::PATCH, table)
            .header(header::ACCEPT, HeaderValue::from_static(SINGLE_OBJECT))
            .header("Prefer", "return=representation")
            .query(&[("select", select)]);
        for (name, filter) in filters {
            request = request.query(&[(name.as_str(), filter.as_str())]);
        }
        let response = request
            .json(patch)
            .send()
            .await
            .map_err(|e| StoreError::transport(&e))?;
        read_json(response).await
    }

    /// Delete the rows matching `filters`.
    ///
    /// # Errors
    ///
    /// Transport failures and non-success store responses surface as
    /// [`StoreError`].
    pub async fn delete(&self, table: &str, filters: &[(String, String)]) -> Result<(), StoreError> {
        let mut request = self.rest(Method::DELETE, table);
        for (name, filter) in filters {
            request = request.query(&[(name.as_str(), filter.as_str())]);
        }
        let response = request.send().await.map_err(|e| StoreError::transport(&e))?;
        check_status(response).await?;
        Ok(())
    }
}

/// Equality filter on a row id.
#[must_use]
pub(crate) fn id_filter(id: &str) -> Vec<(String, String)> {
    vec![("id".to_owned(), format!("eq.{id}"))]
}

async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .bytes()
        .await
        .map_err(|e| StoreError::transport(&e))?;
    Err(StoreError::from_body(status, &body))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    let response = check_status(response).await?;
    let body = response
        .bytes()
        .await
        .map_err(|e| StoreError::transport(&e))?;
    serde_json::from_slice(&body).map_err(|e| StoreError::decode(&e))
}

/// Pull the total row count out of a `Content-Range` value such as
/// `0-9/57` or `*/57`. An unknown total (`0-9/*`) yields `None`.
fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.parse().ok()
}

#[async_trait]
impl OrderPersistence for StoreClient {
    async fn insert_order(&self, order: &NewOrderRecord) -> DomainResult<Order> {
        let row = json!({
            "user_id": order.user_id,
            "total_price": order.total_price,
            "status": order.status.as_str(),
        });
        self.insert("orders", &row)
            .await
            .map_err(StoreError::into_domain)
    }

    async fn insert_order_items(
        &self,
        order_id: Uuid,
        items: &[NewOrderItemRecord],
    ) -> DomainResult<Vec<OrderItem>> {
        let rows: Vec<Value> = items
            .iter()
            .map(|item| {
                json!({
                    "order_id": order_id,
                    "product_id": item.product_id,
                    "quantity": item.quantity,
                    "price": item.price,
                })
            })
            .collect();
        self.insert_many("order_items", &rows)
            .await
            .map_err(StoreError::into_domain)
    }

    async fn delete_order(&self, order_id: Uuid) -> DomainResult<()> {
        self.delete("orders", &id_filter(&order_id.to_string()))
            .await
            .map_err(StoreError::into_domain)
    }
}
