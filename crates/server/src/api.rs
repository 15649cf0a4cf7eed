//! Gold-layer REST routes.
//!
//! - `GET    /` welcome text
//! - `GET    /api/products` all products, ordered by key
//! - `POST   /api/products` create a product
//! - `GET    /api/products/{product_key}` one product
//! - `PUT    /api/products/{product_key}` replace name and category
//! - `DELETE /api/products/{product_key}` remove a product
//! - `GET    /api/customers/{segment}` customers in a segment (exact match)

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request, State},
    http::{request::Parts, StatusCode},
    routing::get,
    Json, Router,
};
use goldapi_core::domain::customer::Customer;
use goldapi_core::domain::product::{Product, ProductKey, ProductPayload};
use goldapi_db::{
    CustomerRepository, DbPool, ProductRepository, SqlCustomerRepository, SqlProductRepository,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ApiError, MessageBody};

pub const WELCOME_MESSAGE: &str = "Welcome to your SQL Data API!";

#[derive(Clone)]
pub struct AppState {
    products: Arc<dyn ProductRepository>,
    customers: Arc<dyn CustomerRepository>,
}

impl AppState {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        customers: Arc<dyn CustomerRepository>,
    ) -> Self {
        Self { products, customers }
    }

    pub fn from_pool(pool: DbPool) -> Self {
        Self::new(
            Arc::new(SqlProductRepository::new(pool.clone())),
            Arc::new(SqlCustomerRepository::new(pool)),
        )
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{product_key}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/customers/{segment}", get(customers_by_segment))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
}

/// Integer product key taken from the path. Anything else is treated as an
/// unmatched route, so no handler runs.
pub struct ProductKeyPath(pub ProductKey);

impl<S> FromRequestParts<S> for ProductKeyPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::RouteNotFound)?;

        // Digits only: `+1`, `-1` and `1.0` never reach a handler.
        let key = if !raw.is_empty() && raw.bytes().all(|byte| byte.is_ascii_digit()) {
            raw.parse::<i64>().ok()
        } else {
            None
        };

        key.map(|key| Self(ProductKey(key))).ok_or_else(|| {
            debug!(
                event_name = "api.route.non_integer_key",
                raw_key = %raw,
                "rejected product key"
            );
            ApiError::RouteNotFound
        })
    }
}

/// Customer segment taken from the path, percent-decoded. A segment that does
/// not decode to UTF-8 is a bad request with the usual JSON envelope.
pub struct SegmentPath(pub String);

impl<S> FromRequestParts<S> for SegmentPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(segment) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        Ok(Self(segment))
    }
}

/// Product write body, parsed from raw bytes and checked field by field.
pub struct ProductBody(pub ProductPayload);

impl<S> FromRequest<S> for ProductBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::PayloadTooLarge(rejection.body_text())
            } else {
                ApiError::BadRequest(rejection.body_text())
            }
        })?;

        let value: Value = serde_json::from_slice(&bytes).map_err(|error| {
            ApiError::BadRequest(format!("request body is not valid JSON: {error}"))
        })?;

        Ok(Self(ProductPayload::from_json(&value)?))
    }
}

async fn index() -> &'static str {
    WELCOME_MESSAGE
}

async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.products.list().await?))
}

async fn get_product(
    ProductKeyPath(key): ProductKeyPath,
    State(state): State<AppState>,
) -> Result<Json<Product>, ApiError> {
    let product = state.products.find_by_key(key).await?.ok_or(ApiError::ProductNotFound(key))?;
    Ok(Json(product))
}

async fn create_product(
    State(state): State<AppState>,
    ProductBody(payload): ProductBody,
) -> Result<(StatusCode, Json<MessageBody>), ApiError> {
    let key = state.products.create(payload).await?;
    info!(event_name = "api.product.created", product_key = %key, "product created");

    Ok((StatusCode::CREATED, Json(MessageBody::new("Product created successfully"))))
}

async fn update_product(
    ProductKeyPath(key): ProductKeyPath,
    State(state): State<AppState>,
    ProductBody(payload): ProductBody,
) -> Result<Json<MessageBody>, ApiError> {
    if !state.products.update(key, payload).await? {
        return Err(ApiError::ProductNotFound(key));
    }
    info!(event_name = "api.product.updated", product_key = %key, "product updated");

    Ok(Json(MessageBody::new("Product updated successfully")))
}

async fn delete_product(
    ProductKeyPath(key): ProductKeyPath,
    State(state): State<AppState>,
) -> Result<Json<MessageBody>, ApiError> {
    if !state.products.delete(key).await? {
        return Err(ApiError::ProductNotFound(key));
    }
    info!(event_name = "api.product.deleted", product_key = %key, "product deleted");

    Ok(Json(MessageBody::new("Product deleted successfully")))
}

async fn customers_by_segment(
    SegmentPath(segment): SegmentPath,
    State(state): State<AppState>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let customers = state.customers.list_by_segment(&segment).await?;
    if customers.is_empty() {
        return Err(ApiError::NoCustomersInSegment(segment));
    }

    Ok(Json(customers))
}

async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
