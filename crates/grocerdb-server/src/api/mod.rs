mod on_sale;
mod products;
mod stores;

use std::cmp::Ordering;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use grocerdb_core::SaleIndex;
use grocerdb_kassal::{KassalClient, KassalError};
use grocerdb_sales::SalesState;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub kassal: Arc<KassalClient>,
    pub sales: SalesState,
    pub index: Arc<SaleIndex>,
    pub on_sale_max_concurrency: usize,
}

impl AppState {
    /// Builds the sale index once from whatever sales were loaded.
    #[must_use]
    pub fn new(kassal: KassalClient, sales: SalesState, on_sale_max_concurrency: usize) -> Self {
        let index = Arc::new(sales.build_index());
        Self {
            kassal: Arc::new(kassal),
            sales,
            index,
            on_sale_max_concurrency,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    sales: &'static str,
    sale_items: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" | "upstream_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Maps a Kassal failure onto the API error envelope. Upstream failures are
/// reported as client errors.
pub(super) fn map_kassal_error(request_id: String, error: &KassalError) -> ApiError {
    match error {
        KassalError::NotFound { .. } => {
            ApiError::new(request_id, "not_found", "resource not found")
        }
        KassalError::RateLimited { .. } => {
            tracing::warn!(error = %error, "kassal rate limit hit");
            ApiError::new(request_id, "rate_limited", error.to_string())
        }
        KassalError::InvalidRequest(message) => {
            ApiError::new(request_id, "validation_error", message.clone())
        }
        _ => {
            tracing::warn!(error = %error, "kassal request failed");
            ApiError::new(request_id, "upstream_error", error.to_string())
        }
    }
}

pub(super) fn map_query_rejection(request_id: String, rejection: &QueryRejection) -> ApiError {
    ApiError::new(request_id, "validation_error", rejection.body_text())
}

/// Rejects `value` below `min`, or not comparable to it (`NaN`), with a
/// `validation_error`.
pub(super) fn require_at_least<T: PartialOrd + std::fmt::Display>(
    request_id: &str,
    field: &str,
    value: T,
    min: T,
) -> Result<(), ApiError> {
    if !matches!(
        value.partial_cmp(&min),
        Some(Ordering::Greater | Ordering::Equal)
    ) {
        return Err(ApiError::new(
            request_id,
            "validation_error",
            format!("{field} must be greater than or equal to {min}"),
        ));
    }
    Ok(())
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter(|origin| {
            let wildcard = origin.as_str() == "*";
            if wildcard {
                tracing::warn!(
                    "ignoring wildcard CORS origin; credentialed CORS needs explicit origins"
                );
            }
            !wildcard
        })
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/physical-stores", get(stores::list_physical_stores))
        .route(
            "/physical-stores/{store_id}",
            get(stores::get_physical_store),
        )
        .route("/products", get(products::list_products))
        .route("/products/on-sale", get(on_sale::list_on_sale))
        .route("/products/id/{product_id}", get(products::get_product))
        .route("/products/ean/{ean}", get(products::get_products_by_ean))
        .route(
            "/products/find-by-url/single",
            get(products::find_by_url_single),
        )
        .route(
            "/products/find-by-url/compare",
            get(products::find_by_url_compare),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors(cors_origins))
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let (sales, sale_items) = if state.sales.is_loaded() {
        ("loaded", state.index.len())
    } else {
        ("not_loaded", 0)
    };

    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            sales,
            sale_items,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
