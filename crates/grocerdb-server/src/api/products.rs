use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use grocerdb_core::{enrich_products, Product};
use grocerdb_kassal::{EanProductSet, ProductQuery, ProductsResponse};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_kassal_error, map_query_rejection, require_at_least, ApiError, AppState};

fn default_page() -> u32 {
    1
}

fn default_size() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductSearchParams {
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
    pub vendor: Option<String>,
    pub brand: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub unique: Option<bool>,
    pub exclude_without_ean: Option<bool>,
    pub sort: Option<String>,
}

impl ProductSearchParams {
    fn validate(&self, request_id: &str) -> Result<(), ApiError> {
        require_at_least(request_id, "page", self.page, 1)?;
        require_at_least(request_id, "size", self.size, 1)?;
        if let Some(min) = self.price_min {
            require_at_least(request_id, "price_min", min, 0.0)?;
        }
        if let Some(max) = self.price_max {
            require_at_least(request_id, "price_max", max, 0.0)?;
        }
        Ok(())
    }

    fn into_query(self) -> ProductQuery {
        ProductQuery {
            search: self.search,
            page: self.page,
            size: self.size,
            vendor: self.vendor,
            brand: self.brand,
            price_min: self.price_min,
            price_max: self.price_max,
            unique: self.unique,
            exclude_without_ean: self.exclude_without_ean,
            sort: self.sort,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UrlParams {
    pub url: String,
}

/// Upstream product search with matching sales attached.
pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<ProductSearchParams>, QueryRejection>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let Query(params) = params.map_err(|e| map_query_rejection(req_id.0.clone(), &e))?;
    params.validate(&req_id.0)?;

    let mut page = state
        .kassal
        .products(&params.into_query())
        .await
        .map_err(|e| map_kassal_error(req_id.0.clone(), &e))?;

    let enriched = enrich_products(&mut page.data, &state.index);
    tracing::debug!(
        products = page.data.len(),
        enriched,
        "product search enriched"
    );
    Ok(Json(page))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .kassal
        .product_by_id(product_id)
        .await
        .map_err(|e| map_kassal_error(req_id.0.clone(), &e))?;
    Ok(Json(enrich_one(product, &state)))
}

pub(super) async fn get_products_by_ean(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(ean): Path<String>,
) -> Result<Json<EanProductSet>, ApiError> {
    let set = state
        .kassal
        .products_by_ean(&ean)
        .await
        .map_err(|e| map_kassal_error(req_id.0.clone(), &e))?;
    Ok(Json(set))
}

pub(super) async fn find_by_url_single(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<UrlParams>, QueryRejection>,
) -> Result<Json<Product>, ApiError> {
    let Query(params) = params.map_err(|e| map_query_rejection(req_id.0.clone(), &e))?;
    let product = state
        .kassal
        .find_by_url_single(&params.url)
        .await
        .map_err(|e| map_kassal_error(req_id.0.clone(), &e))?;
    Ok(Json(enrich_one(product, &state)))
}

pub(super) async fn find_by_url_compare(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<UrlParams>, QueryRejection>,
) -> Result<Json<EanProductSet>, ApiError> {
    let Query(params) = params.map_err(|e| map_query_rejection(req_id.0.clone(), &e))?;
    let set = state
        .kassal
        .find_by_url_compare(&params.url)
        .await
        .map_err(|e| map_kassal_error(req_id.0.clone(), &e))?;
    Ok(Json(set))
}

fn enrich_one(product: Product, state: &AppState) -> Product {
    let mut products = [product];
    enrich_products(&mut products, &state.index);
    let [product] = products;
    product
}
