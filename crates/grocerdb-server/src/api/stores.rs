use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use grocerdb_kassal::{PhysicalStore, PhysicalStoresResponse, StoreQuery};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_kassal_error, map_query_rejection, require_at_least, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct StoreSearchParams {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub km: Option<f64>,
    pub group: Option<String>,
}

impl StoreSearchParams {
    fn into_query(self, request_id: &str) -> Result<StoreQuery, ApiError> {
        let defaults = StoreQuery::default();
        let query = StoreQuery {
            search: self.search,
            page: self.page.unwrap_or(defaults.page),
            size: self.size.unwrap_or(defaults.size),
            lat: self.lat,
            lng: self.lng,
            km: self.km.unwrap_or(defaults.km),
            group: self.group,
        };
        require_at_least(request_id, "page", query.page, 1)?;
        require_at_least(request_id, "size", query.size, 1)?;
        require_at_least(request_id, "km", query.km, 0.0)?;
        Ok(query)
    }
}

pub(super) async fn list_physical_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<StoreSearchParams>, QueryRejection>,
) -> Result<Json<PhysicalStoresResponse>, ApiError> {
    let Query(params) = params.map_err(|e| map_query_rejection(req_id.0.clone(), &e))?;
    let query = params.into_query(&req_id.0)?;

    let stores = state
        .kassal
        .physical_stores(&query)
        .await
        .map_err(|e| map_kassal_error(req_id.0.clone(), &e))?;
    Ok(Json(stores))
}

pub(super) async fn get_physical_store(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(store_id): Path<String>,
) -> Result<Json<PhysicalStore>, ApiError> {
    let store = state
        .kassal
        .physical_store(&store_id)
        .await
        .map_err(|e| map_kassal_error(req_id.0.clone(), &e))?;
    Ok(Json(store))
}
