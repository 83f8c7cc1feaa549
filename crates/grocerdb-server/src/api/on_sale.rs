use axum::{
    extract::{rejection::QueryRejection, OriginalUri, Query, State},
    Extension, Json,
};
use grocerdb_kassal::ProductsResponse;
use grocerdb_sales::{aggregate_on_sale, OnSalePage};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_query_rejection, require_at_least, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct OnSaleParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

/// Every scraped sale item resolved to a product, deduplicated, enriched
/// and paginated. Items whose lookup fails are left out.
pub(super) async fn list_on_sale(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    OriginalUri(uri): OriginalUri,
    params: Result<Query<OnSaleParams>, QueryRejection>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let Query(params) = params.map_err(|e| map_query_rejection(req_id.0.clone(), &e))?;
    let page = params.page.unwrap_or(1);
    let size = params.size.unwrap_or(10);
    require_at_least(&req_id.0, "page", page, 1)?;
    require_at_least(&req_id.0, "size", size, 1)?;

    let names = state.sales.item_names();
    let response = aggregate_on_sale(
        state.kassal.as_ref(),
        &names,
        &state.index,
        &OnSalePage {
            page,
            size,
            path: uri.path(),
        },
        state.on_sale_max_concurrency,
    )
    .await;

    tracing::info!(
        names = names.len(),
        total = response.meta.total.unwrap_or_default(),
        page,
        size,
        "on-sale listing served"
    );
    Ok(Json(response))
}
