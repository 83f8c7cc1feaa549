//! Paginated listing of catalog products that are currently on sale.
//!
//! Each scraped item name is resolved to its best Kassal product, the hits
//! are deduplicated by product id and enriched with their sale, and the
//! result is cut into a page with Laravel-style links and metadata.

use std::collections::HashMap;

use futures::stream::{self, StreamExt};
use grocerdb_core::{enrich_products, Product, SaleIndex};
use grocerdb_kassal::{PageLinks, ProductSearch, ProductsMeta, ProductsResponse};

/// Page coordinates for an on-sale listing.
#[derive(Debug, Clone)]
pub struct OnSalePage<'a> {
    /// 1-based page number.
    pub page: u32,
    /// Items per page, at least 1.
    pub size: u32,
    /// Request path the navigation links are built from.
    pub path: &'a str,
}

/// Resolves every name in `names` with one search each and returns the
/// requested page of enriched, deduplicated products.
///
/// Up to `concurrency` searches run at once, but results are consumed in
/// `names` order. A search that fails or finds nothing is logged and
/// skipped; the listing itself never fails.
pub async fn aggregate_on_sale<S: ProductSearch>(
    search: &S,
    names: &[String],
    index: &SaleIndex,
    page: &OnSalePage<'_>,
    concurrency: usize,
) -> ProductsResponse {
    let lookups: Vec<_> = names
        .iter()
        .map(|name| async move {
            let result = search.best_match(name).await;
            (name, result)
        })
        .collect();

    let hits = stream::iter(lookups)
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    let mut products = Vec::new();
    let mut positions: HashMap<i64, usize> = HashMap::new();
    let mut skipped = 0usize;
    for (name, result) in hits {
        match result {
            Ok(Some(product)) => {
                if let Some(&pos) = positions.get(&product.id) {
                    products[pos] = product;
                } else {
                    positions.insert(product.id, products.len());
                    products.push(product);
                }
            }
            Ok(None) => {
                skipped += 1;
                tracing::warn!(name = %name, "no product found for sale item");
            }
            Err(e) => {
                skipped += 1;
                tracing::warn!(name = %name, error = %e, "product search failed for sale item");
            }
        }
    }

    let enriched = enrich_products(&mut products, index);
    tracing::debug!(
        names = names.len(),
        products = products.len(),
        enriched,
        skipped,
        "on-sale products resolved"
    );

    paginate(products, page)
}

/// Cuts `products` into the requested page and builds links and metadata.
#[must_use]
pub fn paginate(products: Vec<Product>, page: &OnSalePage<'_>) -> ProductsResponse {
    let size = page.size.max(1);
    let current = page.page.max(1);
    let total = products.len();
    let size_usize = size as usize;

    let last_page = u32::try_from(total.div_ceil(size_usize).max(1)).unwrap_or(u32::MAX);
    let start = (current as usize - 1).saturating_mul(size_usize).min(total);
    let end = start.saturating_add(size_usize).min(total);

    let data: Vec<Product> = products.into_iter().skip(start).take(end - start).collect();
    let (from, to) = if data.is_empty() {
        (None, None)
    } else {
        (Some(start as u64 + 1), Some(end as u64))
    };

    let link = |n: u32| format!("{}?page={n}&size={size}", page.path);
    let links = PageLinks {
        first: Some(link(1)),
        last: (total > 0).then(|| link(last_page)),
        prev: (current > 1).then(|| link(current - 1)),
        next: (current < last_page).then(|| link(current + 1)),
    };

    ProductsResponse {
        data,
        links,
        meta: ProductsMeta {
            current_page: current,
            from,
            to,
            per_page: size,
            path: page.path.to_owned(),
            last_page: Some(last_page),
            total: Some(total as u64),
        },
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
