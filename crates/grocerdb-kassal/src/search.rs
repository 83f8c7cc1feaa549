use std::future::Future;

use grocerdb_core::Product;

use crate::client::KassalClient;
use crate::error::KassalError;
use crate::query::ProductQuery;

/// Name-based product lookup used by the on-sale aggregation.
///
/// Implemented by [`KassalClient`]; tests substitute in-memory fakes.
pub trait ProductSearch: Send + Sync {
    /// Returns the single best hit for `name`, or `None` when the search
    /// comes back empty.
    fn best_match(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Product>, KassalError>> + Send;
}

impl ProductSearch for KassalClient {
    async fn best_match(&self, name: &str) -> Result<Option<Product>, KassalError> {
        let page = self.products(&ProductQuery::best_match(name)).await?;
        Ok(page.data.into_iter().next())
    }
}
