//! HTTP client for the Kassal REST API.
//!
//! Every request carries the bearer token, is bounded by the configured
//! timeout, and maps 429/404/other non-2xx statuses to typed errors. Bodies
//! are deserialized from text so parse failures carry the endpoint context.

use std::time::Duration;

use grocerdb_core::Product;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::KassalError;
use crate::query::{ProductQuery, StoreQuery};
use crate::rate_limit::retry_with_backoff;
use crate::types::{
    DataEnvelope, EanProductSet, PhysicalStore, PhysicalStoresResponse, ProductsResponse,
};

const DEFAULT_BASE_URL: &str = "https://kassal.app/api/v1/";

/// Fallback wait reported when a 429 carries no `Retry-After` header. The
/// free tier resets its 60-requests-per-minute window every minute.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Client for the Kassal price-comparison API.
///
/// Use [`KassalClient::new`] for production or [`KassalClient::with_base_url`]
/// to point at a mock server in tests.
pub struct KassalClient {
    client: Client,
    api_key: String,
    base_url: Url,
    /// Extra attempts after the first failure for retriable errors.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff.
    backoff_base_secs: u64,
}

impl KassalClient {
    /// Creates a client pointed at the production Kassal API.
    ///
    /// # Errors
    ///
    /// Returns [`KassalError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, KassalError> {
        Self::with_base_url(
            api_key,
            DEFAULT_BASE_URL,
            timeout_secs,
            max_retries,
            backoff_base_secs,
        )
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`KassalError::Http`] if the `reqwest::Client` cannot be built
    /// or [`KassalError::InvalidBaseUrl`] if `base_url` does not parse as a
    /// hierarchical URL.
    pub fn with_base_url(
        api_key: &str,
        base_url: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, KassalError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("grocerdb/0.1 (grocery-prices)")
            .build()?;

        // Exactly one trailing slash so path segments append under the base path.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| KassalError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(KassalError::InvalidBaseUrl {
                base_url: normalised,
                reason: "URL cannot be used as a base".to_owned(),
            });
        }

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries,
            backoff_base_secs,
        })
    }

    /// `GET /physical-stores`
    ///
    /// # Errors
    ///
    /// [`KassalError::InvalidRequest`] if the query fails validation, plus any
    /// transport or status error from the request.
    pub async fn physical_stores(
        &self,
        query: &StoreQuery,
    ) -> Result<PhysicalStoresResponse, KassalError> {
        query.validate()?;
        let url = self.build_url(&["physical-stores"], &query.to_params())?;
        self.get_json(url, "physical-stores").await
    }

    /// `GET /physical-stores/{id}`
    ///
    /// # Errors
    ///
    /// [`KassalError::NotFound`] for an unknown id, plus any transport or
    /// status error from the request.
    pub async fn physical_store(&self, store_id: &str) -> Result<PhysicalStore, KassalError> {
        let url = self.build_url(&["physical-stores", store_id], &[])?;
        let envelope: DataEnvelope<PhysicalStore> = self
            .get_json(url, &format!("physical-stores/{store_id}"))
            .await?;
        Ok(envelope.data)
    }

    /// `GET /products`
    ///
    /// # Errors
    ///
    /// Any transport, status, or deserialization error from the request.
    pub async fn products(&self, query: &ProductQuery) -> Result<ProductsResponse, KassalError> {
        let url = self.build_url(&["products"], &query.to_params())?;
        self.get_json(url, "products").await
    }

    /// `GET /products/id/{id}`
    ///
    /// # Errors
    ///
    /// [`KassalError::NotFound`] for an unknown id, plus any transport or
    /// status error from the request.
    pub async fn product_by_id(&self, product_id: i64) -> Result<Product, KassalError> {
        let id = product_id.to_string();
        let url = self.build_url(&["products", "id", &id], &[])?;
        let envelope: DataEnvelope<Product> =
            self.get_json(url, &format!("products/id/{id}")).await?;
        Ok(envelope.data)
    }

    /// `GET /products/ean/{ean}`
    ///
    /// # Errors
    ///
    /// [`KassalError::NotFound`] for an unknown EAN, plus any transport or
    /// status error from the request.
    pub async fn products_by_ean(&self, ean: &str) -> Result<EanProductSet, KassalError> {
        let url = self.build_url(&["products", "ean", ean], &[])?;
        let envelope: DataEnvelope<EanProductSet> =
            self.get_json(url, &format!("products/ean/{ean}")).await?;
        Ok(envelope.data)
    }

    /// `GET /products/find-by-url/single?url=`
    ///
    /// # Errors
    ///
    /// Any transport, status, or deserialization error from the request.
    pub async fn find_by_url_single(&self, product_url: &str) -> Result<Product, KassalError> {
        let url = self.build_url(
            &["products", "find-by-url", "single"],
            &[("url", product_url.to_owned())],
        )?;
        let envelope: DataEnvelope<Product> =
            self.get_json(url, "products/find-by-url/single").await?;
        Ok(envelope.data)
    }

    /// `GET /products/find-by-url/compare?url=`
    ///
    /// # Errors
    ///
    /// Any transport, status, or deserialization error from the request.
    pub async fn find_by_url_compare(
        &self,
        product_url: &str,
    ) -> Result<EanProductSet, KassalError> {
        let url = self.build_url(
            &["products", "find-by-url", "compare"],
            &[("url", product_url.to_owned())],
        )?;
        let envelope: DataEnvelope<EanProductSet> =
            self.get_json(url, "products/find-by-url/compare").await?;
        Ok(envelope.data)
    }

    /// Appends `segments` (percent-encoded) under the base path and adds the
    /// query parameters, if any.
    fn build_url(
        &self,
        segments: &[&str],
        params: &[(&'static str, String)],
    ) -> Result<Url, KassalError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| KassalError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, KassalError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .bearer_auth(&self.api_key)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                    return Err(KassalError::RateLimited { retry_after_secs });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(KassalError::NotFound {
                        url: url.to_string(),
                    });
                }

                if !status.is_success() {
                    return Err(KassalError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<T>(&body).map_err(|e| KassalError::Deserialize {
                    context: context.to_owned(),
                    source: e,
                })
            }
        })
        .await
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
