//! Typed client for the Kassal grocery price API.

pub mod client;
pub mod error;
pub mod query;
mod rate_limit;
pub mod search;
pub mod types;

pub use client::KassalClient;
pub use error::KassalError;
pub use query::{ProductQuery, StoreQuery, STORE_GROUPS};
pub use search::ProductSearch;
pub use types::{
    EanProductSet, ListedProduct, PageLinks, PhysicalStore, PhysicalStoresResponse,
    ProductsMeta, ProductsResponse,
};
