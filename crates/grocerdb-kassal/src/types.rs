//! Response shapes returned by the Kassal API.

use chrono::{DateTime, Utc};
use grocerdb_core::{Allergen, Nutrition, PriceHistory, Product, Store};
use serde::{Deserialize, Serialize};

/// `{ "data": ... }` wrapper used by the single-resource endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// Navigation links of a paginated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLinks {
    pub first: Option<String>,
    pub last: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// Pagination metadata for product lists.
///
/// The upstream product search omits `last_page` and `total`; the on-sale
/// listing fills them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductsMeta {
    pub current_page: u32,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub per_page: u32,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub data: Vec<Product>,
    pub links: PageLinks,
    pub meta: ProductsMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub monday: Option<String>,
    pub tuesday: Option<String>,
    pub wednesday: Option<String>,
    pub thursday: Option<String>,
    pub friday: Option<String>,
    pub saturday: Option<String>,
    pub sunday: Option<String>,
}

/// A brick-and-mortar grocery store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalStore {
    pub id: i64,
    pub group: Option<String>,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub fax: Option<String>,
    pub logo: Option<String>,
    pub website: Option<String>,
    #[serde(rename = "detailUrl")]
    pub detail_url: Option<String>,
    pub position: Option<Position>,
    #[serde(rename = "openingHours")]
    pub opening_hours: Option<OpeningHours>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaLink {
    pub url: Option<String>,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoresMeta {
    pub current_page: u32,
    pub from: Option<u64>,
    pub last_page: u32,
    #[serde(default)]
    pub links: Vec<MetaLink>,
    pub path: String,
    pub per_page: u32,
    pub to: Option<u64>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalStoresResponse {
    pub data: Vec<PhysicalStore>,
    pub links: PageLinks,
    pub meta: StoresMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentPrice {
    pub price: f64,
    pub unit_price: Option<f64>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KassalappLink {
    pub url: String,
    pub opengraph: Option<serde_json::Value>,
}

/// One store's listing of a product in an EAN lookup or URL comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListedProduct {
    pub id: i64,
    pub name: String,
    pub vendor: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<String>,
    pub url: String,
    pub image: Option<String>,
    pub store: Option<Store>,
    pub current_price: Option<CurrentPrice>,
    pub weight: Option<f64>,
    pub weight_unit: Option<String>,
    #[serde(default)]
    pub price_history: Vec<PriceHistory>,
    pub kassalapp: Option<KassalappLink>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Every store listing sharing one EAN, with the shared allergen and
/// nutrition data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EanProductSet {
    pub ean: String,
    pub products: Vec<ListedProduct>,
    #[serde(default)]
    pub allergens: Vec<Allergen>,
    #[serde(default)]
    pub nutrition: Vec<Nutrition>,
}
