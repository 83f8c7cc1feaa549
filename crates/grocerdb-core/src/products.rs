use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sales::Sale;

/// A grocery product as returned by the price-comparison API.
///
/// Unknown upstream fields are ignored. `sale` is never sent by the upstream
/// API; it is attached locally by [`crate::enrich_products`] and omitted from
/// the JSON output when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub vendor: Option<String>,
    pub ean: Option<String>,
    pub url: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<String>,
    pub current_price: Option<f64>,
    pub current_unit_price: Option<f64>,
    pub weight: Option<f64>,
    pub weight_unit: Option<String>,
    pub store: Option<Store>,
    #[serde(default)]
    pub price_history: Vec<PriceHistory>,
    #[serde(default)]
    pub allergens: Vec<Allergen>,
    #[serde(default)]
    pub nutrition: Vec<Nutrition>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale: Option<Sale>,
}

/// Chain the product is listed under, e.g. `KIWI` or `MENY_NO`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub name: String,
    pub code: String,
    pub url: String,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub price: f64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allergen {
    pub code: String,
    pub display_name: String,
    pub contains: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub code: String,
    pub display_name: String,
    pub amount: f64,
    pub unit: String,
}
