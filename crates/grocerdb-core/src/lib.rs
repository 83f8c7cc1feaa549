mod app_config;
mod config;
pub mod enrich;
pub mod products;
pub mod sale_index;
pub mod sales;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use enrich::enrich_products;
pub use products::{Allergen, Nutrition, PriceHistory, Product, Store};
pub use sale_index::SaleIndex;
pub use sales::{ProductSales, Sale, SalesCatalog, SalesItem};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Rejections raised when a [`Sale`] is built from fields that do not fit
/// its variant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SaleError {
    #[error("sale type '{sale_type}' requires field '{field}'")]
    MissingField {
        sale_type: &'static str,
        field: &'static str,
    },

    #[error("sale field '{field}' is out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: String,
    },

    #[error("unknown sale type: {0}")]
    UnknownType(String),
}
