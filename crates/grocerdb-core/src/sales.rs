//! Promotional sale records extracted from vendor catalog pages.
//!
//! A [`Sale`] is one of three discount shapes. Deserialization goes through a
//! permissive wire struct so that extra `null` fields written by other tools
//! are accepted, while a tag without its required fields is rejected.

use serde::{Deserialize, Serialize};

use crate::SaleError;

/// A discount attached to a catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", try_from = "RawSale")]
pub enum Sale {
    /// Fixed sale price, e.g. `"29,90"`.
    Price { price: f64 },
    /// Percent off the regular price, `0..=100`.
    Percentage { discount_percentage: f64 },
    /// `n` items for `total_price`, e.g. "3 for 100".
    NForPrice { n: u32, total_price: f64 },
}

impl Sale {
    /// # Errors
    ///
    /// Returns [`SaleError::OutOfRange`] unless `price` is finite and positive.
    pub fn price(price: f64) -> Result<Self, SaleError> {
        require_positive("price", price)?;
        Ok(Self::Price { price })
    }

    /// # Errors
    ///
    /// Returns [`SaleError::OutOfRange`] unless `discount_percentage` is in `0..=100`.
    pub fn percentage(discount_percentage: f64) -> Result<Self, SaleError> {
        if !(0.0..=100.0).contains(&discount_percentage) {
            return Err(SaleError::OutOfRange {
                field: "discount_percentage",
                reason: format!("{discount_percentage} is not within 0..=100"),
            });
        }
        Ok(Self::Percentage {
            discount_percentage,
        })
    }

    /// # Errors
    ///
    /// Returns [`SaleError::OutOfRange`] if `n` is zero or `total_price` is
    /// not finite and positive.
    pub fn n_for_price(n: u32, total_price: f64) -> Result<Self, SaleError> {
        if n == 0 {
            return Err(SaleError::OutOfRange {
                field: "n",
                reason: "must be at least 1".to_string(),
            });
        }
        require_positive("total_price", total_price)?;
        Ok(Self::NForPrice { n, total_price })
    }

    /// Wire name of the variant (`"price"`, `"percentage"`, `"n_for_price"`).
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Sale::Price { .. } => "price",
            Sale::Percentage { .. } => "percentage",
            Sale::NForPrice { .. } => "n_for_price",
        }
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), SaleError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SaleError::OutOfRange {
            field,
            reason: format!("{value} is not a positive number"),
        })
    }
}

/// Flat wire form; every field other than `type` may be absent or `null`.
#[derive(Debug, Deserialize)]
struct RawSale {
    #[serde(rename = "type")]
    sale_type: String,
    price: Option<f64>,
    discount_percentage: Option<f64>,
    n: Option<i64>,
    total_price: Option<f64>,
}

impl TryFrom<RawSale> for Sale {
    type Error = SaleError;

    fn try_from(raw: RawSale) -> Result<Self, Self::Error> {
        match raw.sale_type.as_str() {
            "price" => {
                let price = raw.price.ok_or(SaleError::MissingField {
                    sale_type: "price",
                    field: "price",
                })?;
                Sale::price(price)
            }
            "percentage" => {
                let pct = raw.discount_percentage.ok_or(SaleError::MissingField {
                    sale_type: "percentage",
                    field: "discount_percentage",
                })?;
                Sale::percentage(pct)
            }
            "n_for_price" => {
                let n = raw.n.ok_or(SaleError::MissingField {
                    sale_type: "n_for_price",
                    field: "n",
                })?;
                let total_price = raw.total_price.ok_or(SaleError::MissingField {
                    sale_type: "n_for_price",
                    field: "total_price",
                })?;
                let n = u32::try_from(n).map_err(|_| SaleError::OutOfRange {
                    field: "n",
                    reason: format!("{n} is not a valid item count"),
                })?;
                Sale::n_for_price(n, total_price)
            }
            other => Err(SaleError::UnknownType(other.to_string())),
        }
    }
}

/// One product name as printed in a promotional catalog, with its sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesItem {
    pub name: String,
    pub sale: Sale,
}

/// All sale items extracted from a single catalog image.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SalesCatalog {
    pub products: Vec<SalesItem>,
}

/// A [`SalesCatalog`] tagged with the vendor folder it was scraped from.
///
/// One scrape run produces one `ProductSales` per image, so a vendor is
/// usually represented by several of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSales {
    pub products: SalesCatalog,
    #[serde(default)]
    pub vendor: Option<String>,
}

impl ProductSales {
    #[must_use]
    pub fn new(products: SalesCatalog, vendor: Option<String>) -> Self {
        Self { products, vendor }
    }

    /// Sale items in catalog order.
    pub fn items(&self) -> impl Iterator<Item = &SalesItem> {
        self.products.products.iter()
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.products.products.len()
    }
}

#[cfg(test)]
#[path = "sales_test.rs"]
mod tests;
