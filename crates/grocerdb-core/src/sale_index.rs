//! Case-insensitive lookup from catalog item name to [`Sale`].

use std::collections::HashMap;

use crate::sales::{ProductSales, Sale};

/// Ordered `(lower-cased name, sale)` entries built from scraped catalogs.
///
/// Iteration order is insertion order: vendor records first to last, then
/// items within each record. When the same lower-cased name appears again,
/// the entry keeps its original position and takes the newer sale.
#[derive(Debug, Clone, Default)]
pub struct SaleIndex {
    entries: Vec<(String, Sale)>,
    positions: HashMap<String, usize>,
}

impl SaleIndex {
    /// Flattens every item of every record into one index.
    #[must_use]
    pub fn build(catalogs: &[ProductSales]) -> Self {
        let mut index = Self::default();
        for item in catalogs.iter().flat_map(ProductSales::items) {
            index.insert(&item.name, item.sale.clone());
        }
        index
    }

    /// Inserts or overwrites the sale for `name`, compared case-insensitively.
    pub fn insert(&mut self, name: &str, sale: Sale) {
        let key = name.to_lowercase();
        if let Some(&pos) = self.positions.get(&key) {
            self.entries[pos].1 = sale;
        } else {
            self.positions.insert(key.clone(), self.entries.len());
            self.entries.push((key, sale));
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Sale> {
        self.positions
            .get(&name.to_lowercase())
            .map(|&pos| &self.entries[pos].1)
    }

    /// First entry whose key occurs inside `haystack`.
    ///
    /// `haystack` must already be lower-cased.
    #[must_use]
    pub fn first_match(&self, haystack: &str) -> Option<(&str, &Sale)> {
        self.entries
            .iter()
            .find(|(key, _)| haystack.contains(key.as_str()))
            .map(|(key, sale)| (key.as_str(), sale))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Sale)> {
        self.entries.iter().map(|(k, s)| (k.as_str(), s))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
