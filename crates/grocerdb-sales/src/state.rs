use std::sync::Arc;

use grocerdb_core::{ProductSales, SaleIndex};

use crate::store::SalesStore;

/// Sale records as loaded once at process start.
///
/// A failed load is not fatal: the server keeps running without sale data
/// and reports why through [`SalesState::NotLoaded`].
#[derive(Debug, Clone)]
pub enum SalesState {
    Loaded(Arc<Vec<ProductSales>>),
    NotLoaded(String),
}

impl SalesState {
    /// Loads the store and logs, rather than propagates, any failure.
    pub fn load(store: &SalesStore) -> Self {
        match store.load() {
            Ok(document) => {
                let records = document.into_records();
                tracing::info!(
                    path = %store.path().display(),
                    records = records.len(),
                    items = records.iter().map(ProductSales::item_count).sum::<usize>(),
                    "sales data loaded"
                );
                Self::Loaded(Arc::new(records))
            }
            Err(e) => {
                tracing::warn!(
                    path = %store.path().display(),
                    error = %e,
                    "sales data not loaded; on-sale features disabled"
                );
                Self::NotLoaded(e.to_string())
            }
        }
    }

    /// Loaded records, or an empty slice when loading failed.
    #[must_use]
    pub fn records(&self) -> &[ProductSales] {
        match self {
            Self::Loaded(records) => records,
            Self::NotLoaded(_) => &[],
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    #[must_use]
    pub fn build_index(&self) -> SaleIndex {
        SaleIndex::build(self.records())
    }

    /// Every sale-item name across all records, in record then item order.
    /// Repeated names are kept.
    #[must_use]
    pub fn item_names(&self) -> Vec<String> {
        self.records()
            .iter()
            .flat_map(ProductSales::items)
            .map(|item| item.name.clone())
            .collect()
    }
}

impl From<Vec<ProductSales>> for SalesState {
    fn from(records: Vec<ProductSales>) -> Self {
        Self::Loaded(Arc::new(records))
    }
}

#[cfg(test)]
mod tests {
    use grocerdb_core::{Sale, SalesCatalog, SalesItem};

    use super::*;
    use crate::store::SalesDocument;

    fn record(names: &[&str]) -> ProductSales {
        ProductSales::new(
            SalesCatalog {
                products: names
                    .iter()
                    .map(|name| SalesItem {
                        name: (*name).to_owned(),
                        sale: Sale::price(10.0).unwrap(),
                    })
                    .collect(),
            },
            None,
        )
    }

    #[test]
    fn missing_file_yields_not_loaded_with_reason() {
        let dir = tempfile::tempdir().unwrap();
        let state = SalesState::load(&SalesStore::new(dir.path().join("absent.json")));

        assert!(!state.is_loaded());
        assert!(state.records().is_empty());
        assert!(state.item_names().is_empty());
        match state {
            SalesState::NotLoaded(reason) => assert!(reason.contains("not found"), "{reason}"),
            SalesState::Loaded(_) => panic!("expected NotLoaded"),
        }
    }

    #[test]
    fn loads_records_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = SalesStore::new(dir.path().join("sales.json"));
        store
            .save(&SalesDocument::Single(record(&["Melk", "Brød"])))
            .unwrap();

        let state = SalesState::load(&store);
        assert!(state.is_loaded());
        assert_eq!(state.records().len(), 1);
        assert_eq!(state.build_index().len(), 2);
    }

    #[test]
    fn item_names_keep_order_and_duplicates() {
        let state = SalesState::from(vec![record(&["Melk", "Brød"]), record(&["Melk"])]);
        assert_eq!(state.item_names(), vec!["Melk", "Brød", "Melk"]);
    }
}
