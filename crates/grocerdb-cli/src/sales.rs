//! Read-only views of the saved sales document.

use std::collections::BTreeMap;

use grocerdb_core::ProductSales;
use grocerdb_sales::SalesStore;

/// Per-vendor totals, keyed by vendor name (`(none)` when unset).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VendorTotals {
    pub pages: usize,
    pub items: usize,
}

pub(crate) fn summarize(records: &[ProductSales]) -> BTreeMap<String, VendorTotals> {
    let mut totals: BTreeMap<String, VendorTotals> = BTreeMap::new();
    for record in records {
        let vendor = record.vendor.clone().unwrap_or_else(|| "(none)".to_owned());
        let entry = totals.entry(vendor).or_default();
        entry.pages += 1;
        entry.items += record.item_count();
    }
    totals
}

pub(crate) fn print_summary(records: &[ProductSales]) {
    let totals = summarize(records);
    let items: usize = totals.values().map(|t| t.items).sum();
    println!(
        "{} sale items from {} catalog pages across {} vendors",
        items,
        records.len(),
        totals.len()
    );
    for (vendor, t) in &totals {
        println!("  {vendor:<16} {:>4} items  {:>3} pages", t.items, t.pages);
    }
}

/// Loads the sales document and prints per-vendor counts.
///
/// # Errors
///
/// Returns an error if the document is missing or invalid.
pub(crate) fn run_sales_show(config: &grocerdb_core::AppConfig) -> anyhow::Result<()> {
    let store = SalesStore::new(config.sales_path.clone());
    let records = store.load()?.into_records();
    println!("sales document: {}", store.path().display());
    print_summary(&records);
    Ok(())
}
