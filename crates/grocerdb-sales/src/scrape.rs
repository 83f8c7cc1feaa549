//! Turns vendor image folders into [`ProductSales`] records.

use std::path::Path;

use grocerdb_core::ProductSales;

use crate::error::SalesError;
use crate::extract::SaleExtractor;
use crate::vendor::vendor_images;

/// Outcome of scraping several vendors.
#[derive(Debug, Default)]
pub struct ScrapeReport {
    /// One record per successfully extracted image, in vendor then image order.
    pub records: Vec<ProductSales>,
    /// Vendors skipped entirely, with the reason.
    pub failed_vendors: Vec<(String, String)>,
    pub failed_images: usize,
}

/// Extracts every image of one vendor folder.
///
/// Images that fail extraction are logged and skipped; the returned
/// `usize` counts them.
///
/// # Errors
///
/// Returns the folder discovery error from [`vendor_images`] when the
/// vendor folder is missing or holds no images.
pub async fn scrape_vendor<E: SaleExtractor>(
    extractor: &E,
    images_root: &Path,
    vendor: &str,
) -> Result<(Vec<ProductSales>, usize), SalesError> {
    let images = vendor_images(images_root, vendor)?;
    tracing::info!(vendor, images = images.len(), "scraping vendor");

    let mut records = Vec::with_capacity(images.len());
    let mut failed = 0usize;
    for image in &images {
        match extractor.extract(image).await {
            Ok(catalog) => {
                records.push(ProductSales::new(catalog, Some(vendor.to_owned())));
            }
            Err(e) => {
                failed += 1;
                tracing::warn!(
                    vendor,
                    image = %image.display(),
                    error = %e,
                    "sale extraction failed; skipping image"
                );
            }
        }
    }
    Ok((records, failed))
}

/// Scrapes each vendor in turn. A vendor whose folder is missing or empty
/// is logged and skipped.
pub async fn scrape_vendors<E, V>(extractor: &E, images_root: &Path, vendors: &[V]) -> ScrapeReport
where
    E: SaleExtractor,
    V: AsRef<str>,
{
    let mut report = ScrapeReport::default();
    for vendor in vendors {
        let vendor = vendor.as_ref();
        match scrape_vendor(extractor, images_root, vendor).await {
            Ok((records, failed)) => {
                report.records.extend(records);
                report.failed_images += failed;
            }
            Err(e) => {
                tracing::warn!(vendor, error = %e, "skipping vendor");
                report.failed_vendors.push((vendor.to_owned(), e.to_string()));
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use std::fs;

    use grocerdb_core::{Sale, SalesCatalog, SalesItem};

    use super::*;

    /// Extracts one item named after the file stem; files named `bad.*` fail.
    struct StemExtractor;

    impl SaleExtractor for StemExtractor {
        async fn extract(&self, image: &Path) -> Result<SalesCatalog, SalesError> {
            let stem = image
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_owned();
            if stem == "bad" {
                return Err(SalesError::Extraction("unreadable page".to_owned()));
            }
            Ok(SalesCatalog {
                products: vec![SalesItem {
                    name: stem,
                    sale: Sale::price(10.0).unwrap(),
                }],
            })
        }
    }

    fn vendor_dir(root: &Path, vendor: &str, files: &[&str]) {
        let dir = root.join(vendor);
        fs::create_dir_all(&dir).unwrap();
        for file in files {
            fs::write(dir.join(file), b"img").unwrap();
        }
    }

    #[tokio::test]
    async fn one_record_per_image_tagged_with_vendor() {
        let root = tempfile::tempdir().unwrap();
        vendor_dir(root.path(), "kiwi-no", &["b.jpg", "a.png"]);

        let (records, failed) = scrape_vendor(&StemExtractor, root.path(), "kiwi-no")
            .await
            .unwrap();

        assert_eq!(failed, 0);
        let names: Vec<&str> = records
            .iter()
            .flat_map(ProductSales::items)
            .map(|item| item.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(records.iter().all(|r| r.vendor.as_deref() == Some("kiwi-no")));
    }

    #[tokio::test]
    async fn failed_images_and_vendors_are_skipped() {
        let root = tempfile::tempdir().unwrap();
        vendor_dir(root.path(), "kiwi-no", &["bad.jpg", "ok.jpg"]);
        vendor_dir(root.path(), "empty-no", &["notes.txt"]);

        let report = scrape_vendors(
            &StemExtractor,
            root.path(),
            &["kiwi-no", "missing-no", "empty-no"],
        )
        .await;

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.failed_images, 1);
        let failed: Vec<&str> = report
            .failed_vendors
            .iter()
            .map(|(vendor, _)| vendor.as_str())
            .collect();
        assert_eq!(failed, vec!["missing-no", "empty-no"]);
    }
}
