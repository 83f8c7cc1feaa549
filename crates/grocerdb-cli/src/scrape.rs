//! `scrape` command: catalog images in, saved sales document out.
//!
//! Vendors and images that fail are logged and skipped so one bad folder
//! does not abort the run. Everything extracted is saved in a single write.

use std::path::Path;

use grocerdb_sales::{
    scrape_vendors, vendor_images, SalesDocument, SalesStore, VisionClient, DEFAULT_VENDORS,
};

use crate::sales::print_summary;

/// Vendors named on the command line, or the default list when none were.
pub(crate) fn resolve_vendors(requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        DEFAULT_VENDORS.iter().map(|v| (*v).to_owned()).collect()
    } else {
        requested.to_vec()
    }
}

/// Scrape the vendor folders under `images_root` and save every extracted
/// record to the configured sales path.
///
/// When `dry_run` is `true` the images are listed and nothing is sent or
/// written.
///
/// # Errors
///
/// Returns an error if `OPENAI_API_KEY` is unset, the vision client cannot
/// be built, nothing could be extracted, or the document cannot be saved
/// and reloaded.
pub(crate) async fn run_scrape(
    config: &grocerdb_core::AppConfig,
    requested: &[String],
    images_root: &Path,
    dry_run: bool,
) -> anyhow::Result<()> {
    let vendors = resolve_vendors(requested);

    if dry_run {
        print_dry_run(images_root, &vendors);
        return Ok(());
    }

    let api_key = config
        .openai_api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY must be set to scrape sales"))?;
    let client = VisionClient::with_base_url(
        api_key,
        &config.vision_base_url,
        &config.vision_model,
        config.vision_request_timeout_secs,
    )
    .map_err(|e| anyhow::anyhow!("failed to build vision client: {e}"))?;

    let report = scrape_vendors(&client, images_root, &vendors).await;
    tracing::info!(
        vendors = vendors.len(),
        records = report.records.len(),
        failed_vendors = report.failed_vendors.len(),
        failed_images = report.failed_images,
        "scrape finished"
    );

    if report.records.is_empty() {
        anyhow::bail!(
            "no sales extracted from {} vendors; existing sales document left untouched",
            vendors.len()
        );
    }

    let store = SalesStore::new(config.sales_path.clone());
    store.save(&SalesDocument::Many(report.records))?;
    let reloaded = store.load()?.into_records();

    println!("saved sales to {}", store.path().display());
    print_summary(&reloaded);
    for (vendor, reason) in &report.failed_vendors {
        println!("  skipped {vendor}: {reason}");
    }
    if report.failed_images > 0 {
        println!("  {} images failed extraction", report.failed_images);
    }
    Ok(())
}

fn print_dry_run(images_root: &Path, vendors: &[String]) {
    for vendor in vendors {
        match vendor_images(images_root, vendor) {
            Ok(images) => {
                println!("dry-run: {vendor}: {} images", images.len());
                for image in images {
                    println!("  {}", image.display());
                }
            }
            Err(e) => println!("dry-run: {vendor}: skipped ({e})"),
        }
    }
}
