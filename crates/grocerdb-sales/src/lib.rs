//! Sale data pipeline: extraction from catalog images, persistence, startup
//! state and the on-sale product listing.

pub mod aggregate;
pub mod error;
pub mod extract;
pub mod scrape;
pub mod state;
pub mod store;
pub mod vendor;

pub use aggregate::{aggregate_on_sale, paginate, OnSalePage};
pub use error::SalesError;
pub use extract::{SaleExtractor, VisionClient, DEFAULT_MODEL};
pub use scrape::{scrape_vendor, scrape_vendors, ScrapeReport};
pub use state::SalesState;
pub use store::{SalesDocument, SalesStore};
pub use vendor::{vendor_images, DEFAULT_VENDORS};
