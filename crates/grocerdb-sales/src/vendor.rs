//! Discovery of downloaded catalog images, one folder per vendor.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SalesError;

/// Vendor folders scraped when none are named explicitly.
pub const DEFAULT_VENDORS: &[&str] = &[
    "bunnpris-no",
    "coop-extra-no",
    "coop-mega-no",
    "coop-prix-no",
    "eurocash-se",
    "europris-no",
    "joker-no",
    "kiwi-no",
    "meny-no",
    "gigaboks-no",
    "holdbart-no",
    "jacobs-no",
    "matkroken-no",
];

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Lists the image files in `images_root/vendor`, sorted by path.
///
/// # Errors
///
/// Returns [`SalesError::VendorNotFound`] if the vendor folder does not exist,
/// [`SalesError::Io`] if it cannot be read, or [`SalesError::NoImages`] if
/// it holds no `.jpg`, `.jpeg` or `.png` files.
pub fn vendor_images(images_root: &Path, vendor: &str) -> Result<Vec<PathBuf>, SalesError> {
    let dir = images_root.join(vendor);
    if !dir.is_dir() {
        return Err(SalesError::VendorNotFound { dir });
    }

    let entries = fs::read_dir(&dir).map_err(|source| SalesError::Io {
        path: dir.clone(),
        source,
    })?;

    let mut images = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| SalesError::Io {
            path: dir.clone(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && is_image(&path) {
            images.push(path);
        }
    }

    if images.is_empty() {
        return Err(SalesError::NoImages { dir });
    }
    images.sort();
    Ok(images)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
