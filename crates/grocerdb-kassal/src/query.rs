//! Query parameter builders for the list endpoints.

use crate::error::KassalError;

/// Store chain groups accepted by `GET /physical-stores?group=`.
pub const STORE_GROUPS: &[&str] = &[
    "ALLTIMAT",
    "BUNNPRIS",
    "COOP_BYGGMIX",
    "COOP_ELEKTRO",
    "COOP_EXTRA",
    "COOP_MARKED",
    "COOP_MEGA",
    "COOP_OBS",
    "COOP_OBS_BYGG",
    "COOP_PRIX",
    "EUROPRIS_NO",
    "FUDI",
    "GIGABOKS",
    "HAVARISTEN",
    "JOKER_NO",
    "KIWI",
    "MATKROKEN",
    "MENY_NO",
    "NAERBUTIKKEN",
    "REMA_1000",
    "SPAR_NO",
];

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_SIZE: u32 = 10;
const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Filters for `GET /physical-stores`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreQuery {
    pub search: Option<String>,
    pub page: u32,
    pub size: u32,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub km: f64,
    pub group: Option<String>,
}

impl Default for StoreQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: DEFAULT_PAGE,
            size: DEFAULT_SIZE,
            lat: None,
            lng: None,
            km: DEFAULT_RADIUS_KM,
            group: None,
        }
    }
}

impl StoreQuery {
    /// Checks the constraints the API would otherwise reject with a vague 422.
    ///
    /// # Errors
    ///
    /// Returns [`KassalError::InvalidRequest`] when only one of `lat`/`lng`
    /// is set, `km` is negative or `NaN`, or `group` is not one of [`STORE_GROUPS`].
    pub fn validate(&self) -> Result<(), KassalError> {
        if self.lat.is_some() != self.lng.is_some() {
            return Err(KassalError::InvalidRequest(
                "both latitude and longitude must be set together or omitted".to_string(),
            ));
        }
        if self.km.is_nan() || self.km < 0.0 {
            return Err(KassalError::InvalidRequest(
                "the radius (km) must be non-negative".to_string(),
            ));
        }
        if let Some(group) = self.group.as_deref() {
            if !STORE_GROUPS.contains(&group) {
                return Err(KassalError::InvalidRequest(format!(
                    "invalid group '{group}'; must be one of: {}",
                    STORE_GROUPS.join(", ")
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_owned()));
        }
        params.push(("page", self.page.to_string()));
        params.push(("size", self.size.to_string()));
        if let (Some(lat), Some(lng)) = (self.lat, self.lng) {
            params.push(("lat", lat.to_string()));
            params.push(("lng", lng.to_string()));
            params.push(("km", self.km.to_string()));
        }
        if let Some(group) = self.group.as_deref() {
            params.push(("group", group.to_owned()));
        }
        params
    }
}

/// Filters for `GET /products`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub page: u32,
    pub size: u32,
    pub vendor: Option<String>,
    pub brand: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub unique: Option<bool>,
    pub exclude_without_ean: Option<bool>,
    pub sort: Option<String>,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: DEFAULT_PAGE,
            size: DEFAULT_SIZE,
            vendor: None,
            brand: None,
            price_min: None,
            price_max: None,
            unique: None,
            exclude_without_ean: None,
            sort: None,
        }
    }
}

impl ProductQuery {
    /// Free-text search returning only the single best hit.
    #[must_use]
    pub fn best_match(search: &str) -> Self {
        Self {
            search: Some(search.to_owned()),
            size: 1,
            ..Self::default()
        }
    }

    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_owned()));
        }
        params.push(("page", self.page.to_string()));
        params.push(("size", self.size.to_string()));
        if let Some(vendor) = self.vendor.as_deref().filter(|s| !s.is_empty()) {
            params.push(("vendor", vendor.to_owned()));
        }
        if let Some(brand) = self.brand.as_deref().filter(|s| !s.is_empty()) {
            params.push(("brand", brand.to_owned()));
        }
        if let Some(min) = self.price_min {
            params.push(("price_min", min.to_string()));
        }
        if let Some(max) = self.price_max {
            params.push(("price_max", max.to_string()));
        }
        if let Some(unique) = self.unique {
            params.push(("unique", unique.to_string()));
        }
        if let Some(exclude) = self.exclude_without_ean {
            params.push(("exclude_without_ean", exclude.to_string()));
        }
        if let Some(sort) = self.sort.as_deref().filter(|s| !s.is_empty()) {
            params.push(("sort", sort.to_owned()));
        }
        params
    }
}
