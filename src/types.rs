//! Core data types for density scoring passes.

use geo::Point;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{GeodenseError, Result};

/// A geolocated retail site with a brand label.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`. The
/// descriptive fields are carried through a pass unchanged; scoring only
/// reads the location and the brand.
///
/// # Examples
///
/// ```rust
/// use geodense::Site;
/// use geo::Point;
///
/// let site = Site::new("azs-17", "OKKO", Point::new(26.9871, 49.4216))
///     .with_city("Khmelnytskyi");
/// assert_eq!(site.latitude(), 49.4216);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Stable unique identifier.
    pub id: String,
    /// Brand or operator label. Must be non-empty.
    pub brand: String,
    /// Geographic location (`x` = longitude, `y` = latitude).
    pub location: Point<f64>,
    /// City, carried through unchanged.
    #[serde(default)]
    pub city: Option<String>,
    /// Street address, carried through unchanged.
    #[serde(default)]
    pub address: Option<String>,
}

impl Site {
    /// Construct a site without descriptive attributes.
    pub fn new(id: impl Into<String>, brand: impl Into<String>, location: Point<f64>) -> Self {
        Self {
            id: id.into(),
            brand: brand.into(),
            location,
            city: None,
            address: None,
        }
    }

    /// Attach a city label.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Attach a street address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.location.x()
    }

    /// Latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.location.y()
    }
}

/// Configuration for one scoring pass.
///
/// Every pass receives its own configuration; nothing here is process-wide,
/// so passes with different `neighbors` or different site snapshots can run
/// back to back without interference.
///
/// # Example
///
/// ```rust
/// use geodense::PassConfig;
///
/// let config = PassConfig::default();
/// assert_eq!(config.neighbors, 3);
///
/// // Load from JSON; missing fields fall back to defaults.
/// let json = r#"{ "neighbors": 5 }"#;
/// let config: PassConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.neighbors, 5);
/// assert_eq!(config.isolated_distance_km, 999.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassConfig {
    /// Number of nearest competitors averaged per site (k).
    #[serde(default = "PassConfig::default_neighbors")]
    pub neighbors: usize,

    /// Raw distance in kilometers assigned to a site with no competitors.
    ///
    /// This sentinel participates in the population maximum during
    /// normalization, so a single isolated site compresses every other
    /// index toward 1. Callers that want isolation excluded should filter
    /// such sites out before the pass.
    #[serde(default = "PassConfig::default_isolated_distance_km")]
    pub isolated_distance_km: f64,
}

impl PassConfig {
    const fn default_neighbors() -> usize {
        3
    }

    const fn default_isolated_distance_km() -> f64 {
        999.0
    }

    /// Check the configuration is usable for a pass.
    pub fn validate(&self) -> Result<()> {
        if self.neighbors == 0 {
            return Err(GeodenseError::InvalidParameter(
                "neighbors (k) must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            neighbors: Self::default_neighbors(),
            isolated_distance_km: Self::default_isolated_distance_km(),
        }
    }
}

/// Per-site output record of a scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityScore {
    /// Identifier of the scored site.
    pub id: String,
    /// Brand label of the scored site.
    pub brand: String,
    /// City, passed through from the site.
    #[serde(default)]
    pub city: Option<String>,
    /// Mean ground distance to the nearest competitors, in kilometers,
    /// rounded to 3 decimal places.
    pub raw_km: f64,
    /// Normalized density index in `[0, 1]`; 1 = densest competition.
    pub index: f64,
}

/// Drop sites whose coordinates collide with an earlier site once rounded
/// to `decimals` places. The first occurrence wins.
///
/// Geocoded feeds routinely return the same forecourt several times under
/// slightly different queries; collapsing near-identical coordinates is an
/// input-layer decision, which is why the spatial index itself never
/// deduplicates.
///
/// # Examples
///
/// ```rust
/// use geodense::{dedup_coincident, Site};
/// use geo::Point;
///
/// let sites = vec![
///     Site::new("a", "OKKO", Point::new(26.98712, 49.42161)),
///     Site::new("b", "OKKO", Point::new(26.98714, 49.42163)),
/// ];
/// let unique = dedup_coincident(sites, 4);
/// assert_eq!(unique.len(), 1);
/// assert_eq!(unique[0].id, "a");
/// ```
pub fn dedup_coincident(sites: Vec<Site>, decimals: u32) -> Vec<Site> {
    let scale = 10f64.powi(decimals as i32);
    let mut seen = FxHashSet::default();
    sites
        .into_iter()
        .filter(|site| {
            let key = (
                (site.latitude() * scale).round() as i64,
                (site.longitude() * scale).round() as i64,
            );
            seen.insert(key)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PassConfig::default();
        assert_eq!(config.neighbors, 3);
        assert_eq!(config.isolated_distance_km, 999.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero_neighbors() {
        let config = PassConfig {
            neighbors: 0,
            ..PassConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GeodenseError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = PassConfig {
            neighbors: 7,
            isolated_distance_km: 500.0,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PassConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_dedup_first_occurrence_wins() {
        let sites = vec![
            Site::new("1", "WOG", Point::new(26.9871, 49.4216)),
            Site::new("2", "WOG", Point::new(26.98712, 49.42158)),
            Site::new("3", "OKKO", Point::new(27.0105, 49.4189)),
        ];
        let unique = dedup_coincident(sites, 4);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].id, "1");
        assert_eq!(unique[1].id, "3");
    }

    #[test]
    fn test_dedup_precision_controls_collisions() {
        let sites = vec![
            Site::new("1", "WOG", Point::new(26.9871, 49.4216)),
            Site::new("2", "WOG", Point::new(26.98712, 49.42158)),
        ];
        // At 6 decimals the two points are distinct.
        let unique = dedup_coincident(sites, 6);
        assert_eq!(unique.len(), 2);
    }
}
