//! Competitive-density scoring for geolocated retail sites.
//!
//! Builds a queryable spatial index over a site snapshot, finds each site's
//! nearest competitors, resolves true great-circle distances, and normalizes
//! the per-site mean distance into a population-relative density index in
//! `[0, 1]`, where 1 marks the densest competition.
//!
//! ```rust
//! use geodense::{DensityPass, Site};
//! use geo::Point;
//!
//! let sites = vec![
//!     Site::new("1", "OKKO", Point::new(26.9871, 49.4216)),
//!     Site::new("2", "WOG", Point::new(26.9936, 49.4301)),
//!     Site::new("3", "UPG", Point::new(27.0105, 49.4189)),
//! ];
//!
//! let scores = DensityPass::new().run(&sites)?;
//! assert_eq!(scores.len(), 3);
//! assert!(scores.iter().all(|s| (0.0..=1.0).contains(&s.index)));
//! # Ok::<(), geodense::GeodenseError>(())
//! ```

pub mod distance;
pub mod error;
pub mod index;
pub mod join;
pub mod normalize;
pub mod pass;
pub mod prices;
pub mod scorer;
pub mod types;
pub mod validation;

pub use error::{GeodenseError, Result};

pub use geo::Point;

pub use distance::ground_distance_km;

pub use index::{IndexedSite, NeighborHit, NeighborHits, SiteIndex};

pub use join::{
    BrandDensity, BrandMetricRow, CrossMetricReport, brand_mean_index, join_brand_metric,
    pearson_correlation,
};

pub use normalize::density_index;

pub use pass::{DensityPass, PassBuilder};

pub use prices::{FuelType, PriceRecord, mean_price_by_brand};

pub use scorer::DensityScorer;

pub use types::{DensityScore, PassConfig, Site, dedup_coincident};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{DensityPass, GeodenseError, PassBuilder, Result};

    pub use geo::Point;

    pub use crate::{DensityScore, PassConfig, Site};

    pub use crate::{CrossMetricReport, FuelType, PriceRecord, mean_price_by_brand};

    pub use crate::ground_distance_km;
}
