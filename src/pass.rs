//! Scoring pass orchestration.
//!
//! A pass is a pure function of its site snapshot and configuration: build
//! the index, score every site, normalize across the population. Identical
//! input produces bit-identical output.

use crate::error::Result;
use crate::normalize::density_index;
use crate::scorer::DensityScorer;
use crate::types::{DensityScore, PassConfig, Site};

/// Builder for a density pass with explicit per-pass parameters.
///
/// # Examples
///
/// ```rust
/// use geodense::PassBuilder;
///
/// let pass = PassBuilder::new()
///     .neighbors(5)
///     .isolated_distance_km(500.0)
///     .build()?;
/// assert_eq!(pass.config().neighbors, 5);
/// # Ok::<(), geodense::GeodenseError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PassBuilder {
    config: PassConfig,
}

impl PassBuilder {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: PassConfig::default(),
        }
    }

    /// Set the number of nearest competitors averaged per site (k).
    pub fn neighbors(mut self, k: usize) -> Self {
        self.config.neighbors = k;
        self
    }

    /// Set the raw distance assigned to a site with no competitors.
    pub fn isolated_distance_km(mut self, km: f64) -> Self {
        self.config.isolated_distance_km = km;
        self
    }

    /// Replace the whole configuration, e.g. one loaded from JSON.
    pub fn config(mut self, config: PassConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the pass.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when the configured k is zero.
    pub fn build(self) -> Result<DensityPass> {
        self.config.validate()?;
        Ok(DensityPass {
            config: self.config,
        })
    }
}

/// A configured, reusable scoring pass.
///
/// # Examples
///
/// ```rust
/// use geodense::{DensityPass, Site};
/// use geo::Point;
///
/// let sites = vec![
///     Site::new("1", "OKKO", Point::new(26.9871, 49.4216)),
///     Site::new("2", "WOG", Point::new(26.9936, 49.4301)),
///     Site::new("3", "UPG", Point::new(27.0105, 49.4189)),
/// ];
///
/// let scores = DensityPass::new().run(&sites)?;
/// assert_eq!(scores.len(), 3);
/// assert!(scores.iter().all(|s| (0.0..=1.0).contains(&s.index)));
/// # Ok::<(), geodense::GeodenseError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DensityPass {
    config: PassConfig,
}

impl DensityPass {
    /// Pass with the default configuration (k = 3, 999 km isolation
    /// sentinel).
    pub fn new() -> Self {
        Self {
            config: PassConfig::default(),
        }
    }

    /// The configuration this pass runs with.
    pub fn config(&self) -> &PassConfig {
        &self.config
    }

    /// Run the pass over one immutable snapshot.
    ///
    /// Returns one [`DensityScore`] per site, in input order. The records
    /// are complete only as a set: normalization needs the population
    /// maximum, so no per-site result exists before every raw score does.
    ///
    /// # Errors
    ///
    /// `EmptyInput` for an empty snapshot, `InvalidInput` for unusable
    /// coordinates, empty brands, or duplicate identifiers.
    pub fn run(&self, sites: &[Site]) -> Result<Vec<DensityScore>> {
        let scorer = DensityScorer::new(sites, &self.config)?;
        let raw = scorer.score_all();
        let indices = density_index(&raw);

        log::info!(
            "scored {} sites with k={}",
            sites.len(),
            self.config.neighbors
        );

        Ok(sites
            .iter()
            .zip(raw)
            .zip(indices)
            .map(|((site, raw_km), index)| DensityScore {
                id: site.id.clone(),
                brand: site.brand.clone(),
                city: site.city.clone(),
                raw_km,
                index,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeodenseError;
    use geo::Point;

    fn site(id: &str, brand: &str, lon: f64, lat: f64) -> Site {
        Site::new(id, brand, Point::new(lon, lat))
    }

    #[test]
    fn test_builder_rejects_zero_neighbors() {
        let err = PassBuilder::new().neighbors(0).build().unwrap_err();
        assert!(matches!(err, GeodenseError::InvalidParameter(_)));
    }

    #[test]
    fn test_empty_snapshot_fails_fast() {
        let err = DensityPass::new().run(&[]).unwrap_err();
        assert!(matches!(err, GeodenseError::EmptyInput(_)));
    }

    #[test]
    fn test_output_preserves_input_order() {
        let sites = vec![
            site("z", "OKKO", 26.98, 49.42),
            site("a", "WOG", 26.99, 49.43),
            site("m", "UPG", 27.01, 49.41),
        ];
        let scores = DensityPass::new().run(&sites).unwrap();
        let ids: Vec<&str> = scores.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_descriptive_fields_pass_through() {
        let sites = vec![
            site("1", "OKKO", 26.98, 49.42).with_city("Khmelnytskyi"),
            site("2", "WOG", 26.99, 49.43),
        ];
        let scores = DensityPass::new().run(&sites).unwrap();
        assert_eq!(scores[0].city.as_deref(), Some("Khmelnytskyi"));
        assert_eq!(scores[0].brand, "OKKO");
        assert_eq!(scores[1].city, None);
    }

    #[test]
    fn test_repeat_runs_are_bit_identical() {
        let sites: Vec<Site> = (0..40)
            .map(|i| {
                site(
                    &format!("s{}", i),
                    if i % 2 == 0 { "OKKO" } else { "WOG" },
                    26.9 + (i % 7) as f64 * 0.013,
                    49.4 + (i % 5) as f64 * 0.021,
                )
            })
            .collect();

        let pass = PassBuilder::new().neighbors(3).build().unwrap();
        let first = pass.run(&sites).unwrap();
        let second = pass.run(&sites).unwrap();
        assert_eq!(first, second);
    }
}
