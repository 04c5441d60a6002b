//! Per-site competitive density scoring.
//!
//! A raw score is the arithmetic mean of the ground distances from a site to
//! its k nearest competitors. The index ranks candidates in degree space;
//! every kept neighbor is then re-measured with the haversine resolver, so
//! the planar ranking metric never leaks into a reported kilometer value.

use rustc_hash::FxHashMap;

use crate::distance::{ground_distance_km, round_km};
use crate::error::{GeodenseError, Result};
use crate::index::SiteIndex;
use crate::types::{PassConfig, Site};

/// Scores each site of one snapshot by mean competitor distance.
///
/// # Examples
///
/// ```rust
/// use geodense::{DensityScorer, PassConfig, Site};
/// use geo::Point;
///
/// let sites = vec![
///     Site::new("a", "OKKO", Point::new(26.98, 49.42)),
///     Site::new("b", "WOG", Point::new(26.99, 49.43)),
/// ];
/// let scorer = DensityScorer::new(&sites, &PassConfig::default())?;
///
/// // Two sites: each one's only competitor is the other.
/// assert_eq!(scorer.score("a"), scorer.score("b"));
/// # Ok::<(), geodense::GeodenseError>(())
/// ```
#[derive(Debug)]
pub struct DensityScorer<'a> {
    sites: &'a [Site],
    index: SiteIndex,
    positions: FxHashMap<String, usize>,
    neighbors: usize,
    isolated_distance_km: f64,
}

impl<'a> DensityScorer<'a> {
    /// Build a scorer over one immutable snapshot.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when `config.neighbors` is zero, `EmptyInput` or
    /// `InvalidInput` from the index build, and `InvalidInput` when two
    /// sites share an identifier.
    pub fn new(sites: &'a [Site], config: &PassConfig) -> Result<Self> {
        config.validate()?;
        let index = SiteIndex::build(sites)?;

        let mut positions = FxHashMap::default();
        for (position, site) in sites.iter().enumerate() {
            if positions.insert(site.id.clone(), position).is_some() {
                return Err(GeodenseError::InvalidInput(format!(
                    "duplicate site id: {}",
                    site.id
                )));
            }
        }

        Ok(Self {
            sites,
            index,
            positions,
            neighbors: config.neighbors,
            isolated_distance_km: config.isolated_distance_km,
        })
    }

    /// Raw mean competitor distance for the site with `id`, in kilometers
    /// rounded to 3 decimals. `None` for an unknown identifier.
    pub fn score(&self, id: &str) -> Option<f64> {
        self.positions
            .get(id)
            .map(|&position| self.raw_score(position))
    }

    /// Raw scores for every site, in build order.
    pub fn score_all(&self) -> Vec<f64> {
        (0..self.sites.len())
            .map(|position| self.raw_score(position))
            .collect()
    }

    /// Number of sites in the snapshot.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Whether the snapshot is empty; always false for a built scorer.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    fn raw_score(&self, position: usize) -> f64 {
        let site = &self.sites[position];
        let mut hits = self.index.query_k_nearest(&site.location, self.neighbors);

        // Drop at most one zero-distance self-match. With more than k+1
        // mutually coincident sites the query's own entry can be crowded
        // out of the candidate set; every remaining hit is then a true
        // competitor at distance zero and stays in.
        if let Some(self_at) = hits.iter().position(|hit| hit.position == position) {
            hits.remove(self_at);
        }
        hits.truncate(self.neighbors);

        if hits.is_empty() {
            log::debug!(
                "site {} has no competitors, assigning isolated distance {} km",
                site.id,
                self.isolated_distance_km
            );
            return self.isolated_distance_km;
        }

        let total: f64 = hits
            .iter()
            .map(|hit| ground_distance_km(&site.location, &self.sites[hit.position].location))
            .sum();
        round_km(total / hits.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    fn site(id: &str, lon: f64, lat: f64) -> Site {
        Site::new(id, "OKKO", Point::new(lon, lat))
    }

    #[test]
    fn test_rejects_zero_neighbors() {
        let sites = vec![site("1", 26.98, 49.42)];
        let config = PassConfig {
            neighbors: 0,
            ..PassConfig::default()
        };
        let err = DensityScorer::new(&sites, &config).unwrap_err();
        assert!(matches!(err, GeodenseError::InvalidParameter(_)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let sites = vec![site("1", 26.98, 49.42), site("1", 26.99, 49.43)];
        let err = DensityScorer::new(&sites, &PassConfig::default()).unwrap_err();
        assert!(matches!(err, GeodenseError::InvalidInput(_)));
    }

    #[test]
    fn test_single_site_gets_isolated_sentinel() {
        let sites = vec![site("alone", 26.98, 49.42)];
        let scorer = DensityScorer::new(&sites, &PassConfig::default()).unwrap();
        assert_eq!(scorer.score("alone"), Some(999.0));
    }

    #[test]
    fn test_unknown_id_scores_none() {
        let sites = vec![site("1", 26.98, 49.42)];
        let scorer = DensityScorer::new(&sites, &PassConfig::default()).unwrap();
        assert_eq!(scorer.score("nope"), None);
    }

    #[test]
    fn test_small_population_uses_available_neighbors() {
        // Three sites, k = 10: each site scores against the other two.
        let sites = vec![
            site("1", 26.98, 49.42),
            site("2", 26.99, 49.42),
            site("3", 27.00, 49.42),
        ];
        let config = PassConfig {
            neighbors: 10,
            ..PassConfig::default()
        };
        let scorer = DensityScorer::new(&sites, &config).unwrap();

        let d12 = ground_distance_km(&sites[0].location, &sites[1].location);
        let d13 = ground_distance_km(&sites[0].location, &sites[2].location);
        let expected = round_km((d12 + d13) / 2.0);
        assert_eq!(scorer.score("1"), Some(expected));
    }

    #[test]
    fn test_nearest_neighbor_mean_with_k_one() {
        let sites = vec![
            site("query", 26.98, 49.42),
            site("near", 26.99, 49.42),
            site("far", 27.50, 49.42),
        ];
        let config = PassConfig {
            neighbors: 1,
            ..PassConfig::default()
        };
        let scorer = DensityScorer::new(&sites, &config).unwrap();

        let expected = round_km(ground_distance_km(&sites[0].location, &sites[1].location));
        assert_eq!(scorer.score("query"), Some(expected));
    }

    #[test]
    fn test_coincident_competitor_counts_at_distance_zero() {
        // Two sites on the same forecourt plus one remote site. With k = 1
        // each of the coincident pair scores exactly zero.
        let sites = vec![
            site("a", 26.98, 49.42),
            site("b", 26.98, 49.42),
            site("c", 27.50, 49.42),
        ];
        let config = PassConfig {
            neighbors: 1,
            ..PassConfig::default()
        };
        let scorer = DensityScorer::new(&sites, &config).unwrap();

        assert_eq!(scorer.score("a"), Some(0.0));
        assert_eq!(scorer.score("b"), Some(0.0));
        assert!(scorer.score("c").unwrap() > 0.0);
    }

    #[test]
    fn test_self_match_crowded_out_by_coincident_cluster() {
        // Six coincident sites, k = 2. For the last-built site the k+1
        // candidates are all earlier positions, so no self-match is dropped
        // and both kept neighbors sit at distance zero.
        let sites: Vec<Site> = (0..6)
            .map(|i| site(&format!("s{}", i), 26.98, 49.42))
            .collect();
        let config = PassConfig {
            neighbors: 2,
            ..PassConfig::default()
        };
        let scorer = DensityScorer::new(&sites, &config).unwrap();

        assert_eq!(scorer.score("s5"), Some(0.0));
        assert_eq!(scorer.score("s0"), Some(0.0));
    }
}
