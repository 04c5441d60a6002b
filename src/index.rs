//! Spatial index over one pass's site snapshot.
//!
//! The index answers k-nearest-neighbor queries in O(log n) average time
//! through an R*-tree. It ranks candidates with planar Euclidean distance on
//! raw degrees; callers resolve every reported neighbor through
//! [`crate::distance::ground_distance_km`] before a distance reaches any
//! output.

use geo::Point;
use rstar::{Point as RstarPoint, RTree};
use smallvec::SmallVec;

use crate::distance::degree_distance;
use crate::error::{GeodenseError, Result};
use crate::types::Site;
use crate::validation::validate_site;

/// An index entry: a coordinate pair plus the build position of its site.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedSite {
    /// X coordinate (longitude)
    pub x: f64,
    /// Y coordinate (latitude)
    pub y: f64,
    /// Position of the site in the slice the index was built from.
    pub position: usize,
}

impl RstarPoint for IndexedSite {
    type Scalar = f64;
    const DIMENSIONS: usize = 2;

    fn generate(mut generator: impl FnMut(usize) -> Self::Scalar) -> Self {
        Self {
            x: generator(0),
            y: generator(1),
            position: usize::MAX,
        }
    }

    fn nth(&self, index: usize) -> Self::Scalar {
        match index {
            0 => self.x,
            1 => self.y,
            _ => unreachable!(),
        }
    }

    fn nth_mut(&mut self, index: usize) -> &mut Self::Scalar {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => unreachable!(),
        }
    }
}

/// A k-NN candidate returned by [`SiteIndex::query_k_nearest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborHit {
    /// Build position of the candidate site.
    pub position: usize,
    /// Euclidean distance in raw degrees. Ranking only; never report this
    /// as a ground distance.
    pub degree_distance: f64,
}

/// Inline hit buffer sized for the usual small k.
pub type NeighborHits = SmallVec<[NeighborHit; 8]>;

/// Read-only spatial index over one immutable site snapshot.
///
/// Each entry carries the build position of its site, and a position-to-id
/// table is kept alongside the tree, so neighbor results always resolve to
/// the right site even if the caller filters or reorders its own collection
/// later.
///
/// # Examples
///
/// ```rust
/// use geodense::{Site, SiteIndex};
/// use geo::Point;
///
/// let sites = vec![
///     Site::new("a", "OKKO", Point::new(26.98, 49.42)),
///     Site::new("b", "WOG", Point::new(26.99, 49.43)),
/// ];
/// let index = SiteIndex::build(&sites)?;
///
/// let hits = index.query_k_nearest(&sites[0].location, 1);
/// assert_eq!(hits.len(), 2); // the site itself plus one neighbor
/// assert_eq!(hits[0].position, 0);
/// assert_eq!(hits[0].degree_distance, 0.0);
/// # Ok::<(), geodense::GeodenseError>(())
/// ```
#[derive(Debug)]
pub struct SiteIndex {
    tree: RTree<IndexedSite>,
    ids: Vec<String>,
}

impl SiteIndex {
    /// Build an index over `sites`.
    ///
    /// # Errors
    ///
    /// `EmptyInput` for an empty slice, `InvalidInput` for a site with
    /// out-of-range or non-finite coordinates or an empty brand label.
    pub fn build(sites: &[Site]) -> Result<Self> {
        if sites.is_empty() {
            return Err(GeodenseError::EmptyInput(
                "cannot build a spatial index over zero sites".to_string(),
            ));
        }

        for site in sites {
            validate_site(site)?;
        }

        let entries: Vec<IndexedSite> = sites
            .iter()
            .enumerate()
            .map(|(position, site)| IndexedSite {
                x: site.location.x(),
                y: site.location.y(),
                position,
            })
            .collect();

        let tree = RTree::bulk_load(entries);
        log::debug!("built spatial index over {} sites", sites.len());

        Ok(Self {
            tree,
            ids: sites.iter().map(|site| site.id.clone()).collect(),
        })
    }

    /// Number of indexed sites.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always false for a built index; present for container conventions.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifier of the site at a build position.
    pub fn id_at(&self, position: usize) -> Option<&str> {
        self.ids.get(position).map(String::as_str)
    }

    /// Up to k+1 nearest entries for `point`, ascending by ranking
    /// distance.
    ///
    /// When `point` is a member of the index it appears in the result at
    /// distance zero. Fewer than k+1 indexed sites means every site is
    /// returned. Coincident duplicates are distinct hits; the index never
    /// deduplicates.
    ///
    /// Ties are deterministic: the whole tie group at the cut boundary is
    /// gathered before truncation and equal distances resolve by build
    /// position, first inserted winning.
    pub fn query_k_nearest(&self, point: &Point<f64>, k: usize) -> NeighborHits {
        let wanted = k.saturating_add(1).min(self.len());
        let query = IndexedSite {
            x: point.x(),
            y: point.y(),
            position: usize::MAX,
        };

        // The iterator yields entries in ascending distance order; keep
        // pulling past `wanted` while candidates remain tied with the cut
        // distance so truncation cannot pick an arbitrary member of the
        // tie group.
        let mut hits: NeighborHits = SmallVec::new();
        for entry in self.tree.nearest_neighbor_iter(&query) {
            let d = degree_distance(point, &Point::new(entry.x, entry.y));
            if hits.len() >= wanted && d > hits[hits.len() - 1].degree_distance {
                break;
            }
            hits.push(NeighborHit {
                position: entry.position,
                degree_distance: d,
            });
        }

        hits.sort_by(|a, b| {
            a.degree_distance
                .partial_cmp(&b.degree_distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.position.cmp(&b.position))
        });
        hits.truncate(wanted);
        hits
    }
}
