//! Ground-truth distance resolution.
//!
//! The spatial index ranks candidates with planar Euclidean distance on raw
//! degrees, which is cheap but anisotropic: a degree of longitude shrinks
//! toward the poles. Every distance that leaves this crate is therefore
//! recomputed here as a great-circle distance, and the index metric is never
//! reported in kilometers.

use geo::{Distance, Haversine, Point};

/// Great-circle distance between two points, in kilometers.
///
/// Haversine formula on the geo crate's mean Earth radius. Symmetric, and
/// zero exactly when both inputs carry identical coordinates.
///
/// # Examples
///
/// ```rust
/// use geodense::ground_distance_km;
/// use geo::Point;
///
/// let nyc = Point::new(-74.0060, 40.7128);
/// let london = Point::new(-0.1278, 51.5074);
///
/// let km = ground_distance_km(&nyc, &london);
/// assert!((km - 5570.0).abs() < 10.0);
/// ```
pub fn ground_distance_km(a: &Point<f64>, b: &Point<f64>) -> f64 {
    Haversine.distance(*a, *b) / 1000.0
}

/// Planar Euclidean distance on raw degrees.
///
/// Candidate ranking only; matches the metric the R-tree queries with.
pub(crate) fn degree_distance(a: &Point<f64>, b: &Point<f64>) -> f64 {
    let dx = a.x() - b.x();
    let dy = a.y() - b.y();
    (dx * dx + dy * dy).sqrt()
}

/// Round a kilometer value to the 3 decimal places used at the output
/// boundary. Raw scores are rounded before normalization so the reported
/// distance and the index stay consistent with each other.
pub(crate) fn round_km(km: f64) -> f64 {
    (km * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric() {
        let a = Point::new(26.9871, 49.4216);
        let b = Point::new(24.0297, 49.8397);
        assert_eq!(ground_distance_km(&a, &b), ground_distance_km(&b, &a));
    }

    #[test]
    fn test_zero_for_identical_points() {
        let a = Point::new(26.9871, 49.4216);
        assert_eq!(ground_distance_km(&a, &a), 0.0);
    }

    #[test]
    fn test_known_distance() {
        // Kyiv to Lviv, roughly 470 km on the ground.
        let kyiv = Point::new(30.5234, 50.4501);
        let lviv = Point::new(24.0297, 49.8397);
        let km = ground_distance_km(&kyiv, &lviv);
        assert!((km - 468.0).abs() < 5.0, "got {}", km);
    }

    #[test]
    fn test_degree_metric_is_not_ground_distance() {
        // One degree of longitude at 60N spans half the ground distance of
        // one degree of latitude, but the planar metric cannot tell them
        // apart.
        let origin = Point::new(0.0, 60.0);
        let east = Point::new(1.0, 60.0);
        let north = Point::new(0.0, 61.0);

        assert_eq!(degree_distance(&origin, &east), degree_distance(&origin, &north));
        let east_km = ground_distance_km(&origin, &east);
        let north_km = ground_distance_km(&origin, &north);
        assert!(east_km < 0.6 * north_km, "{} vs {}", east_km, north_km);
    }

    #[test]
    fn test_round_km() {
        assert_eq!(round_km(1.23456), 1.235);
        assert_eq!(round_km(999.0), 999.0);
        assert_eq!(round_km(0.0), 0.0);
    }
}
