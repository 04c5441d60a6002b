//! Validation for site coordinates and labels.

use geo::Point;

use crate::error::{GeodenseError, Result};
use crate::types::Site;

/// Validates a location has a usable longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use geodense::validation::validate_location;
/// use geo::Point;
///
/// // Valid point
/// let khmelnytskyi = Point::new(26.9871, 49.4216);
/// assert!(validate_location(&khmelnytskyi).is_ok());
///
/// // Invalid longitude
/// let invalid = Point::new(200.0, 49.0);
/// assert!(validate_location(&invalid).is_err());
///
/// // Invalid latitude
/// let invalid = Point::new(26.0, 95.0);
/// assert!(validate_location(&invalid).is_err());
/// ```
pub fn validate_location(point: &Point<f64>) -> Result<()> {
    let (x, y) = (point.x(), point.y());

    if !x.is_finite() {
        return Err(GeodenseError::InvalidInput(format!(
            "Longitude must be finite, got: {}",
            x
        )));
    }

    if !y.is_finite() {
        return Err(GeodenseError::InvalidInput(format!(
            "Latitude must be finite, got: {}",
            y
        )));
    }

    if !(-180.0..=180.0).contains(&x) {
        return Err(GeodenseError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            x
        )));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(GeodenseError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            y
        )));
    }

    Ok(())
}

/// Validates a site is scoreable: usable coordinates, non-empty brand.
pub(crate) fn validate_site(site: &Site) -> Result<()> {
    validate_location(&site.location).map_err(|e| match e {
        GeodenseError::InvalidInput(msg) => {
            GeodenseError::InvalidInput(format!("site {}: {}", site.id, msg))
        }
        other => other,
    })?;

    if site.brand.is_empty() {
        return Err(GeodenseError::InvalidInput(format!(
            "site {}: brand label must be non-empty",
            site.id
        )));
    }

    Ok(())
}
