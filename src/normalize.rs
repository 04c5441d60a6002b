//! Population-relative normalization of raw density measures.

/// Map raw mean competitor distances onto a `[0, 1]` density index.
///
/// `index = 1 - raw / max_d`, where `max_d` is the maximum raw distance in
/// the population. Smaller distances mean denser competition, so for any
/// two distinct raws the smaller one strictly wins the higher index.
///
/// The isolated-site sentinel participates in `max_d` like any other value:
/// one isolated site inflates the denominator and compresses every other
/// index toward 1, and its own index computes to exactly 0. When every raw
/// is zero (an all-coincident population) the division is skipped and every
/// index is defined as 1.
///
/// # Examples
///
/// ```rust
/// use geodense::density_index;
///
/// let indices = density_index(&[1.0, 2.0, 4.0]);
/// assert_eq!(indices, vec![0.75, 0.5, 0.0]);
///
/// // All-coincident population: maximal density everywhere.
/// assert_eq!(density_index(&[0.0, 0.0]), vec![1.0, 1.0]);
/// ```
pub fn density_index(raw_scores: &[f64]) -> Vec<f64> {
    let max_d = raw_scores.iter().copied().fold(0.0_f64, f64::max);

    if max_d == 0.0 {
        log::debug!("population maximum distance is zero, defining every index as 1.0");
        return vec![1.0; raw_scores.len()];
    }

    raw_scores.iter().map(|raw| 1.0 - raw / max_d).collect()
}
