//! Per-brand aggregation and cross-metric analysis.
//!
//! Collapses per-site density indices to brand means and joins them with an
//! externally supplied per-brand metric, typically an average pump price,
//! for correlation analysis.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{GeodenseError, Result};
use crate::types::DensityScore;

/// Mean density index across every site of one brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandDensity {
    /// Brand label.
    pub brand: String,
    /// Mean density index over the brand's sites.
    pub mean_index: f64,
    /// Number of sites the mean covers.
    pub sites: usize,
}

/// One row of the inner join between brand density and an external metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandMetricRow {
    /// Brand label present on both sides of the join.
    pub brand: String,
    /// Mean density index for the brand.
    pub mean_index: f64,
    /// External metric value for the brand (e.g. mean A-95 price).
    pub mean_metric: f64,
}

/// Joined rows plus the correlation over them, when defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossMetricReport {
    /// Inner-joined per-brand rows, sorted by brand.
    pub rows: Vec<BrandMetricRow>,
    /// Pearson coefficient over `rows`; `None` with fewer than two rows.
    pub correlation: Option<f64>,
}

impl CrossMetricReport {
    /// Join per-site scores with a per-brand external metric and attach
    /// the correlation when at least two brands survive the join.
    pub fn build(scores: &[DensityScore], external: &FxHashMap<String, f64>) -> Self {
        let rows = join_brand_metric(scores, external);
        let correlation = pearson_correlation(&rows).ok();
        Self { rows, correlation }
    }
}

/// Mean density index per brand, sorted by brand label for determinism.
pub fn brand_mean_index(scores: &[DensityScore]) -> Vec<BrandDensity> {
    let mut sums: FxHashMap<&str, (f64, usize)> = FxHashMap::default();
    for score in scores {
        let entry = sums.entry(score.brand.as_str()).or_insert((0.0, 0));
        entry.0 += score.index;
        entry.1 += 1;
    }

    let mut out: Vec<BrandDensity> = sums
        .into_iter()
        .map(|(brand, (sum, count))| BrandDensity {
            brand: brand.to_string(),
            mean_index: sum / count as f64,
            sites: count,
        })
        .collect();
    out.sort_by(|a, b| a.brand.cmp(&b.brand));
    out
}

/// Inner join of per-brand mean density with an external per-brand metric.
///
/// Brands present in only one input are dropped: partial data for a brand
/// is not comparable, so no outer join is offered.
pub fn join_brand_metric(
    scores: &[DensityScore],
    external: &FxHashMap<String, f64>,
) -> Vec<BrandMetricRow> {
    brand_mean_index(scores)
        .into_iter()
        .filter_map(|density| {
            external.get(&density.brand).map(|&metric| BrandMetricRow {
                brand: density.brand,
                mean_index: density.mean_index,
                mean_metric: metric,
            })
        })
        .collect()
}

/// Pearson correlation between the density and metric series of `rows`.
///
/// A zero-variance series yields NaN rather than an error; the coefficient
/// is defined, just not informative.
///
/// # Errors
///
/// `InsufficientData` with fewer than two rows, where the coefficient is
/// undefined outright.
pub fn pearson_correlation(rows: &[BrandMetricRow]) -> Result<f64> {
    if rows.len() < 2 {
        return Err(GeodenseError::InsufficientData(format!(
            "correlation needs at least 2 joined brands, got {}",
            rows.len()
        )));
    }

    let n = rows.len() as f64;
    let mean_x = rows.iter().map(|r| r.mean_index).sum::<f64>() / n;
    let mean_y = rows.iter().map(|r| r.mean_metric).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for row in rows {
        let dx = row.mean_index - mean_x;
        let dy = row.mean_metric - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    Ok(cov / (var_x.sqrt() * var_y.sqrt()))
}
