//! In-memory fuel price aggregation.
//!
//! Price records arrive from an external acquisition layer already keyed by
//! brand; this module reduces them to the per-brand mean that the
//! cross-metric join consumes. No scraping, parsing, or I/O happens here.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Fuel product vocabulary of the price feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    /// Premium 95-octane petrol.
    #[serde(rename = "A-95_plus")]
    A95Plus,
    /// Regular 95-octane petrol.
    #[serde(rename = "A-95")]
    A95,
    /// 92-octane petrol.
    #[serde(rename = "A-92")]
    A92,
    /// Diesel.
    #[serde(rename = "DP")]
    Diesel,
    /// Autogas (LPG).
    #[serde(rename = "GAS")]
    Lpg,
}

/// One observed pump price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Brand the price was observed at.
    pub brand: String,
    /// Fuel product the price applies to.
    pub fuel_type: FuelType,
    /// Price in the feed's currency units.
    pub price: f64,
}

impl PriceRecord {
    /// Construct a price record.
    pub fn new(brand: impl Into<String>, fuel_type: FuelType, price: f64) -> Self {
        Self {
            brand: brand.into(),
            fuel_type,
            price,
        }
    }
}

/// Mean price of one fuel type per brand.
///
/// Brands with no record of the requested fuel type are absent from the
/// result and will drop out of any later inner join against density data.
///
/// # Examples
///
/// ```rust
/// use geodense::{mean_price_by_brand, FuelType, PriceRecord};
///
/// let records = vec![
///     PriceRecord::new("OKKO", FuelType::A95, 58.99),
///     PriceRecord::new("OKKO", FuelType::A95, 59.49),
///     PriceRecord::new("WOG", FuelType::Diesel, 55.90),
/// ];
///
/// let means = mean_price_by_brand(&records, FuelType::A95);
/// assert_eq!(means.len(), 1);
/// assert!((means["OKKO"] - 59.24).abs() < 1e-9);
/// ```
pub fn mean_price_by_brand(records: &[PriceRecord], fuel: FuelType) -> FxHashMap<String, f64> {
    let mut sums: FxHashMap<&str, (f64, usize)> = FxHashMap::default();
    for record in records.iter().filter(|r| r.fuel_type == fuel) {
        let entry = sums.entry(record.brand.as_str()).or_insert((0.0, 0));
        entry.0 += record.price;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(brand, (sum, count))| (brand.to_string(), sum / count as f64))
        .collect()
}
