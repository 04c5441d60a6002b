//! Error types for density scoring passes.

use thiserror::Error;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, GeodenseError>;

/// Errors raised by a scoring pass.
///
/// Degenerate-but-valid inputs (an isolated site, an all-coincident
/// population, duplicate coordinates) are handled with documented fallback
/// values and never surface here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeodenseError {
    /// An index build or scoring pass was invoked with zero sites.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A pass parameter is outside its valid range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A site carries coordinates or labels the pass cannot score.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Too few joined categories to compute a correlation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}
