//! Error types for cblocks-lie

use num_bigint::BigInt;
use thiserror::Error;

/// Result type alias for cblocks-lie operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while computing with weights, characters and bundles
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Weight length does not match the algebra rank
    #[error("Rank mismatch: expected a weight of length {expected}, got {got}")]
    RankMismatch {
        /// Rank of the algebra
        expected: usize,
        /// Length of the offending weight
        got: usize,
    },

    /// A highest weight had a negative coordinate
    #[error("Weight is not dominant: {0:?}")]
    NonDominantWeight(Vec<i64>),

    /// Level must be non-negative
    #[error("Negative level: {0}")]
    NegativeLevel(i64),

    /// Algebra rank must be at least 1
    #[error("Invalid rank: {0} (must be at least 1)")]
    InvalidRank(usize),

    /// A product was requested over no factors
    #[error("Empty factor list: at least one factor is required")]
    EmptyFactorList,

    /// Not enough marked points for the requested operation
    #[error("Too few points: needed at least {needed}, got {got}")]
    TooFewPoints {
        /// Minimum number of points
        needed: usize,
        /// Number of points supplied
        got: usize,
    },

    /// The symmetric divisor formula is only defined for an even number of points
    #[error("Odd point count {0}: the symmetric divisor requires an even number of points")]
    OddPointCount(usize),

    /// Freudenthal denominator vanished
    #[error("Zero Freudenthal denominator at weight {weight:?}")]
    ZeroDenominator {
        /// Dominant weight whose multiplicity was being computed
        weight: Vec<i64>,
    },

    /// An exact division left a remainder
    #[error("Inexact division: {numerator} / {denominator}")]
    InexactDivision {
        /// Dividend
        numerator: BigInt,
        /// Divisor
        denominator: BigInt,
    },

    /// Affine Weyl folding did not reach the fundamental alcove
    #[error("Alcove folding exceeded {limit} iterations")]
    AlcoveFoldLimit {
        /// Iteration cap that was hit
        limit: usize,
    },

    /// Alcove folding needs a positive width
    #[error("Invalid alcove width: {0} (must be positive)")]
    InvalidAlcoveWidth(i64),

    /// A point partition was malformed
    #[error("Invalid partition: {0}")]
    InvalidPartition(String),

    /// Root system kind is not implemented
    #[error("Unsupported root system: {0}")]
    UnsupportedRootSystem(String),

    /// A number could not be decoded from its text form
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Config(e.to_string())
    }
}
