//! Plain computational API
//!
//! Request-shaped entry points for a service layer: every call builds its own
//! algebra, computes, and returns exact values. Integers that do not fit in
//! 64 bits travel as hex text; rationals travel as numerator/denominator
//! pairs.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Num, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use cblocks_lie::{Algebra, EngineConfig, Error, Result, RootSystemKind};

use crate::bundle::{CBBundle, ConformalBlocksBundle};
use crate::symmetric::SymmetricCBBundle;

// ============================================================================
// Big integer text encoding
// ============================================================================

/// Decimal when the value fits in an `i64`, `0x`-prefixed hex otherwise
pub fn encode_big_int(value: &BigInt) -> String {
    if value.to_i64().is_some() {
        return value.to_string();
    }
    let hex = value.magnitude().to_str_radix(16);
    if value.sign() == num_bigint::Sign::Minus {
        format!("-0x{hex}")
    } else {
        format!("0x{hex}")
    }
}

/// Parse the output of [`encode_big_int`]
pub fn decode_big_int(text: &str) -> Result<BigInt> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let parsed = match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        Some(hex) => BigInt::from_str_radix(hex, 16),
        None => BigInt::from_str_radix(body, 10),
    };
    let magnitude = parsed.map_err(|e| Error::Encoding(format!("{text:?}: {e}")))?;
    Ok(if negative { -magnitude } else { magnitude })
}

mod big_int_text {
    use super::{decode_big_int, encode_big_int};
    use num_bigint::BigInt;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_big_int(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<BigInt, D::Error> {
        let text = String::deserialize(deserializer)?;
        decode_big_int(&text).map_err(D::Error::custom)
    }
}

/// An exact rational as a numerator/denominator pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RationalPair {
    /// Numerator
    #[serde(with = "big_int_text")]
    pub numerator: BigInt,
    /// Denominator, always positive
    #[serde(with = "big_int_text")]
    pub denominator: BigInt,
}

impl RationalPair {
    /// Back to an exact rational
    pub fn to_rational(&self) -> Result<BigRational> {
        if self.denominator.is_zero() {
            return Err(Error::Encoding(format!("zero denominator in {}/0", self.numerator)));
        }
        Ok(BigRational::new(self.numerator.clone(), self.denominator.clone()))
    }
}

impl From<&BigRational> for RationalPair {
    fn from(q: &BigRational) -> Self {
        Self {
            numerator: q.numer().clone(),
            denominator: q.denom().clone(),
        }
    }
}

// ============================================================================
// Requests and replies
// ============================================================================

/// Rank request for a bundle with arbitrary weights
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankRequest {
    /// Cartan type
    pub kind: RootSystemKind,
    /// Rank of the algebra
    pub rank: usize,
    /// Level
    pub level: i64,
    /// One weight per point
    pub weights: Vec<Vec<i64>>,
}

/// Request for a bundle with one weight repeated at every point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymmetricRequest {
    /// Cartan type
    pub kind: RootSystemKind,
    /// Rank of the algebra
    pub rank: usize,
    /// Level
    pub level: i64,
    /// The repeated weight
    pub weight: Vec<i64>,
    /// Number of points
    pub num_points: usize,
}

/// An exact integer result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntReply {
    /// The value
    #[serde(with = "big_int_text")]
    pub value: BigInt,
}

/// An exact rational vector result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorReply {
    /// Coordinates
    pub coords: Vec<RationalPair>,
}

impl RankRequest {
    /// Evaluate with the default engine configuration
    pub fn handle(&self) -> Result<IntReply> {
        let value = compute_rank(self.kind, self.rank, self.level, &self.weights)?;
        Ok(IntReply { value })
    }
}

impl SymmetricRequest {
    /// Rank of the symmetric bundle
    pub fn handle_rank(&self) -> Result<IntReply> {
        let value = compute_symmetric_rank(self.kind, self.rank, self.level, &self.weight, self.num_points)?;
        Ok(IntReply { value })
    }

    /// Symmetrized divisor of the symmetric bundle
    pub fn handle_divisor(&self) -> Result<VectorReply> {
        let coords = compute_symmetric_divisor(self.kind, self.rank, self.level, &self.weight, self.num_points)?;
        Ok(VectorReply { coords })
    }
}

// ============================================================================
// Entry points
// ============================================================================

fn algebra(kind: RootSystemKind, rank: usize) -> Result<Arc<Algebra>> {
    Ok(Arc::new(Algebra::from_kind(kind, rank, EngineConfig::default())?))
}

/// Rank of the bundle with `weights` at `level`
#[tracing::instrument(skip(weights), fields(points = weights.len()))]
pub fn compute_rank<W: AsRef<[i64]>>(kind: RootSystemKind, rank: usize, level: i64, weights: &[W]) -> Result<BigInt> {
    CBBundle::new(algebra(kind, rank)?, weights, level)?.rank()
}

/// Rank of the bundle with `weight` at each of `num_points` points
#[tracing::instrument]
pub fn compute_symmetric_rank(
    kind: RootSystemKind,
    rank: usize,
    level: i64,
    weight: &[i64],
    num_points: usize,
) -> Result<BigInt> {
    SymmetricCBBundle::new(algebra(kind, rank)?, weight, level, num_points)?.rank()
}

/// Symmetrized divisor of the bundle with `weight` at each of `num_points`
/// points
#[tracing::instrument]
pub fn compute_symmetric_divisor(
    kind: RootSystemKind,
    rank: usize,
    level: i64,
    weight: &[i64],
    num_points: usize,
) -> Result<Vec<RationalPair>> {
    let divisor = SymmetricCBBundle::new(algebra(kind, rank)?, weight, level, num_points)?.symmetrized_divisor()?;
    Ok(divisor.iter().map(RationalPair::from).collect())
}
