//! Weights and roots
//!
//! Both are integer vectors whose length equals the algebra rank. A
//! [`Weight`] is written in the fundamental-weight basis; a [`Root`] in the
//! simple-root basis. Neither carries identity beyond its coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Deref, Sub};

/// Integer vector in the weight lattice (fundamental-weight basis)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weight(Vec<i64>);

impl Weight {
    /// Wrap a coordinate vector
    pub fn new(coords: Vec<i64>) -> Self {
        Self(coords)
    }

    /// The zero weight of the given rank
    pub fn zero(rank: usize) -> Self {
        Self(vec![0; rank])
    }

    /// Coordinates in the fundamental-weight basis
    pub fn coords(&self) -> &[i64] {
        &self.0
    }

    /// Consume into the coordinate vector
    pub fn into_inner(self) -> Vec<i64> {
        self.0
    }

    /// True if every coordinate is non-negative
    pub fn is_dominant(&self) -> bool {
        is_dominant(&self.0)
    }

    /// `self + k·other`
    pub fn add_scaled(&self, other: &[i64], k: i64) -> Weight {
        Weight(self.0.iter().zip(other).map(|(a, b)| a + k * b).collect())
    }
}

/// True if every coordinate is non-negative
pub fn is_dominant(wt: &[i64]) -> bool {
    wt.iter().all(|&c| c >= 0)
}

impl Deref for Weight {
    type Target = [i64];

    fn deref(&self) -> &[i64] {
        &self.0
    }
}

impl AsRef<[i64]> for Weight {
    fn as_ref(&self) -> &[i64] {
        &self.0
    }
}

impl From<Vec<i64>> for Weight {
    fn from(coords: Vec<i64>) -> Self {
        Self(coords)
    }
}

impl From<&[i64]> for Weight {
    fn from(coords: &[i64]) -> Self {
        Self(coords.to_vec())
    }
}

impl<const N: usize> From<[i64; N]> for Weight {
    fn from(coords: [i64; N]) -> Self {
        Self(coords.to_vec())
    }
}

impl Add<&[i64]> for &Weight {
    type Output = Weight;

    fn add(self, rhs: &[i64]) -> Weight {
        self.add_scaled(rhs, 1)
    }
}

impl Sub<&[i64]> for &Weight {
    type Output = Weight;

    fn sub(self, rhs: &[i64]) -> Weight {
        self.add_scaled(rhs, -1)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Positive root in the simple-root basis
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Root(Vec<i64>);

impl Root {
    /// Wrap a coordinate vector
    pub fn new(coords: Vec<i64>) -> Self {
        Self(coords)
    }

    /// Coordinates in the simple-root basis
    pub fn coords(&self) -> &[i64] {
        &self.0
    }

    /// Height: the sum of the simple-root coefficients
    pub fn height(&self) -> i64 {
        self.0.iter().sum()
    }
}

impl Deref for Root {
    type Target = [i64];

    fn deref(&self) -> &[i64] {
        &self.0
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Weight::from([1, 2, 0]);
        let b = [0, 1, 3];
        assert_eq!(&a + &b[..], Weight::from([1, 3, 3]));
        assert_eq!(&a - &b[..], Weight::from([1, 1, -3]));
        assert_eq!(a.add_scaled(&b, 2), Weight::from([1, 4, 6]));
    }

    #[test]
    fn test_dominance() {
        assert!(Weight::zero(3).is_dominant());
        assert!(Weight::from([2, 0]).is_dominant());
        assert!(!Weight::from([2, -1]).is_dominant());
    }

    #[test]
    fn test_root_height() {
        assert_eq!(Root::new(vec![0, 1, 1]).height(), 2);
    }

    #[test]
    fn test_serde_transparent() -> crate::Result<()> {
        let wt: Weight = serde_json::from_str("[1,0,2]")?;
        assert_eq!(wt.coords(), &[1, 0, 2]);
        assert_eq!(serde_json::to_string(&wt)?, "[1,0,2]");
        Ok(())
    }
}
