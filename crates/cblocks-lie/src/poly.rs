//! Weight polynomials
//!
//! A weight polynomial is a finite formal sum `Σ m_μ · e^μ` over the weight
//! lattice with arbitrary-precision integer coefficients. Characters, tensor
//! decompositions and fusion rules are all weight polynomials.
//!
//! Reading and building are separate capabilities:
//!
//! - [`WeightPoly`] is the read view. A bare [`Weight`] is the one-term
//!   polynomial `e^λ`, and a finished [`Poly`] is the general case.
//! - [`PolyBuilder`] is the only mutable form. [`PolyBuilder::build`] drops
//!   zero coefficients and freezes the result.

use num_bigint::BigInt;
use num_traits::{One, Zero};
use std::fmt;

use crate::vectormap::VectorMap;
use crate::weight::Weight;

/// Read access to a weight polynomial
pub trait WeightPoly {
    /// Weights with nonzero multiplicity
    fn weights(&self) -> Vec<Weight>;

    /// Multiplicity of `wt`; zero if absent
    fn multiplicity(&self, wt: &[i64]) -> BigInt;

    /// `(weight, multiplicity)` pairs with nonzero multiplicity
    fn terms(&self) -> Vec<(Weight, BigInt)> {
        self.weights()
            .into_iter()
            .map(|wt| {
                let mult = self.multiplicity(&wt);
                (wt, mult)
            })
            .collect()
    }
}

impl WeightPoly for Weight {
    fn weights(&self) -> Vec<Weight> {
        vec![self.clone()]
    }

    fn multiplicity(&self, wt: &[i64]) -> BigInt {
        if self.coords() == wt {
            BigInt::one()
        } else {
            BigInt::zero()
        }
    }
}

/// Immutable weight polynomial with no zero coefficients
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Poly {
    terms: VectorMap<BigInt>,
}

impl Poly {
    /// The zero polynomial
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy any weight polynomial into an owned [`Poly`]
    pub fn from_poly<P: WeightPoly + ?Sized>(poly: &P) -> Self {
        let mut builder = PolyBuilder::new();
        builder.add(poly);
        builder.build()
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True for the zero polynomial
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Borrow the multiplicity of `wt`, if nonzero
    pub fn get(&self, wt: &[i64]) -> Option<&BigInt> {
        self.terms.get(wt)
    }

    /// Iterate over `(weight, multiplicity)` pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (Weight, &BigInt)> + '_ {
        self.terms.iter().map(|(key, mult)| (Weight::new(key), mult))
    }

    /// Terms sorted by weight
    pub fn sorted_terms(&self) -> Vec<(Weight, BigInt)> {
        let mut terms = self.terms();
        terms.sort_by(|a, b| a.0.cmp(&b.0));
        terms
    }

    /// Sum of all multiplicities
    pub fn total(&self) -> BigInt {
        self.terms.iter().map(|(_, mult)| mult).sum()
    }

    /// Reopen for further accumulation
    pub fn into_builder(self) -> PolyBuilder {
        PolyBuilder { terms: self.terms }
    }
}

impl WeightPoly for Poly {
    fn weights(&self) -> Vec<Weight> {
        self.terms.keys().into_iter().map(Weight::new).collect()
    }

    fn multiplicity(&self, wt: &[i64]) -> BigInt {
        self.terms.get(wt).cloned().unwrap_or_default()
    }

    fn terms(&self) -> Vec<(Weight, BigInt)> {
        self.iter().map(|(wt, mult)| (wt, mult.clone())).collect()
    }
}

impl<K: AsRef<[i64]>, C: Into<BigInt>> FromIterator<(K, C)> for Poly {
    fn from_iter<I: IntoIterator<Item = (K, C)>>(iter: I) -> Self {
        let mut builder = PolyBuilder::new();
        for (wt, coeff) in iter {
            builder.add_monomial(wt.as_ref(), coeff.into());
        }
        builder.build()
    }
}

impl fmt::Debug for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.sorted_terms().into_iter().map(|(wt, m)| (wt.into_inner(), m)))
            .finish()
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "0");
        }
        for (i, (wt, mult)) in self.sorted_terms().into_iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}·{}", mult, wt)?;
        }
        Ok(())
    }
}

/// Mutable accumulator for a weight polynomial
#[derive(Debug, Clone, Default)]
pub struct PolyBuilder {
    terms: VectorMap<BigInt>,
}

impl PolyBuilder {
    /// Empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the coefficient of `wt`, replacing any previous value
    pub fn set_monomial(&mut self, wt: &[i64], value: BigInt) {
        self.terms.put(wt, value);
    }

    /// Add `value` to the coefficient of `wt`
    pub fn add_monomial(&mut self, wt: &[i64], value: BigInt) {
        *self.terms.get_or_insert_with(wt, BigInt::zero) += value;
    }

    /// Add every term of `poly`
    pub fn add<P: WeightPoly + ?Sized>(&mut self, poly: &P) {
        for (wt, mult) in poly.terms() {
            self.add_monomial(&wt, mult);
        }
    }

    /// Add `scalar` times every term of `poly`
    pub fn add_scaled(&mut self, poly: &Poly, scalar: &BigInt) {
        for (wt, mult) in poly.iter() {
            self.add_monomial(&wt, mult * scalar);
        }
    }

    /// Multiply every coefficient by `scalar`
    pub fn scale(&mut self, scalar: &BigInt) {
        self.terms.retain(|_, mult| {
            *mult *= scalar;
            true
        });
    }

    /// Current coefficient of `wt`, including transient zeros
    pub fn multiplicity(&self, wt: &[i64]) -> BigInt {
        self.terms.get(wt).cloned().unwrap_or_default()
    }

    /// Drop zero coefficients and freeze
    pub fn build(mut self) -> Poly {
        self.terms.retain(|_, mult| !mult.is_zero());
        Poly { terms: self.terms }
    }
}
