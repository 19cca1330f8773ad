//! Symmetric conformal blocks bundles
//!
//! When every point carries the same weight `λ`, all fusion products that
//! appear are powers of `λ`. The powers are computed once per call, and the
//! sum over `i`-subsets in the divisor collapses to a single pairing of
//! `λ^i` with `λ^(n-i)`:
//!
//! ```text
//! D_i = (i(n-i)·rank·c(λ)/(n-1) - Σ_μ c(μ*)·m_{λ^i}(μ)·m_{λ^(n-i)}(μ*)) / 2(ℓ + h∨)
//! ```

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};
use std::sync::Arc;

use cblocks_lie::{Algebra, Error, Poly, Result, Weight, WeightPoly};

use crate::bundle::{chern_denominator, CBBundle, ConformalBlocksBundle};
use crate::fcurve::{sym_f_curves, FCurve};

/// A conformal blocks bundle with the same weight at every point
#[derive(Debug, Clone)]
pub struct SymmetricCBBundle {
    bundle: CBBundle,
    weight: Weight,
}

impl SymmetricCBBundle {
    /// Bundle with `weight` repeated at `points` points
    pub fn new(algebra: Arc<Algebra>, weight: &[i64], level: i64, points: usize) -> Result<Self> {
        let bundle = CBBundle::new(algebra, &vec![weight; points], level)?;
        crate::bundle::validate(bundle.algebra(), weight)?;
        Ok(Self {
            bundle,
            weight: Weight::from(weight),
        })
    }

    /// The repeated weight
    pub fn weight(&self) -> &Weight {
        &self.weight
    }

    /// The same bundle viewed as a general one
    pub fn bundle(&self) -> &CBBundle {
        &self.bundle
    }

    /// F-curves on this bundle's points up to permutation
    pub fn sym_f_curves(&self) -> Vec<FCurve> {
        sym_f_curves(self.points())
    }

    /// Intersection number with an F-curve
    pub fn intersect_f_curve(&self, curve: &FCurve) -> Result<BigRational> {
        self.bundle.intersect_f_curve(curve)
    }

    /// Fusion powers `λ^1, ..., λ^(n-1)`
    fn powers(&self) -> Result<Vec<Poly>> {
        let n = self.points();
        self.algebra()
            .fusion_powers(self.level(), &self.weight, n.saturating_sub(1))
    }

    fn rank_from(&self, powers: &[Poly]) -> Result<BigInt> {
        let dual = self.algebra().dual(&self.weight)?;
        Ok(match powers.last() {
            Some(power) => power.multiplicity(&dual),
            None if dual.iter().all(|&c| c == 0) => BigInt::one(),
            None => BigInt::zero(),
        })
    }
}

impl ConformalBlocksBundle for SymmetricCBBundle {
    fn algebra(&self) -> &Algebra {
        self.bundle.algebra()
    }

    fn weights(&self) -> Vec<Weight> {
        self.bundle.weights()
    }

    fn level(&self) -> i64 {
        self.bundle.level()
    }

    fn points(&self) -> usize {
        self.bundle.points()
    }

    /// Multiplicity of `dual(λ)` in `λ^(n-1)`
    #[tracing::instrument(skip(self), fields(points = self.points(), weight = %self.weight))]
    fn rank(&self) -> Result<BigInt> {
        let n = self.points();
        if n == 0 {
            return Err(Error::TooFewPoints { needed: 1, got: 0 });
        }
        self.rank_from(&self.powers()?)
    }

    /// Closed-form divisor; requires an even number of points
    #[tracing::instrument(skip(self), fields(points = self.points(), weight = %self.weight))]
    fn symmetrized_divisor(&self) -> Result<Vec<BigRational>> {
        let n = self.points();
        if n < 2 {
            return Err(Error::TooFewPoints { needed: 2, got: n });
        }
        if n % 2 == 1 {
            return Err(Error::OddPointCount(n));
        }

        let alg = self.algebra();
        let powers = self.powers()?;
        let rank = self.rank_from(&powers)?;
        let base = rank * alg.int_casimir_scalar(&self.weight)?;
        let denominator = chern_denominator(alg, self.level());

        let divisor: Vec<BigRational> = (2..=n / 2)
            .map(|i| {
                let scaled = BigRational::new(&base * BigInt::from(i * (n - i)), BigInt::from(n - 1));
                let pairing = alg.casimir_pairing(&powers[i - 1], &powers[n - i - 1]);
                (scaled - BigRational::from_integer(pairing)) / &denominator
            })
            .collect();

        tracing::debug!(coords = divisor.len(), "symmetrized divisor");
        Ok(divisor)
    }
}
