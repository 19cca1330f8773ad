//! Conformal blocks bundles
//!
//! A bundle is fixed by an algebra, one dominant weight per marked point and
//! a level. Its rank is a fusion multiplicity; its first Chern class is
//! computed with Fakhruddin's formulas, either as a symmetrized divisor in the
//! boundary basis `D_2, ..., D_{n/2}` or as intersection numbers with
//! F-curves.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use rayon::prelude::*;
use std::sync::Arc;

use cblocks_lie::{Algebra, Error, Poly, Result, Weight, WeightPoly};

use crate::fcurve::{combinations, f_curves, FCurve};

/// Common interface of general and symmetric bundles
pub trait ConformalBlocksBundle {
    /// Algebra the weights belong to
    fn algebra(&self) -> &Algebra;

    /// Copies of the weights, one per point
    fn weights(&self) -> Vec<Weight>;

    /// Level of the bundle
    fn level(&self) -> i64;

    /// Number of marked points
    fn points(&self) -> usize;

    /// Rank of the bundle
    fn rank(&self) -> Result<BigInt>;

    /// Symmetrized divisor class in the basis `D_2, ..., D_{n/2}`
    fn symmetrized_divisor(&self) -> Result<Vec<BigRational>>;

    /// Symmetrized divisor scaled to a primitive integer vector
    fn normalized_divisor_ray(&self) -> Result<Vec<BigInt>> {
        Ok(normalize_ray(&self.symmetrized_divisor()?))
    }
}

/// Clear denominators, then divide by the gcd of the entries
///
/// The zero vector is returned unchanged.
pub fn normalize_ray(divisor: &[BigRational]) -> Vec<BigInt> {
    let lcm = divisor
        .iter()
        .fold(BigInt::one(), |acc, q| acc.lcm(q.denom()));
    let scale = BigRational::from_integer(lcm);
    let cleared: Vec<BigInt> = divisor.iter().map(|q| (q * &scale).to_integer()).collect();

    let gcd = cleared.iter().fold(BigInt::zero(), |acc, x| acc.gcd(x));
    if gcd.is_positive() {
        cleared.iter().map(|x| x / &gcd).collect()
    } else {
        cleared
    }
}

/// `2 (ℓ + h∨)` times the killing factor
pub(crate) fn chern_denominator(algebra: &Algebra, level: i64) -> BigRational {
    let denom = 2 * (level + algebra.dual_coxeter_number()) * algebra.killing_factor();
    BigRational::from_integer(BigInt::from(denom))
}

pub(crate) fn validate(algebra: &Algebra, wt: &[i64]) -> Result<()> {
    if wt.len() != algebra.rank() {
        return Err(Error::RankMismatch {
            expected: algebra.rank(),
            got: wt.len(),
        });
    }
    if !algebra.root_system().is_dominant(wt) {
        return Err(Error::NonDominantWeight(wt.to_vec()));
    }
    Ok(())
}

fn factorial(n: usize) -> BigInt {
    (1..=n).fold(BigInt::one(), |acc, k| acc * k)
}

/// A conformal blocks bundle with arbitrary weights
#[derive(Debug, Clone)]
pub struct CBBundle {
    algebra: Arc<Algebra>,
    weights: Vec<Weight>,
    level: i64,
}

impl CBBundle {
    /// Bundle with `weights` at `level`
    ///
    /// Every weight must be dominant and of the algebra's rank, and the level
    /// non-negative. The weights are copied.
    pub fn new<W: AsRef<[i64]>>(algebra: Arc<Algebra>, weights: &[W], level: i64) -> Result<Self> {
        if level < 0 {
            return Err(Error::NegativeLevel(level));
        }
        let weights = weights
            .iter()
            .map(|wt| {
                let wt = wt.as_ref();
                validate(&algebra, wt)?;
                Ok(Weight::from(wt))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            algebra,
            weights,
            level,
        })
    }

    /// Shared handle to the algebra
    pub fn algebra_handle(&self) -> Arc<Algebra> {
        Arc::clone(&self.algebra)
    }

    /// Weight at `point`
    pub fn weight(&self, point: usize) -> Option<&Weight> {
        self.weights.get(point)
    }

    /// Rank by factorization through the largest and smallest representations
    ///
    /// Fuses the two extreme weights, fuses the rest, and pairs the results.
    /// Agrees with [`rank`](ConformalBlocksBundle::rank); cheaper when the
    /// weights have very different dimensions.
    #[tracing::instrument(skip(self), fields(points = self.points(), level = self.level))]
    pub fn factorized_rank(&self) -> Result<BigInt> {
        let n = self.weights.len();
        if n < 3 {
            return self.rank();
        }

        let alg = &self.algebra;
        let mut dims = Vec::with_capacity(n);
        for wt in &self.weights {
            dims.push(alg.repr_dimension(wt)?);
        }
        let (mut min_idx, mut max_idx) = (0, 0);
        for (i, dim) in dims.iter().enumerate() {
            if dim < &dims[min_idx] {
                min_idx = i;
            }
            if dim > &dims[max_idx] {
                max_idx = i;
            }
        }
        if min_idx == max_idx {
            max_idx = min_idx + 1;
        }

        let pair = alg.fusion(self.level, &[&self.weights[min_idx], &self.weights[max_idx]])?;
        let rest: Vec<&Weight> = self
            .weights
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != min_idx && i != max_idx)
            .map(|(_, wt)| wt)
            .collect();
        let rest = alg.fusion(self.level, &rest)?;

        let mut rank = BigInt::zero();
        for (mu_star, mult) in pair.iter() {
            if let Some(other) = rest.get(&alg.dual(&mu_star)?) {
                rank += mult * other;
            }
        }
        Ok(rank)
    }

    /// Every F-curve on this bundle's points
    pub fn f_curves(&self) -> Vec<FCurve> {
        f_curves(self.points())
    }

    /// Degree of the four-point bundle with weights `wts` at this level
    ///
    /// Fakhruddin's formula:
    /// `(rank · Σ c(w_k) - Σ_{pairings} Σ_μ c(μ*) m_ab(μ) m_cd(μ*)) / 2(ℓ + h∨)`.
    pub fn degree(&self, wts: [&[i64]; 4]) -> Result<BigRational> {
        let alg = &self.algebra;
        let level = self.level;
        let rank = alg.cb_rank(level, &wts)?;

        let casimirs: BigInt = wts
            .iter()
            .map(|wt| alg.int_casimir_scalar(wt))
            .sum::<Result<_>>()?;
        let mut numerator = rank * casimirs;
        for (a, b, c, d) in [(0, 1, 2, 3), (0, 2, 1, 3), (0, 3, 1, 2)] {
            let left = alg.fusion_product(level, wts[a], wts[b])?;
            let right = alg.fusion_product(level, wts[c], wts[d])?;
            numerator -= alg.casimir_pairing(&left, &right);
        }

        Ok(BigRational::from_integer(numerator) / chern_denominator(alg, level))
    }

    /// Intersection number of the bundle's first Chern class with `curve`
    ///
    /// Each block is fused to a polynomial; the four-point degree is summed
    /// over every choice of one weight per block, weighted by the four
    /// multiplicities. Choices whose first three weights cannot fuse to the
    /// dual of the fourth contribute nothing and are skipped.
    #[tracing::instrument(skip(self), fields(points = self.points(), level = self.level))]
    pub fn intersect_f_curve(&self, curve: &FCurve) -> Result<BigRational> {
        curve.validate(self.points())?;
        let alg = &self.algebra;
        let level = self.level;

        let products = curve
            .blocks()
            .iter()
            .map(|block| {
                let wts: Vec<&Weight> = block.iter().map(|&p| &self.weights[p]).collect();
                alg.fusion(level, &wts)
            })
            .collect::<Result<Vec<Poly>>>()?;

        let mut total = BigRational::zero();
        for (wt1, m1) in products[0].iter() {
            for (wt2, m2) in products[1].iter() {
                for (wt3, m3) in products[2].iter() {
                    let mu = alg.fusion(level, &[&wt1, &wt2, &wt3])?;
                    for (wt4, m4) in products[3].iter() {
                        if mu.multiplicity(&alg.dual(&wt4)?).is_zero() {
                            continue;
                        }
                        let degree = self.degree([&wt1[..], &wt2[..], &wt3[..], &wt4[..]])?;
                        let weight: BigInt = m1 * m2 * m3 * m4;
                        total += degree * BigRational::from_integer(weight);
                    }
                }
            }
        }
        Ok(total)
    }

    /// Casimir pairing of the fusion of the points in `subset` with the
    /// fusion of the remaining points
    fn split_pairing(&self, subset: &[usize]) -> Result<BigInt> {
        let (inside, outside): (Vec<(usize, &Weight)>, Vec<(usize, &Weight)>) = self
            .weights
            .iter()
            .enumerate()
            .partition(|(i, _)| subset.contains(i));
        let inside: Vec<&Weight> = inside.into_iter().map(|(_, wt)| wt).collect();
        let outside: Vec<&Weight> = outside.into_iter().map(|(_, wt)| wt).collect();

        let alg = &self.algebra;
        let left = alg.fusion(self.level, &inside)?;
        let right = alg.fusion(self.level, &outside)?;
        Ok(alg.casimir_pairing(&left, &right))
    }
}

impl ConformalBlocksBundle for CBBundle {
    fn algebra(&self) -> &Algebra {
        &self.algebra
    }

    fn weights(&self) -> Vec<Weight> {
        self.weights.clone()
    }

    fn level(&self) -> i64 {
        self.level
    }

    fn points(&self) -> usize {
        self.weights.len()
    }

    /// Multiplicity of `dual(w_0)` in the fusion product of the other weights
    #[tracing::instrument(skip(self), fields(points = self.points(), level = self.level))]
    fn rank(&self) -> Result<BigInt> {
        self.algebra.cb_rank(self.level, &self.weights)
    }

    /// Averages the boundary factorization over every `i`-subset of points
    ///
    /// Subsets are evaluated on the rayon pool when the algebra is configured
    /// for parallel work.
    #[tracing::instrument(skip(self), fields(points = self.points(), level = self.level))]
    fn symmetrized_divisor(&self) -> Result<Vec<BigRational>> {
        let n = self.points();
        if n < 2 {
            return Err(Error::TooFewPoints { needed: 2, got: n });
        }
        let alg = &self.algebra;
        let rank = self.rank()?;
        let casimirs: BigInt = self
            .weights
            .iter()
            .map(|wt| alg.int_casimir_scalar(wt))
            .sum::<Result<_>>()?;
        let weighted_rank = BigRational::new(rank * casimirs, BigInt::from(n * (n - 1)));
        let denominator = chern_denominator(alg, self.level);
        let points: Vec<usize> = (0..n).collect();

        let mut divisor = Vec::with_capacity(n / 2);
        for i in 2..=n / 2 {
            let subsets = combinations(&points, i);
            let pairings: Vec<BigInt> = if alg.config().parallel {
                subsets
                    .par_iter()
                    .map(|s| self.split_pairing(s))
                    .collect::<Result<_>>()?
            } else {
                subsets
                    .iter()
                    .map(|s| self.split_pairing(s))
                    .collect::<Result<_>>()?
            };
            let sum: BigInt = pairings.into_iter().sum();
            tracing::debug!(i, subsets = subsets.len(), "summed boundary pairings");

            let averaged = BigRational::new(sum * factorial(i) * factorial(n - i), factorial(n));
            let base = &weighted_rank * BigRational::from_integer(BigInt::from(i * (n - i)));
            divisor.push((base - averaged) / &denominator);
        }
        Ok(divisor)
    }
}
