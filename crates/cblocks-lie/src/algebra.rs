//! Representation engine
//!
//! [`Algebra`] pairs a shared [`RootSystem`] with an [`EngineConfig`] and
//! exposes the exact representation theory built on it:
//!
//! - Weyl dimension formula ([`repr_dimension`](Algebra::repr_dimension))
//! - Freudenthal multiplicities ([`dominant_char`](Algebra::dominant_char),
//!   see `freudenthal.rs`)
//! - Tensor and fusion decompositions ([`tensor_product`](Algebra::tensor_product),
//!   [`fusion_product`](Algebra::fusion_product), see `decompose.rs`)
//! - Multi-factor products through the [`ProductReducer`]
//! - Casimir-weighted pairings of fusion products
//!
//! All results are exact. Any division that should be exact but is not is an
//! error, never a truncation.

use ahash::HashMap;
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Zero};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;

use crate::config::{EngineConfig, MemoScope};
use crate::poly::{Poly, WeightPoly};
use crate::product::{ProductMemo, ProductReducer};
use crate::rootsystem::{RootSystem, RootSystemKind, TypeA};
use crate::vectormap::VectorMap;
use crate::weight::Weight;
use crate::{Error, Result};

/// Exact quotient, failing on a nonzero remainder
pub(crate) fn exact_div(numerator: BigInt, denominator: &BigInt) -> Result<BigInt> {
    if denominator.is_zero() {
        return Err(Error::InexactDivision {
            numerator,
            denominator: denominator.clone(),
        });
    }
    let (quotient, remainder) = numerator.div_rem(denominator);
    if !remainder.is_zero() {
        return Err(Error::InexactDivision {
            numerator,
            denominator: denominator.clone(),
        });
    }
    Ok(quotient)
}

/// A simple Lie algebra and its representation theory
pub struct Algebra {
    root_system: Arc<dyn RootSystem>,
    config: EngineConfig,
    dimensions: RwLock<VectorMap<BigInt>>,
    shared_memos: Mutex<HashMap<i64, Arc<ProductMemo>>>,
}

impl fmt::Debug for Algebra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Algebra")
            .field("root_system", &self.root_system)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Algebra {
    /// Algebra over `root_system` with the default configuration
    pub fn new(root_system: Arc<dyn RootSystem>) -> Self {
        Self::with_config(root_system, EngineConfig::default())
    }

    /// Algebra over `root_system` with an explicit configuration
    pub fn with_config(root_system: Arc<dyn RootSystem>, config: EngineConfig) -> Self {
        Self {
            root_system,
            config,
            dimensions: RwLock::new(VectorMap::new()),
            shared_memos: Mutex::new(HashMap::default()),
        }
    }

    /// `sl(rank + 1)` with the default configuration
    pub fn type_a(rank: usize) -> Result<Self> {
        Self::from_kind(RootSystemKind::A, rank, EngineConfig::default())
    }

    /// Build the root system of `kind` and `rank` and wrap it
    pub fn from_kind(kind: RootSystemKind, rank: usize, config: EngineConfig) -> Result<Self> {
        let root_system: Arc<dyn RootSystem> = match kind {
            RootSystemKind::A => Arc::new(TypeA::new(rank)?.with_fold_slack(config.alcove_fold_slack)),
        };
        Ok(Self::with_config(root_system, config))
    }

    /// Underlying root system
    pub fn root_system(&self) -> &dyn RootSystem {
        self.root_system.as_ref()
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rank of the algebra
    pub fn rank(&self) -> usize {
        self.root_system.rank()
    }

    /// Dual Coxeter number
    pub fn dual_coxeter_number(&self) -> i64 {
        self.root_system.dual_coxeter_number()
    }

    /// Killing factor
    pub fn killing_factor(&self) -> i64 {
        self.root_system.killing_factor()
    }

    /// Level of a weight
    pub fn level(&self, wt: &[i64]) -> Result<i64> {
        self.check_weight(wt)?;
        Ok(self.root_system.level(wt))
    }

    /// Highest weight of the dual representation
    pub fn dual(&self, wt: &[i64]) -> Result<Weight> {
        self.check_weight(wt)?;
        Ok(self.root_system.dual(wt))
    }

    /// All dominant weights of level at most `level`
    pub fn weights(&self, level: i64) -> Vec<Weight> {
        self.root_system.weights(level)
    }

    pub(crate) fn check_weight(&self, wt: &[i64]) -> Result<()> {
        if wt.len() != self.rank() {
            return Err(Error::RankMismatch {
                expected: self.rank(),
                got: wt.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn check_dominant(&self, wt: &[i64]) -> Result<()> {
        self.check_weight(wt)?;
        if !self.root_system.is_dominant(wt) {
            return Err(Error::NonDominantWeight(wt.to_vec()));
        }
        Ok(())
    }

    pub(crate) fn check_level(level: i64) -> Result<()> {
        if level < 0 {
            return Err(Error::NegativeLevel(level));
        }
        Ok(())
    }

    // ========================================================================
    // Dimensions and Casimir scalars
    // ========================================================================

    /// Dimension of the irreducible representation with highest weight `wt`
    ///
    /// Weyl's formula `Π_α (λ+ρ, α) / (ρ, α)`, evaluated as one exact
    /// division of integer Killing products. Results are cached per algebra.
    pub fn repr_dimension(&self, wt: &[i64]) -> Result<BigInt> {
        self.check_dominant(wt)?;
        if let Some(dim) = self.dimensions.read().get(wt) {
            return Ok(dim.clone());
        }

        let rs = self.root_system();
        let rho = rs.rho();
        let mut numerator = BigInt::one();
        let mut denominator = BigInt::one();
        for root in rs.positive_roots() {
            let alpha = rs.convert_root(root);
            let rho_alpha = rs.int_killing_form(&rho, &alpha);
            numerator *= rs.int_killing_form(wt, &alpha) + rho_alpha;
            denominator *= rho_alpha;
        }
        let dim = exact_div(numerator, &denominator)?;

        self.dimensions.write().put(wt, dim.clone());
        Ok(dim)
    }

    /// Casimir scalar scaled by the killing factor
    pub fn int_casimir_scalar(&self, wt: &[i64]) -> Result<BigInt> {
        self.check_weight(wt)?;
        Ok(BigInt::from(self.root_system.int_casimir_scalar(wt)))
    }

    /// Casimir scalar `(λ, λ + 2ρ)` as an exact rational
    pub fn casimir_scalar(&self, wt: &[i64]) -> Result<BigRational> {
        Ok(BigRational::new(
            self.int_casimir_scalar(wt)?,
            BigInt::from(self.killing_factor()),
        ))
    }

    // ========================================================================
    // Multi-factor products
    // ========================================================================

    fn reducer<F>(&self, product: F) -> ProductReducer<F>
    where
        F: Fn(&Weight, &Weight) -> Result<Arc<Poly>> + Sync,
    {
        ProductReducer::new(product).with_parallelism(self.config.parallel, self.config.parallel_threshold)
    }

    fn weight_factors<W: AsRef<[i64]>>(&self, wts: &[W]) -> Result<Vec<Weight>> {
        wts.iter()
            .map(|wt| {
                let wt = wt.as_ref();
                self.check_dominant(wt)?;
                Ok(Weight::from(wt))
            })
            .collect()
    }

    /// Decomposition of the tensor product of all `wts`
    #[tracing::instrument(skip(self, wts), fields(rank = self.rank(), factors = wts.len()))]
    pub fn tensor<W: AsRef<[i64]>>(&self, wts: &[W]) -> Result<Poly> {
        let factors = self.weight_factors(wts)?;
        let refs: Vec<&dyn WeightPoly> = factors.iter().map(|wt| wt as &dyn WeightPoly).collect();
        self.reducer(|a: &Weight, b: &Weight| self.tensor_product(a, b).map(Arc::new))
            .reduce(&refs)
    }

    /// Decomposition of the level-`level` fusion product of all `wts`
    ///
    /// Pairwise fusion products are memoized according to the configuration;
    /// memoization never changes the result.
    #[tracing::instrument(skip(self, wts), fields(rank = self.rank(), factors = wts.len()))]
    pub fn fusion<W: AsRef<[i64]>>(&self, level: i64, wts: &[W]) -> Result<Poly> {
        Self::check_level(level)?;
        let factors = self.weight_factors(wts)?;
        let refs: Vec<&dyn WeightPoly> = factors.iter().map(|wt| wt as &dyn WeightPoly).collect();

        if !self.config.memoize_fusion {
            return self
                .reducer(|a: &Weight, b: &Weight| self.fusion_product(level, a, b).map(Arc::new))
                .reduce(&refs);
        }

        let memo = match self.config.memo_scope {
            MemoScope::Call => Arc::new(ProductMemo::new()),
            MemoScope::Algebra => self.shared_memo(level),
        };
        let result = self
            .reducer(|a: &Weight, b: &Weight| {
                memo.get_or_compute(a, b, || self.fusion_product(level, a, b))
            })
            .reduce(&refs);

        let (hits, misses) = memo.stats();
        tracing::debug!(hits, misses, cached = memo.len(), "fusion memo");
        result
    }

    /// Fusion powers `wt`, `wt⊗wt`, ... up to `count` factors
    ///
    /// Entry `k` is the level-`level` fusion product of `k + 1` copies of
    /// `wt`. One memo table serves the whole sequence.
    #[tracing::instrument(skip(self), fields(rank = self.rank()))]
    pub fn fusion_powers(&self, level: i64, wt: &[i64], count: usize) -> Result<Vec<Poly>> {
        Self::check_level(level)?;
        self.check_dominant(wt)?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let memo = match self.config.memo_scope {
            MemoScope::Algebra if self.config.memoize_fusion => self.shared_memo(level),
            _ => Arc::new(ProductMemo::new()),
        };
        let reducer = self.reducer(|a: &Weight, b: &Weight| {
            if self.config.memoize_fusion {
                memo.get_or_compute(a, b, || self.fusion_product(level, a, b))
            } else {
                self.fusion_product(level, a, b).map(Arc::new)
            }
        });

        let factor = Weight::from(wt);
        let mut powers = Vec::with_capacity(count);
        powers.push(Poly::from_poly(&factor));
        while powers.len() < count {
            let next = match powers.last() {
                Some(last) => reducer.apply(last, &factor)?,
                None => break,
            };
            powers.push(next);
        }
        Ok(powers)
    }

    fn shared_memo(&self, level: i64) -> Arc<ProductMemo> {
        let mut memos = self.shared_memos.lock();
        Arc::clone(memos.entry(level).or_default())
    }

    // ========================================================================
    // Casimir-weighted pairings
    // ========================================================================

    /// `Σ_μ (μ*, μ* + 2ρ)·p1(μ)·p2(μ*)` with integer Casimir scalars, where
    /// `μ* = dual(μ)`
    pub fn casimir_pairing(&self, p1: &Poly, p2: &Poly) -> BigInt {
        let mut sum = BigInt::zero();
        for (mu, mult) in p1.iter() {
            let mu_star = self.root_system.dual(&mu);
            if let Some(mult_star) = p2.get(&mu_star) {
                sum += BigInt::from(self.root_system.int_casimir_scalar(&mu_star)) * mult * mult_star;
            }
        }
        sum
    }

    /// Casimir-weighted pairing of `fusion(level, wts1)` with
    /// `fusion(level, wts2)`, normalized by the killing factor
    #[tracing::instrument(skip(self, wts1, wts2))]
    pub fn weighted_factorization_coeff<W1, W2>(&self, level: i64, wts1: &[W1], wts2: &[W2]) -> Result<BigRational>
    where
        W1: AsRef<[i64]>,
        W2: AsRef<[i64]>,
    {
        let prod1 = self.fusion(level, wts1)?;
        let prod2 = self.fusion(level, wts2)?;
        Ok(BigRational::new(
            self.casimir_pairing(&prod1, &prod2),
            BigInt::from(self.killing_factor()),
        ))
    }

    /// Rank of the conformal blocks bundle with weights `wts` at `level`
    ///
    /// The multiplicity of `dual(wts[0])` in the fusion product of the
    /// remaining weights. A single point has rank 1 exactly when its weight
    /// is zero.
    pub fn cb_rank<W: AsRef<[i64]>>(&self, level: i64, wts: &[W]) -> Result<BigInt> {
        Self::check_level(level)?;
        let (first, rest) = wts.split_first().ok_or(Error::TooFewPoints { needed: 1, got: 0 })?;
        let first = first.as_ref();
        self.check_dominant(first)?;
        let dual = self.root_system.dual(first);
        if rest.is_empty() {
            let trivial = dual.iter().all(|&c| c == 0);
            return Ok(if trivial { BigInt::one() } else { BigInt::zero() });
        }
        Ok(self.fusion(level, rest)?.multiplicity(&dual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn poly<const N: usize>(terms: &[([i64; N], i64)]) -> Poly {
        terms.iter().map(|(wt, m)| (wt.to_vec(), *m)).collect()
    }

    #[test]
    fn test_repr_dimension() -> Result<()> {
        let cases: Vec<(usize, Vec<i64>, i64)> = vec![
            (1, vec![0], 1),
            (1, vec![2], 3),
            (2, vec![1, 0], 3),
            (2, vec![1, 1], 8),
            (2, vec![2, 1], 15),
            (3, vec![0, 1, 0], 6),
            (3, vec![1, 0, 1], 15),
            (4, vec![1, 0, 0, 0], 5),
        ];
        for (rank, wt, want) in cases {
            let alg = Algebra::type_a(rank)?;
            assert_eq!(alg.repr_dimension(&wt)?, BigInt::from(want), "A{rank} {wt:?}");
            // cached path
            assert_eq!(alg.repr_dimension(&wt)?, BigInt::from(want));
        }
        Ok(())
    }

    #[test]
    fn test_input_validation() -> Result<()> {
        let alg = Algebra::type_a(2)?;
        assert_eq!(
            alg.repr_dimension(&[1]).unwrap_err(),
            Error::RankMismatch { expected: 2, got: 1 }
        );
        assert_eq!(
            alg.tensor(&[vec![1, -1], vec![0, 0]]).unwrap_err(),
            Error::NonDominantWeight(vec![1, -1])
        );
        assert_eq!(alg.fusion(-1, &[[1, 0], [0, 1]]).unwrap_err(), Error::NegativeLevel(-1));
        let empty: [Weight; 0] = [];
        assert_eq!(alg.fusion(1, &empty).unwrap_err(), Error::EmptyFactorList);
        assert_eq!(alg.tensor(&empty).unwrap_err(), Error::EmptyFactorList);
        Ok(())
    }

    #[test]
    fn test_exact_div() {
        assert_eq!(exact_div(BigInt::from(12), &BigInt::from(4)), Ok(BigInt::from(3)));
        assert!(matches!(
            exact_div(BigInt::from(13), &BigInt::from(4)),
            Err(Error::InexactDivision { .. })
        ));
        assert!(exact_div(BigInt::from(1), &BigInt::zero()).is_err());
    }

    #[test]
    fn test_casimir_scalar() -> Result<()> {
        let alg = Algebra::type_a(1)?;
        assert_eq!(
            alg.casimir_scalar(&[1])?,
            BigRational::new(BigInt::from(3), BigInt::from(2))
        );
        let alg = Algebra::type_a(3)?;
        assert_eq!(alg.casimir_scalar(&[0, 1, 0])?, BigRational::from_integer(BigInt::from(5)));
        assert_eq!(alg.int_casimir_scalar(&[0, 1, 0])?, BigInt::from(20));
        Ok(())
    }

    #[test]
    fn test_weight_accessors_check_rank() -> Result<()> {
        let alg = Algebra::type_a(3)?;
        let mismatch = Error::RankMismatch { expected: 3, got: 1 };
        assert_eq!(alg.level(&[1]).unwrap_err(), mismatch);
        assert_eq!(alg.dual(&[1]).unwrap_err(), mismatch);
        assert_eq!(alg.int_casimir_scalar(&[1]).unwrap_err(), mismatch);
        assert_eq!(alg.casimir_scalar(&[1]).unwrap_err(), mismatch);
        assert_eq!(
            alg.dual(&[1, 0, 0, 0]).unwrap_err(),
            Error::RankMismatch { expected: 3, got: 4 }
        );

        assert_eq!(alg.level(&[1, 2, 0])?, 3);
        assert_eq!(alg.dual(&[1, 2, 0])?, Weight::from([0, 2, 1]));
        Ok(())
    }

    #[test]
    fn test_fold_slack_from_config() -> Result<()> {
        let config = EngineConfig {
            alcove_fold_slack: 0,
            ..Default::default()
        };
        let alg = Algebra::from_kind(RootSystemKind::A, 2, config)?;
        assert_eq!(
            alg.root_system().reflect_to_alcove(&[50, 0], 3),
            Err(Error::AlcoveFoldLimit { limit: 3 })
        );
        Ok(())
    }

    #[test]
    fn test_multi_tensor() -> Result<()> {
        let alg = Algebra::type_a(1)?;
        assert_eq!(alg.tensor(&[[1], [1], [1]])?, poly(&[([3], 1), ([1], 2)]));

        let alg = Algebra::type_a(2)?;
        assert_eq!(
            alg.tensor(&[[1, 0], [1, 1], [0, 1]])?,
            poly(&[([0, 0], 1), ([0, 3], 1), ([1, 1], 3), ([2, 2], 1), ([3, 0], 1)])
        );
        assert_eq!(
            alg.tensor(&[[1, 0], [1, 1], [2, 0]])?,
            poly(&[
                ([0, 0], 1),
                ([0, 3], 1),
                ([1, 1], 3),
                ([2, 2], 2),
                ([3, 0], 2),
                ([4, 1], 1)
            ])
        );
        assert_eq!(alg.tensor(&[[2, 1]])?, poly(&[([2, 1], 1)]));
        Ok(())
    }

    #[test]
    fn test_multi_fusion() -> Result<()> {
        let alg = Algebra::type_a(1)?;
        // Level 1 su(2): [1]^3 fuses to [1]
        assert_eq!(alg.fusion(1, &[[1], [1], [1]])?, poly(&[([1], 1)]));
        assert_eq!(alg.fusion(1, &[[1], [1], [1], [1]])?, poly(&[([0], 1)]));
        // Level 2: [1]⊗[1] = [0] + [2], and [2]⊗[1] truncates to [1]
        assert_eq!(alg.fusion(2, &[[1], [1], [1]])?, poly(&[([1], 2)]));
        Ok(())
    }

    #[test]
    fn test_memoization_is_transparent() -> Result<()> {
        let wts = [[1, 0, 1], [0, 1, 0], [1, 0, 1], [0, 1, 0], [2, 0, 0]];
        let configs = [
            EngineConfig::default(),
            EngineConfig::serial(),
            EngineConfig {
                memo_scope: MemoScope::Algebra,
                ..Default::default()
            },
        ];
        let mut results = Vec::new();
        for config in configs {
            let alg = Algebra::from_kind(RootSystemKind::A, 3, config)?;
            results.push(alg.fusion(3, &wts)?);
            // second call reuses the shared table when configured
            results.push(alg.fusion(3, &wts)?);
        }
        for result in &results[1..] {
            assert_eq!(result, &results[0]);
        }
        Ok(())
    }

    #[test]
    fn test_fusion_powers() -> Result<()> {
        let alg = Algebra::type_a(2)?;
        let powers = alg.fusion_powers(2, &[1, 1], 5)?;
        assert_eq!(powers.len(), 5);
        assert_eq!(powers[0], poly(&[([1, 1], 1)]));
        for (k, power) in powers.iter().enumerate() {
            let wts = vec![[1, 1]; k + 1];
            assert_eq!(power, &alg.fusion(2, &wts)?, "{} factors", k + 1);
        }
        assert!(alg.fusion_powers(2, &[1, 1], 0)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_cb_rank() -> Result<()> {
        let alg = Algebra::type_a(1)?;
        assert_eq!(alg.cb_rank(1, &[[0], [0], [0]])?, BigInt::one());
        assert_eq!(alg.cb_rank(1, &[[1], [1], [1]])?, BigInt::zero());
        assert_eq!(alg.cb_rank(1, &[[1], [1], [1], [1]])?, BigInt::one());
        assert_eq!(alg.cb_rank(2, &[[1], [1], [1], [1]])?, BigInt::from(2));
        assert_eq!(alg.cb_rank(1, &[[0]])?, BigInt::one());
        assert_eq!(alg.cb_rank(1, &[[1]])?, BigInt::zero());
        let empty: [Weight; 0] = [];
        assert!(matches!(alg.cb_rank(1, &empty), Err(Error::TooFewPoints { .. })));
        Ok(())
    }

    #[test]
    fn test_weighted_factorization_coeff() -> Result<()> {
        // A1, level 2: [1]⊗[1] = [0] + [2], paired with itself
        let alg = Algebra::type_a(1)?;
        let got = alg.weighted_factorization_coeff(2, &[[1], [1]], &[[1], [1]])?;
        // cas([0]) = 0, cas([2]) = 2·4 = 8 over killing factor 2
        assert_eq!(got, BigRational::from_integer(BigInt::from(4)));
        Ok(())
    }
}
