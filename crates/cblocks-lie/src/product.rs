//! Associative products of weight polynomials
//!
//! [`ProductReducer`] lifts a product of two weights to the bilinear product
//! of two polynomials and folds it over a list of factors. The pairwise
//! products of one [`apply`](ProductReducer::apply) call are independent, so
//! they can be fanned out on the rayon pool. Results are joined in pair order
//! and accumulated on the calling thread, which keeps the output independent
//! of scheduling.
//!
//! [`ProductMemo`] caches pairwise products by `(left, right)` weight. The
//! table is locked only for lookup and insertion, never while a product is
//! being computed. Two threads racing on the same uncached pair may both
//! compute it; the first insertion wins and both callers return the stored
//! value.

use num_bigint::BigInt;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::poly::{Poly, PolyBuilder, WeightPoly};
use crate::vectormap::VectorMap;
use crate::weight::Weight;
use crate::{Error, Result};

/// Bilinear extension and left fold of a weight-level product
pub struct ProductReducer<F> {
    product: F,
    parallel: bool,
    parallel_threshold: usize,
}

impl<F> ProductReducer<F>
where
    F: Fn(&Weight, &Weight) -> Result<Arc<Poly>> + Sync,
{
    /// Serial reducer around `product`
    pub fn new(product: F) -> Self {
        Self {
            product,
            parallel: false,
            parallel_threshold: usize::MAX,
        }
    }

    /// Fan out pairwise products once a call has at least `threshold` pairs
    pub fn with_parallelism(mut self, parallel: bool, threshold: usize) -> Self {
        self.parallel = parallel;
        self.parallel_threshold = threshold.max(1);
        self
    }

    /// Bilinear product of two polynomials
    pub fn apply<A, B>(&self, lhs: &A, rhs: &B) -> Result<Poly>
    where
        A: WeightPoly + ?Sized,
        B: WeightPoly + ?Sized,
    {
        let lhs = lhs.terms();
        let rhs = rhs.terms();
        let pairs: Vec<(usize, usize)> = (0..lhs.len())
            .flat_map(|i| (0..rhs.len()).map(move |j| (i, j)))
            .collect();

        let run = |&(i, j): &(usize, usize)| (self.product)(&lhs[i].0, &rhs[j].0);
        let products: Vec<Arc<Poly>> = if self.parallel && pairs.len() >= self.parallel_threshold {
            pairs.par_iter().map(run).collect::<Result<_>>()?
        } else {
            pairs.iter().map(run).collect::<Result<_>>()?
        };

        tracing::debug!(pairs = pairs.len(), "applied pairwise products");

        let mut builder = PolyBuilder::new();
        for (&(i, j), product) in pairs.iter().zip(&products) {
            let coeff: BigInt = &lhs[i].1 * &rhs[j].1;
            builder.add_scaled(product, &coeff);
        }
        Ok(builder.build())
    }

    /// Left fold of [`apply`](Self::apply) over `factors`
    ///
    /// A single factor is returned unchanged; no factors is an error.
    pub fn reduce(&self, factors: &[&dyn WeightPoly]) -> Result<Poly> {
        let (first, rest) = factors.split_first().ok_or(Error::EmptyFactorList)?;
        let mut acc = Poly::from_poly(*first);
        for factor in rest {
            acc = self.apply(&acc, *factor)?;
        }
        Ok(acc)
    }
}

/// Thread-safe memo table of pairwise products
#[derive(Default)]
pub struct ProductMemo {
    table: Mutex<VectorMap<VectorMap<Arc<Poly>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ProductMemo {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached product of `(lhs, rhs)`, if any
    pub fn get(&self, lhs: &[i64], rhs: &[i64]) -> Option<Arc<Poly>> {
        let table = self.table.lock();
        table.get(lhs)?.get(rhs).cloned()
    }

    /// Store a product unless one is already present; returns the stored value
    pub fn insert(&self, lhs: &[i64], rhs: &[i64], product: Arc<Poly>) -> Arc<Poly> {
        let mut table = self.table.lock();
        let inner = table.get_or_insert_with(lhs, VectorMap::new);
        match inner.get(rhs) {
            Some(existing) => Arc::clone(existing),
            None => {
                inner.put(rhs, Arc::clone(&product));
                product
            }
        }
    }

    /// Cached product, or compute it with `compute` and cache the result
    ///
    /// A failed computation leaves the table untouched.
    pub fn get_or_compute<C>(&self, lhs: &[i64], rhs: &[i64], compute: C) -> Result<Arc<Poly>>
    where
        C: FnOnce() -> Result<Poly>,
    {
        if let Some(hit) = self.get(lhs, rhs) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(hit);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let product = Arc::new(compute()?);
        Ok(self.insert(lhs, rhs, product))
    }

    /// Number of cached pairs
    pub fn len(&self) -> usize {
        let table = self.table.lock();
        table.iter().map(|(_, inner)| inner.len()).sum()
    }

    /// True if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(hits, misses)` since creation
    pub fn stats(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::One;
    use std::sync::atomic::AtomicUsize;

    /// Product on the lattice: e^a · e^b = e^(a+b)
    fn lattice_product(a: &Weight, b: &Weight) -> Result<Arc<Poly>> {
        Ok(Arc::new(Poly::from_poly(&(a + &b[..]))))
    }

    fn poly<const N: usize>(terms: &[([i64; N], i64)]) -> Poly {
        terms.iter().map(|(wt, m)| (wt.to_vec(), *m)).collect()
    }

    #[test]
    fn test_apply_is_bilinear() -> Result<()> {
        let reducer = ProductReducer::new(lattice_product);
        let a = poly(&[([1], 2), ([0], 1)]);
        let b = poly(&[([1], 1), ([-1], 3)]);
        let got = reducer.apply(&a, &b)?;
        assert_eq!(got, poly(&[([2], 2), ([0], 6), ([1], 1), ([-1], 3)]));
        Ok(())
    }

    #[test]
    fn test_parallel_matches_serial() -> Result<()> {
        let serial = ProductReducer::new(lattice_product);
        let parallel = ProductReducer::new(lattice_product).with_parallelism(true, 1);
        let a = poly(&[([1, 0], 2), ([0, 1], -1), ([3, 3], 5)]);
        let b = poly(&[([1, 1], 1), ([0, 2], 4), ([2, 0], -7)]);
        assert_eq!(serial.apply(&a, &b)?, parallel.apply(&a, &b)?);
        Ok(())
    }

    #[test]
    fn test_reduce() -> Result<()> {
        let reducer = ProductReducer::new(lattice_product);
        let w1 = Weight::from([1, 0]);
        let w2 = Weight::from([0, 2]);
        let w3 = Weight::from([4, 4]);

        assert_eq!(reducer.reduce(&[]).unwrap_err(), Error::EmptyFactorList);
        assert_eq!(reducer.reduce(&[&w1])?, poly(&[([1, 0], 1)]));
        assert_eq!(reducer.reduce(&[&w1, &w2, &w3])?, poly(&[([5, 6], 1)]));
        Ok(())
    }

    #[test]
    fn test_product_error_propagates() {
        let reducer = ProductReducer::new(|_: &Weight, _: &Weight| Err(Error::EmptyFactorList))
            .with_parallelism(true, 1);
        let a = Weight::from([1]);
        assert!(reducer.apply(&a, &a).is_err());
    }

    #[test]
    fn test_memo_first_writer_wins() {
        let memo = ProductMemo::new();
        let first = Arc::new(poly(&[([0], 1)]));
        let second = Arc::new(poly(&[([0], 2)]));
        let stored = memo.insert(&[1], &[2], Arc::clone(&first));
        assert!(Arc::ptr_eq(&stored, &first));
        let stored = memo.insert(&[1], &[2], second);
        assert!(Arc::ptr_eq(&stored, &first));
        assert_eq!(memo.len(), 1);
        assert!(memo.get(&[2], &[1]).is_none());
    }

    #[test]
    fn test_memo_computes_once() -> Result<()> {
        let memo = ProductMemo::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..5 {
            let product = memo.get_or_compute(&[1, 1], &[0, 1], || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(poly(&[([1, 2], 1)]))
            })?;
            assert_eq!(product.multiplicity(&[1, 2]), BigInt::one());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(memo.stats(), (4, 1));
        Ok(())
    }

    #[test]
    fn test_memo_failed_compute_not_cached() {
        let memo = ProductMemo::new();
        let result = memo.get_or_compute(&[1], &[1], || Err(Error::EmptyFactorList));
        assert!(result.is_err());
        assert!(memo.is_empty());
    }

    #[test]
    fn test_memoized_reducer_concurrent() -> Result<()> {
        let memo = ProductMemo::new();
        let reducer = ProductReducer::new(|a: &Weight, b: &Weight| {
            memo.get_or_compute(a, b, || Ok(Poly::from_poly(&(a + &b[..]))))
        })
        .with_parallelism(true, 1);
        let a = poly(&[([1], 1), ([2], 1), ([3], 1)]);
        let got = reducer.apply(&a, &a)?;
        assert_eq!(got, ProductReducer::new(lattice_product).apply(&a, &a)?);
        assert_eq!(memo.len(), 9);
        Ok(())
    }
}
