//! Dominant characters via Freudenthal's multiplicity formula
//!
//! The dominant weights of `V(λ)` are generated breadth-first from `λ` by
//! subtracting positive roots while staying dominant, bucketed by the height
//! of `λ - μ`. Multiplicities are then assigned bucket by bucket:
//!
//! ```text
//! m(μ) = 2 Σ_{α>0} Σ_{n≥1} (μ + nα, α) m(μ + nα)  /  ((λ+ρ, λ+ρ) - (μ+ρ, μ+ρ))
//! ```
//!
//! `m(μ + nα)` is read from the dominant representative of `μ + nα`, which
//! always sits in a shallower bucket. A weight string is unbroken, so the
//! inner sum stops at the first `n` whose representative is not a weight.

use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::algebra::{exact_div, Algebra};
use crate::poly::{Poly, PolyBuilder};
use crate::vectormap::VectorMap;
use crate::weight::Weight;
use crate::{Error, Result};

impl Algebra {
    /// Dominant weights of `V(highest)`, indexed by depth below `highest`
    ///
    /// Entry `d` holds the weights `μ` with `λ - μ` of height `d`; some
    /// entries may be empty.
    pub fn dominant_weights(&self, highest: &[i64]) -> Result<Vec<Vec<Weight>>> {
        self.check_dominant(highest)?;
        let rs = self.root_system();
        let roots: Vec<(Weight, usize)> = rs
            .positive_roots()
            .iter()
            .map(|root| (rs.convert_root(root), root.height() as usize))
            .collect();

        let mut seen: VectorMap<()> = VectorMap::new();
        seen.put(highest, ());
        let mut levels: Vec<Vec<Weight>> = vec![vec![Weight::from(highest)]];

        let mut depth = 0;
        while depth < levels.len() {
            let current = std::mem::take(&mut levels[depth]);
            for wt in &current {
                for (alpha, height) in &roots {
                    let next = wt - &alpha[..];
                    if !next.is_dominant() || seen.contains_key(&next) {
                        continue;
                    }
                    seen.put(&next, ());
                    let target = depth + height;
                    if levels.len() <= target {
                        levels.resize_with(target + 1, Vec::new);
                    }
                    levels[target].push(next);
                }
            }
            levels[depth] = current;
            depth += 1;
        }

        Ok(levels)
    }

    /// Dominant weights of `V(highest)` with their multiplicities
    #[tracing::instrument(skip(self), level = "debug")]
    pub fn dominant_char(&self, highest: &[i64]) -> Result<Poly> {
        let levels = self.dominant_weights(highest)?;
        let rs = self.root_system();
        let rho = rs.rho();

        let roots: Vec<(Weight, i64)> = rs
            .positive_roots()
            .iter()
            .map(|root| {
                let alpha = rs.convert_root(root);
                let norm = rs.int_killing_form(&alpha, &alpha);
                (alpha, norm)
            })
            .collect();

        let highest_rho = &Weight::from(highest) + &rho[..];
        let top = rs.int_killing_form(&highest_rho, &highest_rho);

        let mut mults: VectorMap<BigInt> = VectorMap::new();
        mults.put(highest, BigInt::one());

        for wt in levels.iter().skip(1).flatten() {
            let mut sum = BigInt::zero();
            for (alpha, norm) in &roots {
                let base = rs.int_killing_form(wt, alpha);
                let mut n = 1;
                loop {
                    let (dominant, _) = rs.reflect_to_chamber(&wt.add_scaled(alpha, n));
                    let Some(mult) = mults.get(&dominant) else {
                        break;
                    };
                    sum += mult * (base + n * norm);
                    n += 1;
                }
            }

            let wt_rho = wt + &rho[..];
            let denominator = top - rs.int_killing_form(&wt_rho, &wt_rho);
            if denominator == 0 {
                return Err(Error::ZeroDenominator { weight: wt.to_vec() });
            }
            let mult = exact_div(sum * 2, &BigInt::from(denominator))?;
            mults.put(wt, mult);
        }

        tracing::debug!(weights = mults.len(), "computed dominant character");

        let mut builder = PolyBuilder::new();
        for (wt, mult) in mults.iter() {
            builder.set_monomial(&wt, mult.clone());
        }
        Ok(builder.build())
    }
}
