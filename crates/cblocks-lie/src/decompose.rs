//! Tensor and fusion product decompositions
//!
//! Tensor products use the Racah–Speiser (Brauer–Klimyk) orbit sum: for each
//! weight `μ` of the smaller factor, `λ + ρ + μ` is reflected into the
//! dominant chamber and `ρ` is subtracted again; the Weyl group sign of the
//! reflection is the sign of the contribution.
//!
//! Fusion products at level `ℓ` truncate the tensor product with the
//! Kac–Walton rule: `ν + ρ` is folded into the alcove of width `ℓ + h∨` by
//! the affine Weyl group, and survivors of level at most `ℓ` contribute with
//! the sign of the fold. Terms of level `ℓ + 1` lie on the alcove wall and
//! always cancel, so they are skipped.

use crate::algebra::Algebra;
use crate::poly::{Poly, PolyBuilder};
use crate::weight::Weight;
use crate::Result;

impl Algebra {
    /// Irreducible decomposition of `V(wt1) ⊗ V(wt2)`
    #[tracing::instrument(skip(self), level = "trace")]
    pub fn tensor_product(&self, wt1: &[i64], wt2: &[i64]) -> Result<Poly> {
        self.check_dominant(wt1)?;
        self.check_dominant(wt2)?;

        // Enumerate the character of the smaller representation
        let (big, small) = if self.repr_dimension(wt1)? < self.repr_dimension(wt2)? {
            (wt2, wt1)
        } else {
            (wt1, wt2)
        };

        let rs = self.root_system();
        let rho = rs.rho();
        let shifted = &Weight::from(big) + &rho[..];
        let character = self.dominant_char(small)?;

        let mut builder = PolyBuilder::new();
        for (mu, mult) in character.iter() {
            for orbit_wt in rs.orbit(&mu) {
                let (reflected, parity) = rs.reflect_to_chamber(&(&shifted + &orbit_wt[..]));
                let candidate = &reflected - &rho[..];
                if candidate.is_dominant() {
                    builder.add_monomial(&candidate, mult * parity);
                }
            }
        }
        Ok(builder.build())
    }

    /// Level-`level` fusion product of `V(wt1)` and `V(wt2)`
    #[tracing::instrument(skip(self), level = "trace")]
    pub fn fusion_product(&self, level: i64, wt1: &[i64], wt2: &[i64]) -> Result<Poly> {
        Self::check_level(level)?;
        let tensor = self.tensor_product(wt1, wt2)?;

        let rs = self.root_system();
        let rho = rs.rho();
        let width = level + rs.dual_coxeter_number();

        let mut builder = PolyBuilder::new();
        for (wt, mult) in tensor.iter() {
            if rs.level(&wt) == level + 1 {
                continue;
            }
            let (folded, parity) = rs.reflect_to_alcove(&(&wt + &rho[..]), width)?;
            let candidate = &folded - &rho[..];
            if candidate.is_dominant() && rs.level(&candidate) <= level {
                builder.add_monomial(&candidate, mult * parity);
            }
        }
        Ok(builder.build())
    }
}
