//! Root systems
//!
//! A [`RootSystem`] is the pure arithmetic layer under the representation
//! engine: positive roots, the Killing form, Weyl-chamber and alcove
//! reflections, and orbit enumeration. Implementations are immutable and
//! shared read-only across threads.
//!
//! Only type A is implemented ([`TypeA`]); [`RootSystemKind`] is the
//! extension point for further Cartan types.

mod type_a;

pub use type_a::{Orbit, TypeA};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::weight::{Root, Weight};
use crate::{Error, Result};

/// Cartan type of a root system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RootSystemKind {
    /// Type A: `sl(r+1)`
    A,
}

impl RootSystemKind {
    /// Construct the root system of this kind and rank
    pub fn root_system(self, rank: usize) -> Result<Arc<dyn RootSystem>> {
        match self {
            RootSystemKind::A => Ok(Arc::new(TypeA::new(rank)?)),
        }
    }
}

impl fmt::Display for RootSystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootSystemKind::A => write!(f, "A"),
        }
    }
}

impl FromStr for RootSystemKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "A" | "a" => Ok(RootSystemKind::A),
            other => Err(Error::UnsupportedRootSystem(other.to_string())),
        }
    }
}

/// Weight and root arithmetic of a simple Lie algebra
///
/// All methods are pure functions of the fixed rank. Weight arguments are
/// assumed to have length [`rank`](RootSystem::rank); callers validate.
pub trait RootSystem: Send + Sync + fmt::Debug {
    /// Cartan type
    fn kind(&self) -> RootSystemKind;

    /// Rank of the algebra
    fn rank(&self) -> usize;

    /// Dual Coxeter number `h∨`
    fn dual_coxeter_number(&self) -> i64;

    /// Scale factor between [`int_killing_form`](RootSystem::int_killing_form)
    /// and the normalized Killing form
    fn killing_factor(&self) -> i64;

    /// Every positive root exactly once, in a stable order
    fn positive_roots(&self) -> &[Root];

    /// Express a root in the fundamental-weight basis (Cartan matrix action)
    fn convert_root(&self, root: &Root) -> Weight;

    /// Killing form scaled by the killing factor; always integral
    fn int_killing_form(&self, wt1: &[i64], wt2: &[i64]) -> i64;

    /// Level of a weight (pairing with the highest coroot)
    fn level(&self, wt: &[i64]) -> i64;

    /// Highest weight of the dual representation
    fn dual(&self, wt: &[i64]) -> Weight;

    /// All dominant weights of level at most `level`
    fn weights(&self, level: i64) -> Vec<Weight>;

    /// Move `wt` into the dominant chamber
    ///
    /// Returns the dominant representative and the sign of the Weyl group
    /// element used.
    fn reflect_to_chamber(&self, wt: &[i64]) -> (Weight, i64);

    /// Move `wt` into the fundamental alcove of width `width` using the
    /// affine Weyl group
    ///
    /// Returns the folded weight and the sign of the affine Weyl group
    /// element used.
    fn reflect_to_alcove(&self, wt: &[i64], width: i64) -> Result<(Weight, i64)>;

    /// Every element of the Weyl orbit of `wt`, each exactly once
    fn orbit(&self, wt: &[i64]) -> Box<dyn Iterator<Item = Weight> + '_>;

    /// Normalized Killing form
    fn killing_form(&self, wt1: &[i64], wt2: &[i64]) -> f64 {
        self.int_killing_form(wt1, wt2) as f64 / self.killing_factor() as f64
    }

    /// `(λ, λ)` scaled by the killing factor
    fn int_length_squared(&self, wt: &[i64]) -> i64 {
        self.int_killing_form(wt, wt)
    }

    /// Normalized `(λ, λ)`
    fn length_squared(&self, wt: &[i64]) -> f64 {
        self.killing_form(wt, wt)
    }

    /// Height of a positive root in the simple-root basis
    fn root_level(&self, root: &Root) -> i64 {
        root.height()
    }

    /// Casimir scalar scaled by the killing factor: `(λ, λ + 2ρ)`
    fn int_casimir_scalar(&self, wt: &[i64]) -> i64 {
        let shifted: Vec<i64> = wt.iter().map(|c| c + 2).collect();
        self.int_killing_form(wt, &shifted)
    }

    /// Normalized Casimir scalar
    fn casimir_scalar(&self, wt: &[i64]) -> f64 {
        self.int_casimir_scalar(wt) as f64 / self.killing_factor() as f64
    }

    /// Half the sum of the positive roots: `(1, ..., 1)`
    fn rho(&self) -> Weight {
        Weight::new(vec![1; self.rank()])
    }

    /// The zero weight
    fn new_weight(&self) -> Weight {
        Weight::zero(self.rank())
    }

    /// True if every coordinate is non-negative
    fn is_dominant(&self, wt: &[i64]) -> bool {
        crate::weight::is_dominant(wt)
    }

    /// Size of the Weyl orbit of `wt`
    fn orbit_size(&self, wt: &[i64]) -> usize {
        self.orbit(wt).count()
    }
}
