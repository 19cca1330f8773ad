//! # cblocks - Conformal Blocks Bundles
//!
//! Ranks and first Chern classes of conformal blocks vector bundles on the
//! moduli space of stable pointed rational curves.
//!
//! ## Overview
//!
//! A bundle is given by a simple Lie algebra, a level `ℓ` and one dominant
//! weight per marked point. This crate computes, exactly:
//!
//! - **Ranks**: fusion multiplicities at level `ℓ`
//! - **Symmetrized divisors**: Fakhruddin's formula in the boundary basis
//!   `D_2, ..., D_{n/2}`, with a closed form for symmetric bundles
//! - **F-curve intersections**: degrees of the bundle restricted to F-curves
//!
//! The representation theory underneath lives in [`cblocks_lie`] and is
//! re-exported here.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use cblocks::{Algebra, ConformalBlocksBundle, SymmetricCBBundle};
//! use num_bigint::BigInt;
//! use num_rational::BigRational;
//!
//! # fn main() -> cblocks::Result<()> {
//! let alg = Arc::new(Algebra::type_a(1)?);
//! let bundle = SymmetricCBBundle::new(alg, &[1], 1, 4)?;
//!
//! assert_eq!(bundle.rank()?, BigInt::from(1));
//! assert_eq!(
//!     bundle.symmetrized_divisor()?,
//!     vec![BigRational::new(BigInt::from(1), BigInt::from(3))]
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// Public modules
pub mod api;
pub mod bundle;
pub mod fcurve;
pub mod symmetric;

// Re-export the representation engine
pub use cblocks_lie::{
    // Engine
    Algebra,
    // Configuration
    EngineConfig,
    // Error handling
    Error,
    MemoScope,
    // Polynomials
    Poly,
    PolyBuilder,
    Result,
    // Root systems
    RootSystem,
    RootSystemKind,
    TypeA,
    // Weights
    Weight,
    WeightPoly,
};

// Bundle types
pub use api::{
    compute_rank, compute_symmetric_divisor, compute_symmetric_rank, decode_big_int, encode_big_int,
    IntReply, RankRequest, RationalPair, SymmetricRequest, VectorReply,
};
pub use bundle::{normalize_ray, CBBundle, ConformalBlocksBundle};
pub use fcurve::{f_curves, sym_f_curves, FCurve};
pub use symmetric::SymmetricCBBundle;

// Module re-exports for advanced use
pub use cblocks_lie as lie;

/// Version of the cblocks crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenient imports
pub mod prelude {
    pub use crate::{
        Algebra, CBBundle, ConformalBlocksBundle, EngineConfig, Error, FCurve, Result, RootSystemKind,
        SymmetricCBBundle, Weight,
    };
}
