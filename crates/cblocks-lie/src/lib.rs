//! # cblocks-lie
//!
//! Exact representation theory of simple Lie algebras for conformal blocks.
//!
//! ## Overview
//!
//! The crate computes, with arbitrary-precision integer arithmetic:
//!
//! 1. **Root system arithmetic**: positive roots, the Killing form, Weyl
//!    chamber and alcove reflections, and orbit enumeration ([`rootsystem`])
//! 2. **Characters**: dominant weight multiplicities by Freudenthal's formula
//! 3. **Tensor products**: Racah–Speiser orbit sums
//! 4. **Fusion products**: Kac–Walton truncation at a fixed level
//! 5. **Multi-factor products**: an associative reducer with optional
//!    memoization and parallel pairwise evaluation ([`product`])
//!
//! Only type A is implemented. The [`RootSystem`] trait is the seam for
//! other Cartan types.
//!
//! ## Architecture
//!
//! ```text
//! VectorMap (trie keyed by integer vectors)
//!     ↓ coefficient storage
//! Weight / Poly / PolyBuilder
//!     ↓ weights and characters
//! RootSystem (TypeA, epsilon coordinates)
//!     ↓ reflections and orbits
//! Algebra (dimensions, characters, tensor, fusion)
//!     ↓ pairwise products
//! ProductReducer + ProductMemo (rayon fan-out, memo table)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use cblocks_lie::{Algebra, WeightPoly};
//! use num_bigint::BigInt;
//!
//! # fn main() -> cblocks_lie::Result<()> {
//! let alg = Algebra::type_a(2)?;
//!
//! // The adjoint representation of sl(3) has dimension 8
//! assert_eq!(alg.repr_dimension(&[1, 1])?, BigInt::from(8));
//!
//! // Level-1 fusion of the two fundamental representations
//! let product = alg.fusion(1, &[[0, 1], [0, 1]])?;
//! assert_eq!(product.multiplicity(&[1, 0]), BigInt::from(1));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// Public modules
pub mod config;
pub mod poly;
pub mod product;
pub mod rootsystem;
pub mod vectormap;
pub mod weight;

// Internal modules
mod algebra;
mod decompose;
mod error;
mod freudenthal;

// Re-exports
pub use algebra::Algebra;
pub use config::{EngineConfig, MemoScope};
pub use error::{Error, Result};
pub use poly::{Poly, PolyBuilder, WeightPoly};
pub use product::{ProductMemo, ProductReducer};
pub use rootsystem::{RootSystem, RootSystemKind, TypeA};
pub use vectormap::VectorMap;
pub use weight::{Root, Weight};

/// Convenient imports for downstream crates
pub mod prelude {
    pub use crate::{
        Algebra, EngineConfig, Error, MemoScope, Poly, PolyBuilder, Result, RootSystem, RootSystemKind,
        TypeA, Weight, WeightPoly,
    };
}
