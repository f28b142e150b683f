//! Arbor random value generation and shrinking.
//!
//! This is the main entry point for Arbor, re-exporting the generators,
//! arbitraries and shrinking machinery of `arbor-core`.
//!
//! ```
//! use arbor::*;
//!
//! let gen = Gen::vec_of(Gen::<i32>::integers(0, 10)?, SizeBounds::new(0, 5)?);
//! let shrinkable = gen.generate(Size::new(30), Seed::from_u64(7))?;
//! assert!(shrinkable.value().len() <= 5);
//! # Ok::<(), ArborError>(())
//! ```

pub use arbor_core::*;
