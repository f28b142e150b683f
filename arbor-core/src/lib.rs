//! Core functionality for Arbor random value generation and shrinking.
//!
//! This crate provides the building blocks a property-based testing engine
//! drives: generators and their combinators, shrinkable values with lazy
//! shrink trees, container generation with size and uniqueness constraints,
//! and the container shrinking algorithm.

pub mod arbitrary;
pub mod container;
pub mod data;
pub mod decimal;
pub mod distance;
pub mod edge;
pub mod error;
pub mod gen;
pub mod numeric;
pub mod shrink;
pub mod shrinkable;

// Re-export the main types
pub use arbitrary::*;
pub use container::*;
pub use data::*;
pub use decimal::*;
pub use distance::*;
pub use edge::*;
pub use error::*;
pub use gen::*;
pub use numeric::*;
pub use shrink::*;
pub use shrinkable::*;
