//! Map projections for drought maps.
//!
//! Implements the projections from scratch without external dependencies.

pub mod albers_usa;
pub mod conic;

pub use albers_usa::{AlbersUsa, Inset, Region};
pub use conic::ConicEqualArea;
