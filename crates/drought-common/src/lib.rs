//! Common types and utilities shared across the drought map workspace.

pub mod bbox;
pub mod color;
pub mod error;
pub mod severity;

pub use bbox::BoundingBox;
pub use color::Color;
pub use error::{DroughtError, DroughtResult};
pub use severity::Severity;
