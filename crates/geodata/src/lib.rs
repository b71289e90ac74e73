//! Geographic inputs for drought map rendering.
//!
//! - `geometry`: the lon/lat polygon and line model every layer draws from
//! - `topology`: the shared base map (land and states) loaded from TopoJSON
//! - `features`: feature-by-feature reading of Drought Monitor shapefiles

pub mod features;
pub mod geometry;
pub mod topology;

pub use features::{stream_features, DroughtFeature, SeverityField, StreamSummary};
pub use geometry::{Geometry, Position, Ring};
pub use topology::BaseMap;
