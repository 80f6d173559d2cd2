//! Poster rasterization.
//!
//! Implements the drawing stages of a poster:
//! - Road classification and styling
//! - Map layers on a tiny-skia canvas (polygons, roads)
//! - Edge gradient overlays
//! - Typography block (rusttype)
//! - PNG export

pub mod canvas;
pub mod gradient;
pub mod png;
pub mod roads;
pub mod typography;

pub use canvas::{PosterCanvas, RenderConfig};
pub use gradient::{Edge, GradientOverlay};
pub use roads::{classify, road_style, RoadClass, RoadStyle};
pub use typography::{FontSet, PosterText};
