//! Polyline stroke tessellation into GPU triangle strips.
//!
//! # Features
//! - Constant-thickness strokes from plain point buffers, including
//!   multi-subpath buffers separated by NaN sentinels.
//! - Butt and round endcaps, bevel/round/miter joins with a
//!   resolution-derived miter limit.
//! - Triangle-strip output: one owned buffer per call, ready for a
//!   streamed vertex buffer.
//! - Pixel-space to device-space mapping for rasterizers that consume
//!   normalized coordinates.
//! - Backend-agnostic. Comes with [`MiniquadStrip`] that renders the
//!   strips through [`miniquad`] out of the box (feature
//!   `miniquad_strip`, on by default).
//! - Works with custom vertex formats through the [`FromPos2Color`]
//!   trait.
//! - Pure rust, no unsafe code.
//!
//! Tessellate with [`tessellate_stroke`] (or [`tessellate_stroke_flat`]
//! for flat `f32` buffers), then hand the strip to your renderer:
//!
//! ```
//! use stripline::{tessellate_stroke, StrokeOptions, EndcapStyle, JoinStyle};
//! use glam::vec2;
//!
//! let points = [vec2(8.0, 8.0), vec2(120.0, 8.0), vec2(120.0, 90.0)];
//! let options = StrokeOptions::with_thickness(3.0)
//!     .endcap(EndcapStyle::Round, 0.2)
//!     .join(JoinStyle::MiterOrBevel, 0.25);
//! let strip = tessellate_stroke(&points, &options).unwrap();
//! assert_eq!(strip.len() % 2, 0);
//! ```
//!
//! [`miniquad`]: https://docs.rs/miniquad/

mod example;
mod mapping;
#[cfg(feature = "miniquad")]
mod miniquad_strip;
mod stroke;

pub use example::VertexPos2Color;
pub use mapping::{map_pixels_to_device, map_points_to_device};
#[cfg(feature = "miniquad")]
pub use miniquad_strip::MiniquadStrip;
pub use stroke::{
    is_subpath_break, subpath_break, tessellate_stroke, tessellate_stroke_flat, EndcapStyle,
    JoinStyle, StrokeOptions,
};

use thiserror::Error;

/// Invalid-argument conditions of the tessellation and mapping entry
/// points.
///
/// Every variant is deterministic: the same input fails the same way, and
/// a failing call produces no partial output. Numeric degeneracies inside
/// valid input (zero-length segments, reversing edges) are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum StripError {
    #[error("stroke thickness must be positive and finite, got {0}")]
    NonPositiveThickness(f32),
    #[error("angular resolution must be positive and finite, got {0}")]
    NonPositiveResolution(f32),
    #[error("flat coordinate buffer holds {0} floats, expected an even count")]
    OddCoordinateCount(usize),
    #[error("subpath break at position {index} has no subpath on one side")]
    BreakAtBoundary { index: usize },
    #[error("adjacent subpath breaks at position {index}")]
    AdjacentBreaks { index: usize },
    #[error("point at position {index} has a non-finite coordinate")]
    NonFinitePoint { index: usize },
}

/// Construct a vertex from 2D-position + color.
///
/// Implement this trait for your vertex type.
pub trait FromPos2Color {
    fn from_pos2_color(pos: [f32; 2], color: [u8; 4]) -> Self;
}
