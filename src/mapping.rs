//! Pixel-space to device-space coordinate mapping.
//!
//! A rasterizer consuming the strip meshes expects normalized device
//! coordinates in `[-1, 1]` on both axes with y growing upward, while the
//! tessellator works in pixel units with y growing downward. The mapping
//! is a per-coordinate affine transform applied in place; picking
//! `x_scale = 2 / width` and `y_scale = -2 / height` maps the pixel
//! rectangle `width x height` onto the full device square.

use crate::StripError;
use glam::Vec2;

/// Maps a flat buffer of `(x, y)` pixel pairs into device space in place:
/// `x' = x * x_scale - 1`, `y' = y * y_scale + 1`.
///
/// The buffer must hold an even number of floats. No allocation.
pub fn map_pixels_to_device(
    coords: &mut [f32],
    x_scale: f32,
    y_scale: f32,
) -> Result<(), StripError> {
    if coords.len() % 2 != 0 {
        return Err(StripError::OddCoordinateCount(coords.len()));
    }
    for pair in coords.chunks_exact_mut(2) {
        pair[0] = pair[0] * x_scale - 1.0;
        pair[1] = pair[1] * y_scale + 1.0;
    }
    Ok(())
}

/// [`map_pixels_to_device`] over a point slice.
pub fn map_points_to_device(points: &mut [Vec2], x_scale: f32, y_scale: f32) {
    for point in points.iter_mut() {
        point.x = point.x * x_scale - 1.0;
        point.y = point.y * y_scale + 1.0;
    }
}
