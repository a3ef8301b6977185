//! Polyline stroke tessellation.
//!
//! [`tessellate_stroke`] walks a polyline once and emits a triangle-strip
//! vertex sequence for a constant-thickness stroke: perpendicular offset
//! pairs along the segments, caps at subpath ends, miter/bevel/round
//! geometry at interior joints. Subpaths are separated in a single buffer
//! by [`subpath_break`] sentinels and stay connected in one strip through
//! degenerate (zero-area) bridge triangles.

use crate::StripError;
use glam::{vec2, Vec2};
use std::f32::consts::{FRAC_PI_2, PI};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Geometry terminating a subpath at its first and last points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum EndcapStyle {
    /// Flat cap at the exact endpoint.
    Butt,
    /// Semicircular cap fanned around the endpoint.
    Round,
}

/// Geometry connecting two consecutive segments at an interior point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum JoinStyle {
    /// Flat corner between the two edge perpendiculars.
    Bevel,
    /// Arc fan around the outer side of the corner.
    Round,
    /// Single extended corner vertex pair, unlimited length.
    Miter,
    /// Miter while it stays under the length limit derived from
    /// `join_resolution`, rounded bevel beyond it.
    MiterOrBevel,
}

/// Stroke shape parameters.
///
/// `thickness` is the perpendicular offset distance, i.e. the stroke
/// half-width. The resolutions are angular steps in radians: smaller
/// values produce denser round-cap and round-join fans.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct StrokeOptions {
    pub thickness: f32,
    pub endcap: EndcapStyle,
    pub endcap_resolution: f32,
    pub join: JoinStyle,
    pub join_resolution: f32,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self {
            thickness: 1.0,
            endcap: EndcapStyle::Butt,
            endcap_resolution: 0.3,
            join: JoinStyle::MiterOrBevel,
            join_resolution: 0.25,
        }
    }
}

impl StrokeOptions {
    /// Default caps and joins with the given stroke half-width.
    pub fn with_thickness(thickness: f32) -> Self {
        Self {
            thickness,
            ..Self::default()
        }
    }

    pub fn endcap(mut self, style: EndcapStyle, resolution: f32) -> Self {
        self.endcap = style;
        self.endcap_resolution = resolution;
        self
    }

    pub fn join(mut self, style: JoinStyle, resolution: f32) -> Self {
        self.join = style;
        self.join_resolution = resolution;
        self
    }

    fn validate(&self) -> Result<(), StripError> {
        if !self.thickness.is_finite() || !(self.thickness > 0.0) {
            return Err(StripError::NonPositiveThickness(self.thickness));
        }
        for &resolution in &[self.endcap_resolution, self.join_resolution] {
            if !resolution.is_finite() || !(resolution > 0.0) {
                return Err(StripError::NonPositiveResolution(resolution));
            }
        }
        Ok(())
    }
}

/// Sentinel separating subpaths inside one point buffer.
///
/// Not a renderable point; both coordinates are NaN. A break may not sit
/// at the first or last position of a buffer and two breaks may not be
/// adjacent.
pub fn subpath_break() -> Vec2 {
    vec2(f32::NAN, f32::NAN)
}

/// Whether `point` is the [`subpath_break`] sentinel.
pub fn is_subpath_break(point: Vec2) -> bool {
    point.x.is_nan() && point.y.is_nan()
}

/// One slot of the sliding window: past either end of the buffer, on a
/// break sentinel, or on a real point.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Empty,
    Break,
    Point(Vec2),
}

impl Slot {
    fn of(point: Vec2) -> Slot {
        if is_subpath_break(point) {
            Slot::Break
        } else {
            Slot::Point(point)
        }
    }

    fn point(self) -> Option<Vec2> {
        match self {
            Slot::Point(p) => Some(p),
            _ => None,
        }
    }
}

/// Three-slot window over the polyline: previous, current, next.
#[derive(Debug, Clone, Copy)]
struct Window {
    slots: [Slot; 3],
}

impl Window {
    fn new() -> Self {
        Self {
            slots: [Slot::Empty; 3],
        }
    }

    fn shift(&mut self, incoming: Slot) {
        self.slots = [self.slots[1], self.slots[2], incoming];
    }

    fn prev(&self) -> Slot {
        self.slots[0]
    }

    fn cur(&self) -> Slot {
        self.slots[1]
    }

    fn next(&self) -> Slot {
        self.slots[2]
    }
}

/// Walk state carried across the pass.
struct Walk {
    /// Strip vertices emitted so far.
    out: Vec<Vec2>,
    /// Most recent valid perpendicular offset, reused when a zero-length
    /// edge cannot provide one.
    perp: Vec2,
}

impl Walk {
    /// Scaled perpendicular of the edge `from -> to`, falling back to the
    /// neighboring offset when the edge has no direction.
    fn edge_perp(&mut self, from: Vec2, to: Vec2, thickness: f32) -> Vec2 {
        match (to - from).try_normalize() {
            Some(dir) => {
                self.perp = vec2(dir.y, -dir.x) * thickness;
                self.perp
            }
            None => {
                log::debug!(
                    "zero-length edge at ({}, {}), reusing neighboring offset",
                    from.x,
                    from.y
                );
                self.perp
            }
        }
    }

    fn pair(&mut self, center: Vec2, offset: Vec2) {
        self.out.push(center + offset);
        self.out.push(center - offset);
    }

    /// Arc fan: `steps + 1` vertex pairs on the circle of `radius` around
    /// `center`, swept from `start_angle` over `sweep`, each rim vertex
    /// paired with the center.
    fn fan(&mut self, center: Vec2, radius: f32, start_angle: f32, sweep: f32, resolution: f32) {
        let steps = ((sweep.abs() / resolution).ceil() as usize).max(1);
        self.out.reserve((steps + 1) * 2);
        for step in 0..=steps {
            let angle = start_angle + sweep * step as f32 / steps as f32;
            self.out
                .push(center + vec2(angle.cos(), angle.sin()) * radius);
            self.out.push(center);
        }
    }
}

/// Axis along which a miter joint offsets its two vertices.
enum MiterAxis {
    /// Bisector of the reversed incoming and the outgoing directions.
    Oblique(Vec2),
    /// The edges continue straight or reverse onto each other; the
    /// bisector degenerates and the trailing-edge perpendicular stands in.
    Colinear(Vec2),
}

fn miter_axis(d1: Vec2, d2: Vec2) -> MiterAxis {
    match (d2 - d1).try_normalize() {
        Some(bisector) if d1.perp_dot(bisector).abs() > 1e-4 => MiterAxis::Oblique(bisector),
        _ => MiterAxis::Colinear(vec2(d1.y, -d1.x)),
    }
}

/// Tessellates a stroked polyline into a triangle-strip vertex sequence.
///
/// `points` may contain [`subpath_break`] sentinels splitting it into
/// independently capped subpaths; the subpaths stay in one strip,
/// separated by zero-area bridge triangles. The returned buffer is owned
/// by the caller; consecutive vertex triples form the strip's triangles.
///
/// Zero-length edges and reversals are not errors; their geometry
/// degenerates to duplicated vertices and the output never contains a
/// non-finite coordinate.
pub fn tessellate_stroke(
    points: &[Vec2],
    options: &StrokeOptions,
) -> Result<Vec<Vec2>, StripError> {
    options.validate()?;
    validate_points(points)?;

    let mut walk = Walk {
        out: Vec::with_capacity(points.len() * 2 + 16),
        perp: vec2(0.0, 0.0),
    };
    let mut window = Window::new();
    if let Some(&first) = points.first() {
        window.shift(Slot::of(first));
    }
    for index in 0..points.len() {
        let incoming = match points.get(index + 1) {
            Some(&point) => Slot::of(point),
            None => Slot::Empty,
        };
        window.shift(incoming);
        step(&mut walk, &window, options);
    }
    log::trace!(
        "tessellated {} points into {} strip vertices",
        points.len(),
        walk.out.len()
    );
    Ok(walk.out)
}

/// [`tessellate_stroke`] over a flat coordinate buffer of `(x, y)` pairs,
/// for hosts that keep their geometry in plain float arrays.
pub fn tessellate_stroke_flat(
    coords: &[f32],
    options: &StrokeOptions,
) -> Result<Vec<Vec2>, StripError> {
    if coords.len() % 2 != 0 {
        return Err(StripError::OddCoordinateCount(coords.len()));
    }
    let points: Vec<Vec2> = coords.chunks_exact(2).map(|c| vec2(c[0], c[1])).collect();
    tessellate_stroke(&points, options)
}

fn validate_points(points: &[Vec2]) -> Result<(), StripError> {
    let mut on_break = false;
    for (index, &point) in points.iter().enumerate() {
        if is_subpath_break(point) {
            if index == 0 || index + 1 == points.len() {
                return Err(StripError::BreakAtBoundary { index });
            }
            if on_break {
                return Err(StripError::AdjacentBreaks { index });
            }
            on_break = true;
        } else {
            if !point.x.is_finite() || !point.y.is_finite() {
                return Err(StripError::NonFinitePoint { index });
            }
            on_break = false;
        }
    }
    Ok(())
}

fn step(walk: &mut Walk, window: &Window, options: &StrokeOptions) {
    let cur = match window.cur() {
        Slot::Point(p) => p,
        // Breaks emit nothing themselves; the bridge into the next
        // subpath is produced by its start cap.
        _ => return,
    };
    match (window.prev().point(), window.next().point()) {
        // A one-point subpath has no segment to stroke.
        (None, None) => {}
        (None, Some(next)) => start_cap(walk, cur, next, options),
        (Some(prev), None) => end_cap(walk, prev, cur, options),
        (Some(prev), Some(next)) => joint(walk, prev, cur, next, options),
    }
}

fn start_cap(walk: &mut Walk, cur: Vec2, next: Vec2, options: &StrokeOptions) {
    let thickness = options.thickness;
    let perp = walk.edge_perp(cur, next, thickness);
    if let Some(&last) = walk.out.last() {
        // Bridge from the previous subpath: repeating its last vertex and
        // this cap's first makes every triangle across the gap zero-area.
        walk.out.push(last);
        walk.out.push(cur + perp);
    }
    walk.pair(cur, perp);
    if options.endcap == EndcapStyle::Round {
        if let Some(dir) = perp.try_normalize() {
            // Sweep from +perp through the back side of the cap to -perp.
            let start_angle = dir.y.atan2(dir.x);
            walk.fan(cur, thickness, start_angle, -PI, options.endcap_resolution);
            // Close on the flat pair again so the strip's live edge
            // re-enters the segment body without losing coverage.
            walk.pair(cur, perp);
        }
    }
}

fn end_cap(walk: &mut Walk, prev: Vec2, cur: Vec2, options: &StrokeOptions) {
    let thickness = options.thickness;
    let perp = walk.edge_perp(prev, cur, thickness);
    walk.pair(cur, perp);
    if options.endcap == EndcapStyle::Round {
        if let Some(dir) = perp.try_normalize() {
            // Sweep forward, past the endpoint.
            let start_angle = dir.y.atan2(dir.x);
            walk.fan(cur, thickness, start_angle, PI, options.endcap_resolution);
        }
    }
}

fn joint(walk: &mut Walk, prev: Vec2, cur: Vec2, next: Vec2, options: &StrokeOptions) {
    let thickness = options.thickness;
    let v1 = cur - prev;
    let v2 = next - cur;
    let directions = match (v1.try_normalize(), v2.try_normalize()) {
        (Some(d1), Some(d2)) => Some((d1, d2)),
        _ => None,
    };

    if matches!(options.join, JoinStyle::Miter | JoinStyle::MiterOrBevel) {
        if let Some((d1, d2)) = directions {
            let axis = match miter_axis(d1, d2) {
                MiterAxis::Oblique(axis) => axis,
                MiterAxis::Colinear(axis) => axis,
            };
            // Nonzero by construction of the axis.
            let across = v1.perp_dot(axis);
            let miter_scale = thickness * v1.length() / across;
            let max_miter = thickness / (options.join_resolution * 0.5).cos();
            let accepted = match options.join {
                JoinStyle::Miter => true,
                _ => miter_scale.abs() < max_miter,
            };
            if accepted {
                walk.out.push(cur - axis * miter_scale);
                walk.out.push(cur + axis * miter_scale);
                walk.perp = vec2(d2.y, -d2.x) * thickness;
                return;
            }
        }
    }

    // Bevel fallback: one pair per edge perpendicular, with an arc fan on
    // the outer side of the corner for the rounded styles.
    let trailing = walk.edge_perp(prev, cur, thickness);
    walk.pair(cur, trailing);
    if matches!(options.join, JoinStyle::Round | JoinStyle::MiterOrBevel) {
        if let Some((d1, d2)) = directions {
            let a1 = d1.y.atan2(d1.x).rem_euclid(2.0 * PI);
            let a2 = d2.y.atan2(d2.x).rem_euclid(2.0 * PI);
            // Shorter of the two arcs between the edge angles; the sign is
            // the turn direction.
            let mut turn = a2 - a1;
            if turn > PI {
                turn -= 2.0 * PI;
            }
            if turn < -PI {
                turn += 2.0 * PI;
            }
            if turn.abs() > 1e-6 {
                // Outer side of the corner: right of the walk on a left
                // turn, left of it on a right turn.
                let side = if turn > 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 };
                walk.fan(cur, thickness, a1 + side, turn, options.join_resolution);
            }
        }
    }
    let leading = walk.edge_perp(cur, next, thickness);
    walk.pair(cur, leading);
}
