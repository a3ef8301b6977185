use crate::FromPos2Color;
use core::marker::Copy;
use glam::Vec2;
use miniquad::{Bindings, Buffer, BufferType, Context};
use std::mem::{size_of, take};

type IndexType = u16;

const NUM_FRAMES: usize = 2;
/// One buffer window holds at most this many vertices so its indices fit
/// into 16 bits.
const MAX_BUFFER_VERTICES: usize = IndexType::MAX as usize + 1;
const MAX_BUFFER_INDICES: usize = (MAX_BUFFER_VERTICES - 2) * 3;

/// [`miniquad`]-backend for strip meshes.
///
/// # Functionality
/// - Accumulates tessellated strips into one running strip, chaining
///   consecutive meshes with degenerate bridge vertices. See
///   [`MiniquadStrip::add_strip`].
/// - Expands the strip into an indexed triangle list at draw time (the
///   backend draws indexed triangles) and uploads it into streamed
///   vertex/index buffers, splitting into several buffer pairs when the
///   16-bit index range would overflow. See [`MiniquadStrip::draw`].
/// - Cycles pooled buffers across frames to avoid writing into a buffer
///   that is still being rendered. See [`MiniquadStrip::begin_frame`].
///
/// # Example
///
/// ```ignore
/// impl miniquad::EventHandler for App {
///     fn draw(&mut self, context: &mut miniquad::Context) {
///         context.begin_default_pass(Default::default());
///         self.batch.begin_frame();
///         self.batch.clear();
///         let strip = tessellate_stroke(&self.points, &self.options).unwrap();
///         self.batch.add_strip(&strip, [255, 0, 0, 255]);
///
///         context.apply_pipeline(&self.pipeline);
///         self.batch.draw(context);
///
///         context.end_render_pass();
///         context.commit_frame();
///     }
/// }
/// ```
///
/// [`miniquad`]: https://docs.rs/miniquad/
pub struct MiniquadStrip<Vertex: Copy> {
    /// Accumulated strip vertices for the frame.
    pub vertices: Vec<Vertex>,

    vertex_pool: [Vec<Buffer>; NUM_FRAMES],
    index_pool: [Vec<Buffer>; NUM_FRAMES],
    temp_bindings: Option<Bindings>,
    temp_indices: Vec<IndexType>,
    frame: usize,
}

impl<Vertex: Copy> MiniquadStrip<Vertex> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            vertex_pool: [Vec::new(), Vec::new()],
            index_pool: [Vec::new(), Vec::new()],
            temp_bindings: None,
            temp_indices: Vec::new(),
            frame: 0,
        }
    }

    /// Marks beginning of the frame by performing rotation of buffers.
    ///
    /// This is done to prevent writing into buffers that are being used
    /// for rendering the current or past frame.
    pub fn begin_frame(&mut self) {
        self.frame = (self.frame + 1) % NUM_FRAMES;
        // move unused buffers to the next frame
        let mut unused_vertices = std::mem::replace(&mut self.vertex_pool[self.frame], Vec::new());
        self.vertex_pool[(self.frame + 1) % NUM_FRAMES].extend(unused_vertices.drain(..));
        let mut unused_indices = std::mem::replace(&mut self.index_pool[self.frame], Vec::new());
        self.index_pool[(self.frame + 1) % NUM_FRAMES].extend(unused_indices.drain(..));
        self.vertex_pool[self.frame] = unused_vertices;
        self.index_pool[self.frame] = unused_indices;
    }

    /// Performs actual rendering.
    ///
    /// Does not clear the accumulated strip, can be called multiple times
    /// to render exactly the same geometry.
    pub fn draw(&mut self, c: &mut Context) {
        let total = self.vertices.len();
        if total < 3 {
            return;
        }

        let mut bindings = self.temp_bindings.take();
        let mut indices = take(&mut self.temp_indices);

        for (start, end) in window_ranges(total, MAX_BUFFER_VERTICES) {
            let window = &self.vertices[start..end];
            strip_indices(start, window.len(), &mut indices);

            let vertex_capacity = MAX_BUFFER_VERTICES * size_of::<Vertex>();
            let vb = self.vertex_pool[(self.frame + 1) % NUM_FRAMES]
                .pop()
                .unwrap_or_else(|| Buffer::stream(c, BufferType::VertexBuffer, vertex_capacity));
            assert!(vertex_capacity == vb.size());
            vb.update(c, window);
            self.vertex_pool[self.frame].push(vb.clone());

            let index_capacity = MAX_BUFFER_INDICES * size_of::<IndexType>();
            let ib = self.index_pool[(self.frame + 1) % NUM_FRAMES]
                .pop()
                .unwrap_or_else(|| Buffer::stream(c, BufferType::IndexBuffer, index_capacity));
            assert!(index_capacity == ib.size());
            ib.update(c, &indices);
            self.index_pool[self.frame].push(ib.clone());

            match &mut bindings {
                Some(bindings) => {
                    bindings.vertex_buffers[0] = vb;
                    bindings.index_buffer = ib;
                }
                None => {
                    bindings = Some(Bindings {
                        vertex_buffers: vec![vb],
                        index_buffer: ib,
                        images: Vec::new(),
                    });
                }
            }
            if let Some(bindings) = &bindings {
                c.apply_bindings(bindings);
                c.draw(0, indices.len() as i32, 1);
            }
        }

        self.temp_bindings = bindings;
        self.temp_indices = indices;
    }

    /// Drops the accumulated strip.
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Performs `draw()` followed by `clear()`
    pub fn flush(&mut self, c: &mut Context) {
        self.draw(c);
        self.clear();
    }
}

impl<Vertex: Copy + FromPos2Color> MiniquadStrip<Vertex> {
    /// Appends a tessellated strip mesh in a single `color`.
    ///
    /// Consecutive meshes are chained into the running strip through a
    /// two-vertex degenerate bridge, so a frame's worth of strokes still
    /// renders as one batch.
    pub fn add_strip(&mut self, points: &[Vec2], color: [u8; 4]) {
        if points.len() < 3 {
            return;
        }
        let first = Vertex::from_pos2_color(points[0].into(), color);
        if let Some(&last) = self.vertices.last() {
            self.vertices.push(last);
            self.vertices.push(first);
        }
        self.vertices.reserve(points.len());
        for &point in points {
            self.vertices.push(Vertex::from_pos2_color(point.into(), color));
        }
    }
}

impl<Vertex: Copy> Drop for MiniquadStrip<Vertex> {
    fn drop(&mut self) {
        for pool in &mut self.vertex_pool {
            for b in pool {
                b.delete();
            }
        }
        for pool in &mut self.index_pool {
            for b in pool {
                b.delete();
            }
        }
    }
}

/// Vertex ranges to upload so that every strip triangle lands in some
/// window: consecutive windows overlap by the two vertices their seam
/// triangles share.
fn window_ranges(total: usize, max_vertices: usize) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;
    while start + 2 < total {
        let end = (start + max_vertices).min(total);
        ranges.push((start, end));
        if end == total {
            break;
        }
        start = end - 2;
    }
    ranges
}

/// Expands `window_len` strip vertices into an indexed triangle list.
///
/// `first_triangle` is the strip-global index of the window's first
/// triangle; odd triangles are emitted flipped so the list keeps the
/// uniform winding the strip implies.
fn strip_indices(first_triangle: usize, window_len: usize, out: &mut Vec<IndexType>) {
    out.clear();
    for i in 0..window_len.saturating_sub(2) {
        let (a, b) = if (first_triangle + i) % 2 == 0 {
            (i, i + 1)
        } else {
            (i + 1, i)
        };
        out.push(a as IndexType);
        out.push(b as IndexType);
        out.push((i + 2) as IndexType);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_strips_fit_one_window() {
        assert!(window_ranges(0, 65536).is_empty());
        assert!(window_ranges(2, 65536).is_empty());
        assert_eq!(window_ranges(3, 65536), vec![(0, 3)]);
        assert_eq!(window_ranges(65536, 65536), vec![(0, 65536)]);
    }

    #[test]
    fn long_strips_split_with_two_vertex_overlap() {
        assert_eq!(window_ranges(10, 6), vec![(0, 6), (4, 10)]);
        assert_eq!(window_ranges(7, 6), vec![(0, 6), (4, 7)]);

        // Every strip triangle appears in exactly one window.
        for &(total, max) in &[(10usize, 6usize), (7, 6), (100, 17), (65538, 65536)] {
            let ranges = window_ranges(total, max);
            let mut triangles = 0;
            for &(start, end) in &ranges {
                assert!(end - start <= max);
                triangles += (end - start) - 2;
                if end != total {
                    assert_eq!(
                        ranges[ranges.iter().position(|r| r.0 == start).unwrap() + 1].0,
                        end - 2
                    );
                }
            }
            assert_eq!(triangles, total - 2);
        }
    }

    #[test]
    fn strip_expansion_alternates_winding() {
        let mut indices = Vec::new();
        strip_indices(0, 5, &mut indices);
        assert_eq!(indices, vec![0, 1, 2, 2, 1, 3, 2, 3, 4]);

        // A window starting on an odd strip triangle flips the other set.
        strip_indices(1, 4, &mut indices);
        assert_eq!(indices, vec![1, 0, 2, 1, 2, 3]);

        strip_indices(0, 2, &mut indices);
        assert!(indices.is_empty());
    }
}
