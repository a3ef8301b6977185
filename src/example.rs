use crate::FromPos2Color;
use core::default::Default;

#[repr(C)]
#[derive(Copy, Clone)]
/// Example of a struct implementing the vertex traits for a custom
/// vertex format.
///
/// See the [`FromPos2Color`] implementation below.
pub struct VertexPos2Color {
    pub pos: [f32; 2],
    pub color: [u8; 4],
}

impl VertexPos2Color {
    pub fn of_color(color: [u8; 4]) -> Self {
        Self {
            pos: [0f32, 0f32],
            color,
        }
    }
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for VertexPos2Color {
    fn default() -> Self {
        Self {
            pos: [0f32, 0f32],
            color: [0, 0, 0, 0],
        }
    }
}

impl FromPos2Color for VertexPos2Color {
    fn from_pos2_color(pos: [f32; 2], color: [u8; 4]) -> Self {
        Self { pos, color }
    }
}
