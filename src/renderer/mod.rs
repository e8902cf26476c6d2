//! Display surface abstraction
//!
//! Painting only needs the surface size and two primitives. `Framebuffer` is a
//! software implementation used by both hosts.

pub mod framebuffer;

pub use framebuffer::Framebuffer;

use image::Rgba;

use crate::assets::Sprite;
use crate::sim::Extent;

/// Axis-aligned pixel rectangle, top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Something the simulation can be painted onto
pub trait Surface {
    /// Current canvas bounds, queried every tick
    fn size(&self) -> Extent;

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>);

    /// Draw `sprite` scaled to fill `rect`
    fn draw_image(&mut self, sprite: &Sprite, rect: Rect);
}
