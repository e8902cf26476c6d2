//! Software RGBA surface
//!
//! Sprites are scaled with nearest-neighbour sampling and alpha blended over
//! what is already there. Everything is clipped to the buffer.

use std::path::Path;

use image::{Rgba, RgbaImage};

use super::{Rect, Surface};
use crate::assets::Sprite;
use crate::sim::Extent;

pub struct Framebuffer {
    pixels: RgbaImage,
}

impl Framebuffer {
    /// Colour of a freshly created or resized buffer
    pub const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 255]);

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Self::CLEAR),
        }
    }

    /// Resize (contents are discarded)
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.pixels.dimensions() != (width, height) {
            self.pixels = RgbaImage::from_pixel(width, height, Self::CLEAR);
        }
    }

    pub fn clear(&mut self, color: Rgba<u8>) {
        for p in self.pixels.pixels_mut() {
            *p = color;
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixels.get_pixel_checked(x, y).copied()
    }

    /// Raw RGBA bytes, row-major
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn save_png(&self, path: &Path) -> Result<(), String> {
        self.pixels
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| format!("Failed to write {}: {e}", path.display()))
    }

    /// `rect` intersected with the buffer, as half-open pixel ranges
    fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let (w, h) = self.pixels.dimensions();
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = rect.right().min(w as i32);
        let y1 = rect.bottom().min(h as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

impl Surface for Framebuffer {
    fn size(&self) -> Extent {
        let (w, h) = self.pixels.dimensions();
        Extent::new(w as i32, h as i32)
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let dst = self.pixels.get_pixel_mut(x, y);
                *dst = blend(*dst, color);
            }
        }
    }

    fn draw_image(&mut self, sprite: &Sprite, rect: Rect) {
        if rect.width <= 0 || rect.height <= 0 || sprite.width() == 0 || sprite.height() == 0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        let src = sprite.pixels();
        let (sw, sh) = (src.width() as i64, src.height() as i64);
        for y in y0..y1 {
            let sy = (y as i64 - rect.y as i64) * sh / rect.height as i64;
            for x in x0..x1 {
                let sx = (x as i64 - rect.x as i64) * sw / rect.width as i64;
                let color = *src.get_pixel(sx as u32, sy as u32);
                let dst = self.pixels.get_pixel_mut(x, y);
                *dst = blend(*dst, color);
            }
        }
    }
}

/// Source-over blend of `src` onto `dst`
fn blend(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let a = src[3] as u32;
    match a {
        255 => src,
        0 => dst,
        _ => {
            let inv = 255 - a;
            let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
            let out_a = a + (dst[3] as u32 * inv + 127) / 255;
            Rgba([
                mix(src[0], dst[0]),
                mix(src[1], dst[1]),
                mix(src[2], dst[2]),
                out_a as u8,
            ])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn test_size_reports_dimensions() {
        let fb = Framebuffer::new(600, 400);
        assert_eq!(fb.size(), Extent::new(600, 400));
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut fb = Framebuffer::new(10, 10);
        fb.fill_rect(Rect::new(-5, 8, 8, 10), WHITE);
        assert_eq!(fb.pixel(0, 9), Some(WHITE));
        assert_eq!(fb.pixel(2, 8), Some(WHITE));
        assert_eq!(fb.pixel(3, 9), Some(Framebuffer::CLEAR));
        assert_eq!(fb.pixel(0, 7), Some(Framebuffer::CLEAR));
    }

    #[test]
    fn test_fill_rect_fully_outside() {
        let mut fb = Framebuffer::new(4, 4);
        fb.fill_rect(Rect::new(10, 10, 3, 3), WHITE);
        assert!(fb.image().pixels().all(|p| *p == Framebuffer::CLEAR));
    }

    #[test]
    fn test_draw_image_scales_nearest() {
        // 2x1 sprite: red | blue, drawn at 4x2
        let mut pixels = RgbaImage::new(2, 1);
        pixels.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        pixels.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
        let sprite = Sprite::new("rb", pixels);

        let mut fb = Framebuffer::new(8, 8);
        fb.draw_image(&sprite, Rect::new(2, 3, 4, 2));
        assert_eq!(fb.pixel(2, 3), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(fb.pixel(3, 4), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(fb.pixel(4, 3), Some(Rgba([0, 0, 255, 255])));
        assert_eq!(fb.pixel(5, 4), Some(Rgba([0, 0, 255, 255])));
        assert_eq!(fb.pixel(6, 3), Some(Framebuffer::CLEAR));
        assert_eq!(fb.pixel(2, 5), Some(Framebuffer::CLEAR));
    }

    #[test]
    fn test_transparent_pixels_keep_background() {
        let sprite = Sprite::solid("clear", 2, 2, Rgba([9, 9, 9, 0]));
        let mut fb = Framebuffer::new(4, 4);
        fb.clear(WHITE);
        fb.draw_image(&sprite, Rect::new(0, 0, 4, 4));
        assert!(fb.image().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_half_alpha_blend() {
        let out = blend(Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 128]));
        assert!((127..=129).contains(&out[0]));
        assert_eq!(out[3], 255);
    }

    #[test]
    fn test_resize_discards() {
        let mut fb = Framebuffer::new(2, 2);
        fb.clear(WHITE);
        fb.resize(3, 1);
        assert_eq!(fb.size(), Extent::new(3, 1));
        assert_eq!(fb.pixel(0, 0), Some(Framebuffer::CLEAR));
    }
}
