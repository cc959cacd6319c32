//! Recording framebuffer for rendering tests.

use std::vec;
use std::vec::Vec;

use embedded_graphics::Pixel;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::colors::BACKGROUND;
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Screen-sized pixel store. Out-of-bounds pixels are dropped, as the panel
/// driver does.
pub struct Framebuffer {
    pixels: Vec<Rgb565>,
    /// Pixels written since creation, including out-of-bounds ones.
    pub writes: usize,
}

impl Framebuffer {
    pub fn new() -> Self { Self::filled(BACKGROUND) }

    pub fn filled(color: Rgb565) -> Self {
        Self {
            pixels: vec![color; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize],
            writes: 0,
        }
    }

    pub fn len(&self) -> usize { self.pixels.len() }

    pub fn pixel(
        &self,
        x: i32,
        y: i32,
    ) -> Option<Rgb565> {
        Self::offset(x, y).map(|i| self.pixels[i])
    }

    /// Pixels of `color` on the whole screen.
    pub fn count(
        &self,
        color: Rgb565,
    ) -> usize {
        self.pixels.iter().filter(|&&c| c == color).count()
    }

    /// Pixels of `color` inside a rectangle.
    pub fn count_in(
        &self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        color: Rgb565,
    ) -> usize {
        let mut n = 0;
        for py in y..y + h as i32 {
            for px in x..x + w as i32 {
                if self.pixel(px, py) == Some(color) {
                    n += 1;
                }
            }
        }
        n
    }

    fn offset(
        x: i32,
        y: i32,
    ) -> Option<usize> {
        if x < 0 || y < 0 || x >= SCREEN_WIDTH as i32 || y >= SCREEN_HEIGHT as i32 {
            return None;
        }
        Some(y as usize * SCREEN_WIDTH as usize + x as usize)
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size { Size::new(SCREEN_WIDTH, SCREEN_HEIGHT) }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.writes += 1;
            if let Some(i) = Self::offset(point.x, point.y) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }
}
