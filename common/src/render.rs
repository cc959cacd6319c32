//! Waveform rendering.
//!
//! A record becomes one filled rectangle per sample column. Consecutive samples
//! more than one pixel apart are joined by a vertical bar so steep edges stay
//! continuous; jumps larger than half the plot height are drawn as isolated
//! points.
//!
//! Rendering is stateless: the same record and midpoint always produce the
//! same primitives.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::colors::{BACKGROUND, WAVEFORM};
use crate::config::{PixelScale, WD_HEIGHT, WD_OFFSETX, WD_OFFSETY, WD_WIDTH};
use crate::record::WaveformStats;

/// Plot window; nothing is drawn or cleared outside it.
pub const PLOT_AREA: Rectangle = Rectangle::new(Point::new(WD_OFFSETX, WD_OFFSETY), Size::new(WD_WIDTH, WD_HEIGHT));

/// Largest pixel jump still joined to the previous sample.
const MAX_JOIN: i32 = (WD_HEIGHT / 2) as i32;

/// Side of the square drawn for each sample.
const POINT: u32 = 2;

/// Maps a record to fill rectangles.
#[derive(Clone, Copy, Debug)]
pub struct WaveformRenderer {
    scale: PixelScale,
}

impl WaveformRenderer {
    pub const fn new(scale: PixelScale) -> Self { Self { scale } }

    /// Rectangles for `record` drawn around the zero line at `midpoint`,
    /// one per sample, left to right.
    pub fn primitives<'a>(
        &self,
        record: &'a [u16],
        midpoint: i32,
    ) -> WaveformPrimitives<'a> {
        WaveformPrimitives {
            record,
            scale: self.scale,
            midpoint,
            index: 0,
            prev: 0,
        }
    }

    /// Draw `record` in the waveform color, clipped to the plot window.
    pub fn draw<D>(
        &self,
        display: &mut D,
        record: &[u16],
        midpoint: i32,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let mut plot = display.clipped(&PLOT_AREA);
        for rect in self.primitives(record, midpoint) {
            plot.fill_solid(&rect, WAVEFORM).ok();
        }
    }

    /// Band covered by the waveform last drawn with `stats`, with a margin
    /// above and below, limited to the plot window.
    pub fn previous_band(
        &self,
        stats: &WaveformStats,
    ) -> Rectangle {
        let top = stats.midpoint - self.scale.map_to_pixel(stats.max) - 10;
        let span = self.scale.map_to_pixel(stats.max.saturating_sub(stats.min));
        Rectangle::new(Point::new(WD_OFFSETX, top), Size::new(WD_WIDTH, span as u32 + 23)).intersection(&PLOT_AREA)
    }

    /// Erase the waveform last drawn with `stats`.
    pub fn clear_previous<D>(
        &self,
        display: &mut D,
        stats: &WaveformStats,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        display.fill_solid(&self.previous_band(stats), BACKGROUND).ok();
    }
}

impl Default for WaveformRenderer {
    fn default() -> Self { Self::new(PixelScale::DEFAULT) }
}

/// Iterator returned by [`WaveformRenderer::primitives`].
pub struct WaveformPrimitives<'a> {
    record: &'a [u16],
    scale: PixelScale,
    midpoint: i32,
    index: usize,
    /// Pixel offset of the previous sample.
    prev: i32,
}

impl Iterator for WaveformPrimitives<'_> {
    type Item = Rectangle;

    fn next(&mut self) -> Option<Rectangle> {
        let &raw = self.record.get(self.index)?;
        let current = self.scale.map_to_pixel(raw);
        let x = WD_OFFSETX + self.index as i32;
        let mid = self.midpoint;

        let rect = if self.index == 0 {
            point(x, mid - current)
        } else {
            let diff = current - self.prev;
            if diff > 1 && diff <= MAX_JOIN {
                Rectangle::new(Point::new(x, mid - current), Size::new(POINT, (diff + 2) as u32))
            } else if diff < -1 && diff >= -MAX_JOIN {
                Rectangle::new(Point::new(x, mid - self.prev), Size::new(POINT, (2 - diff) as u32))
            } else {
                point(x, mid - current)
            }
        };

        self.prev = current;
        self.index += 1;
        Some(rect)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.record.len().saturating_sub(self.index);
        (left, Some(left))
    }
}

impl ExactSizeIterator for WaveformPrimitives<'_> {}

#[inline]
fn point(
    x: i32,
    y: i32,
) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(POINT, POINT))
}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use super::*;
    use crate::config::{ADC_MAX, RECORD_LEN, WD_BOTTOM, WD_MIDY};

    fn rects(
        record: &[u16],
        midpoint: i32,
    ) -> Vec<Rectangle> {
        WaveformRenderer::default().primitives(record, midpoint).collect()
    }

    #[test]
    fn test_one_primitive_per_sample() {
        let record = [1000u16; RECORD_LEN];
        let out = rects(&record, WD_MIDY);
        assert_eq!(out.len(), RECORD_LEN);
        assert_eq!(out[0].top_left.x, WD_OFFSETX);
        assert_eq!(out[RECORD_LEN - 1].top_left.x, WD_OFFSETX + RECORD_LEN as i32 - 1);
    }

    #[test]
    fn test_flat_record_draws_points() {
        let record = [0u16; 4];
        for rect in rects(&record, WD_MIDY) {
            assert_eq!(rect.size, Size::new(2, 2));
            assert_eq!(rect.top_left.y, WD_MIDY);
        }
    }

    #[test]
    fn test_rising_gap_is_filled() {
        // Pixel offsets 0 then 50.
        let record = [0u16, 2048];
        let scale = PixelScale::DEFAULT;
        let cur = scale.map_to_pixel(2048);
        let out = rects(&record, WD_MIDY);
        assert_eq!(out[1].top_left, Point::new(WD_OFFSETX + 1, WD_MIDY - cur));
        assert_eq!(out[1].size, Size::new(2, (cur + 2) as u32));
    }

    #[test]
    fn test_falling_gap_is_filled() {
        let record = [2048u16, 0];
        let scale = PixelScale::DEFAULT;
        let prev = scale.map_to_pixel(2048);
        let out = rects(&record, WD_MIDY);
        assert_eq!(out[1].top_left, Point::new(WD_OFFSETX + 1, WD_MIDY - prev));
        assert_eq!(out[1].size, Size::new(2, (2 + prev) as u32));
    }

    #[test]
    fn test_one_pixel_step_draws_point() {
        let scale = PixelScale::DEFAULT;
        // Find a raw value one pixel above zero.
        let raw = (0..=ADC_MAX).find(|&r| scale.map_to_pixel(r) == 1).unwrap();
        let out = rects(&[0, raw], WD_MIDY);
        assert_eq!(out[1].size, Size::new(2, 2));
        assert_eq!(out[1].top_left.y, WD_MIDY - 1);
    }

    /// Full ADC range spans the whole plot height.
    fn tall_renderer() -> WaveformRenderer { WaveformRenderer::new(PixelScale::new(WD_HEIGHT, ADC_MAX as u32)) }

    #[test]
    fn test_jump_beyond_half_height_draws_point() {
        let renderer = tall_renderer();
        let out: Vec<Rectangle> = renderer.primitives(&[0, ADC_MAX], WD_BOTTOM).collect();
        assert_eq!(renderer.scale.map_to_pixel(ADC_MAX), WD_HEIGHT as i32);
        assert_eq!(out[1].size, Size::new(2, 2));
        assert_eq!(out[1].top_left, Point::new(WD_OFFSETX + 1, WD_BOTTOM - WD_HEIGHT as i32));

        let out: Vec<Rectangle> = renderer.primitives(&[ADC_MAX, 0], WD_BOTTOM).collect();
        assert_eq!(out[1].size, Size::new(2, 2));
        assert_eq!(out[1].top_left.y, WD_BOTTOM);
    }

    #[test]
    fn test_jump_of_exactly_half_height_is_joined() {
        let renderer = tall_renderer();
        let half = MAX_JOIN;
        let raw = (0..=ADC_MAX).find(|&r| renderer.scale.map_to_pixel(r) == half).unwrap();

        let out: Vec<Rectangle> = renderer.primitives(&[0, raw], WD_BOTTOM).collect();
        assert_eq!(out[1].top_left, Point::new(WD_OFFSETX + 1, WD_BOTTOM - half));
        assert_eq!(out[1].size, Size::new(2, (half + 2) as u32));

        let out: Vec<Rectangle> = renderer.primitives(&[raw, 0], WD_BOTTOM).collect();
        assert_eq!(out[1].top_left, Point::new(WD_OFFSETX + 1, WD_BOTTOM - half));
        assert_eq!(out[1].size, Size::new(2, (half + 2) as u32));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let mut record = [0u16; RECORD_LEN];
        for (i, s) in record.iter_mut().enumerate() {
            *s = ((i * 97) % 4096) as u16;
        }
        assert_eq!(rects(&record, 90), rects(&record, 90));
    }

    #[test]
    fn test_previous_band_covers_waveform() {
        let renderer = WaveformRenderer::default();
        let record = [ADC_MAX, 0, ADC_MAX, 0];
        let stats = WaveformStats {
            midpoint: WD_MIDY,
            min: 0,
            max: ADC_MAX,
            frequency: 0.0,
        };
        let band = renderer.previous_band(&stats);
        let band_bottom = band.top_left.y + band.size.height as i32;
        for rect in renderer.primitives(&record, WD_MIDY) {
            assert!(rect.top_left.y >= band.top_left.y);
            assert!(rect.top_left.y + rect.size.height as i32 <= band_bottom);
        }
    }
}
