//! Time/voltage cursor lines and readout.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use heapless::String;

use super::info::draw_label;
use super::primitives::{clear_block, fill_block};
use crate::colors::CURSOR;
use crate::config::{
    TVC_LABEL_HEIGHT,
    TVC_LABEL_OFFSETX,
    TVC_LABEL_OFFSETY,
    TVC_LABEL_SIZE,
    WD_BOTTOM,
    WD_HEIGHT,
    WD_OFFSETX,
    WD_OFFSETY,
    WD_WIDTH,
};
use crate::cursor::CursorAnalyzer;

/// Row of the time readout, below the voltage readout.
const TVC_TIME_OFFSETY: i32 = TVC_LABEL_OFFSETY + 18;

/// Draw the horizontal line at `row` and the vertical line at sample `index`.
///
/// Nothing is drawn when either line would fall outside the plot.
pub fn draw_cursor_lines<D>(
    display: &mut D,
    index: usize,
    row: i32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    if row < WD_OFFSETY || row >= WD_BOTTOM || index >= WD_WIDTH as usize {
        return;
    }

    fill_block(display, WD_OFFSETX, row, WD_WIDTH, 1, CURSOR);
    fill_block(display, WD_OFFSETX + index as i32, WD_OFFSETY, 1, WD_HEIGHT, CURSOR);
}

/// Voltage and time readout for the sample under the cursor.
pub fn draw_cursor_labels<D>(
    display: &mut D,
    cursor: &CursorAnalyzer,
    record: &[u16],
    timebase_us: u16,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let mut label: String<24> = String::new();

    write!(label, "Voltage:{}", cursor.voltage_label(record)).ok();
    draw_label(display, TVC_LABEL_OFFSETX, TVC_LABEL_OFFSETY, TVC_LABEL_SIZE, &label);

    label.clear();
    write!(label, "Time:{}", cursor.time_label(timebase_us)).ok();
    draw_label(display, TVC_LABEL_OFFSETX, TVC_TIME_OFFSETY, TVC_LABEL_SIZE, &label);
}

/// Erase the time readout.
pub fn clear_cursor_labels<D>(display: &mut D)
where
    D: DrawTarget<Color = Rgb565>,
{
    clear_block(display, TVC_LABEL_OFFSETX, TVC_TIME_OFFSETY, TVC_LABEL_SIZE, TVC_LABEL_HEIGHT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BACKGROUND, WHITE};
    use crate::config::{RECORD_LEN, WD_MIDY};
    use crate::testing::Framebuffer;

    #[test]
    fn test_cursor_lines_cross_at_sample() {
        let mut fb = Framebuffer::new();
        draw_cursor_lines(&mut fb, 150, WD_MIDY);
        assert_eq!(fb.pixel(WD_OFFSETX, WD_MIDY), Some(CURSOR));
        assert_eq!(fb.pixel(WD_OFFSETX + 150, WD_OFFSETY), Some(CURSOR));
        assert_eq!(fb.pixel(WD_OFFSETX + 150, WD_BOTTOM - 1), Some(CURSOR));
        assert_eq!(fb.pixel(WD_OFFSETX + 149, WD_OFFSETY), Some(BACKGROUND));
    }

    #[test]
    fn test_cursor_lines_refused_outside_plot() {
        let mut fb = Framebuffer::new();
        draw_cursor_lines(&mut fb, 10, WD_OFFSETY - 1);
        draw_cursor_lines(&mut fb, 10, WD_BOTTOM);
        draw_cursor_lines(&mut fb, WD_WIDTH as usize, WD_MIDY);
        assert_eq!(fb.count(BACKGROUND), fb.len());
    }

    #[test]
    fn test_labels_drawn_and_cleared() {
        let mut fb = Framebuffer::new();
        let record = [2048u16; RECORD_LEN];
        draw_cursor_labels(&mut fb, &CursorAnalyzer::new(), &record, 200);
        assert!(fb.count(WHITE) > 0);

        clear_cursor_labels(&mut fb);
        let time_row = fb.count_in(TVC_LABEL_OFFSETX, TVC_TIME_OFFSETY, TVC_LABEL_SIZE, TVC_LABEL_HEIGHT, WHITE);
        assert_eq!(time_row, 0);
    }
}
