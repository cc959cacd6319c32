//! Info bar: measurements along the top, timebase and mode along the bottom,
//! offset and trigger markers at the plot edges.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use heapless::String;

use super::primitives::{MarkerSide, clear_block, clear_marker, draw_marker};
use crate::colors::{AQUA, HOT_PINK};
use crate::config::{
    CHAR_WIDTH,
    FREQ_OFFSETX,
    FREQ_OFFSETY,
    FREQ_SIZE,
    MAXV_OFFSETX,
    MAXV_OFFSETY,
    MAXV_SIZE,
    PPV_OFFSETX,
    PPV_OFFSETY,
    PPV_SIZE,
    PixelScale,
    SINGLES_OFFSETX,
    SINGLES_OFFSETY,
    TIMEBASE_OFFSETX,
    TIMEBASE_OFFSETY,
    TIMEBASE_SIZE,
};
use crate::cursor::format_volts;
use crate::record::WaveformStats;
use crate::signal::adc_to_millivolts;
use crate::state::{RefreshFlags, SelectedTarget};
use crate::styles::{BAR_STYLE_ACTIVE, BAR_STYLE_SELECTED, BAR_STYLE_WHITE, LABEL_STYLE_WHITE, TOP_LEFT};

/// Height cleared behind a text label.
const LABEL_HEIGHT: u32 = 16;

/// Width of the "SINGLE" indicator.
const SINGLES_SIZE: u32 = 6 * CHAR_WIDTH;

/// Values shown by the info bar.
#[derive(Clone, Copy, Debug)]
pub struct InfoBar {
    pub timebase_us: u16,
    pub midpoint: i32,
    pub trigger_level: u16,
    pub selected: SelectedTarget,
}

impl InfoBar {
    /// Redraw the elements marked in `refresh`, then clear the marks.
    pub fn draw<D>(
        &self,
        display: &mut D,
        refresh: &mut RefreshFlags,
        scale: &PixelScale,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        if refresh.timebase {
            draw_timebase_label(display, self.timebase_us, self.selected == SelectedTarget::Timebase);
        }

        if refresh.offset {
            let color = marker_color(self.selected == SelectedTarget::Offset);
            clear_marker(display, MarkerSide::Left);
            draw_marker(display, MarkerSide::Left, self.midpoint, color);
        }

        if refresh.trigger {
            let color = marker_color(self.selected == SelectedTarget::Trigger);
            let row = self.midpoint - scale.map_to_pixel(self.trigger_level);
            clear_marker(display, MarkerSide::Right);
            draw_marker(display, MarkerSide::Right, row, color);
        }

        *refresh = RefreshFlags::NONE;
    }
}

#[inline]
const fn marker_color(selected: bool) -> Rgb565 { if selected { HOT_PINK } else { AQUA } }

/// Timebase as shown in the bottom bar: `200us`, `1ms`, `5ms`.
pub fn timebase_text(timebase_us: u16) -> String<8> {
    let mut out = String::new();
    if timebase_us >= 1000 && timebase_us % 1000 == 0 {
        write!(out, "{}ms", timebase_us / 1000).ok();
    } else {
        write!(out, "{}us", timebase_us).ok();
    }
    out
}

/// Frequency label: `F:0Hz`, `F:950Hz`, `F:12.50kHz`.
pub fn frequency_text(frequency: f32) -> String<16> {
    let hz = micromath::F32(frequency.max(0.0)).round().0 as u32;
    let mut out = String::new();
    if hz >= 1000 {
        write!(out, "F:{}.{:02}kHz", hz / 1000, (hz % 1000) / 10).ok();
    } else {
        write!(out, "F:{}Hz", hz).ok();
    }
    out
}

pub fn draw_timebase_label<D>(
    display: &mut D,
    timebase_us: u16,
    selected: bool,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let style = if selected { BAR_STYLE_SELECTED } else { BAR_STYLE_WHITE };
    clear_block(display, TIMEBASE_OFFSETX, TIMEBASE_OFFSETY, TIMEBASE_SIZE, LABEL_HEIGHT);
    Text::with_text_style(
        &timebase_text(timebase_us),
        Point::new(TIMEBASE_OFFSETX, TIMEBASE_OFFSETY),
        style,
        TOP_LEFT,
    )
    .draw(display)
    .ok();
}

/// "SINGLE" in green while single-shot mode is on, white otherwise.
pub fn draw_single_indicator<D>(
    display: &mut D,
    active: bool,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let style = if active { BAR_STYLE_ACTIVE } else { BAR_STYLE_WHITE };
    clear_block(display, SINGLES_OFFSETX, SINGLES_OFFSETY, SINGLES_SIZE, LABEL_HEIGHT);
    Text::with_text_style("SINGLE", Point::new(SINGLES_OFFSETX, SINGLES_OFFSETY), style, TOP_LEFT)
        .draw(display)
        .ok();
}

/// Peak-to-peak voltage, max voltage and frequency of the last render.
pub fn draw_measurements<D>(
    display: &mut D,
    stats: &WaveformStats,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let mut label: String<16> = String::new();

    let vpp = format_volts(adc_to_millivolts(stats.max.saturating_sub(stats.min)));
    write!(label, "Vpp:{}", vpp).ok();
    draw_label(display, PPV_OFFSETX, PPV_OFFSETY, PPV_SIZE, &label);

    label.clear();
    let vmax = format_volts(adc_to_millivolts(stats.max));
    write!(label, "Max:{}", vmax).ok();
    draw_label(display, MAXV_OFFSETX, MAXV_OFFSETY, MAXV_SIZE, &label);

    draw_label(display, FREQ_OFFSETX, FREQ_OFFSETY, FREQ_SIZE, &frequency_text(stats.frequency));
}

/// Clear a label slot and draw `text` in it.
pub fn draw_label<D>(
    display: &mut D,
    x: i32,
    y: i32,
    width: u32,
    text: &str,
) where
    D: DrawTarget<Color = Rgb565>,
{
    clear_block(display, x, y, width, LABEL_HEIGHT);
    Text::with_text_style(text, Point::new(x, y), LABEL_STYLE_WHITE, TOP_LEFT)
        .draw(display)
        .ok();
}
