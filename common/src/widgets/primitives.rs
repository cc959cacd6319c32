//! Low-level drawing primitives: solid blocks, the plot grid and the edge
//! markers.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle, Triangle};

use crate::colors::{BACKGROUND, BLUE, GRAY};
use crate::config::{
    CURSOR_LEFTX,
    CURSOR_RIGHTX,
    DIVISIONS,
    GRID_DIST,
    MARKER_HEIGHT,
    MARKER_WIDTH,
    WD_BOTTOM,
    WD_HEIGHT,
    WD_MIDY,
    WD_OFFSETX,
    WD_OFFSETY,
    WD_WIDTH,
};

// =============================================================================
// Grid Layout Constants
// =============================================================================

/// Rightmost grid column.
const GRID_RIGHT: i32 = WD_OFFSETX + (GRID_DIST * DIVISIONS) as i32;

/// Column of the vertical center line.
const GRID_CENTER_X: i32 = WD_OFFSETX + (GRID_DIST * DIVISIONS / 2) as i32;

/// Horizontal grid rows in the plot.
const GRID_ROWS: u32 = WD_HEIGHT / GRID_DIST;

const GRID_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_stroke(GRAY, 1);
const GRID_CENTER_STYLE: PrimitiveStyle<Rgb565> = PrimitiveStyle::with_stroke(BLUE, 1);

/// Fill a block with a solid color.
pub fn fill_block<D>(
    display: &mut D,
    x: i32,
    y: i32,
    w: u32,
    h: u32,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    display
        .fill_solid(&Rectangle::new(Point::new(x, y), Size::new(w, h)), color)
        .ok();
}

/// Fill a block with the background color.
#[inline]
pub fn clear_block<D>(
    display: &mut D,
    x: i32,
    y: i32,
    w: u32,
    h: u32,
) where
    D: DrawTarget<Color = Rgb565>,
{
    fill_block(display, x, y, w, h, BACKGROUND);
}

/// Clear the whole plot window.
pub fn clear_plot<D>(display: &mut D)
where
    D: DrawTarget<Color = Rgb565>,
{
    clear_block(display, WD_OFFSETX, WD_OFFSETY, WD_WIDTH, WD_HEIGHT);
}

/// Draw the division grid; the center lines stand out.
pub fn draw_grid<D>(display: &mut D)
where
    D: DrawTarget<Color = Rgb565>,
{
    for col in 0..=DIVISIONS {
        let x = WD_OFFSETX + (col * GRID_DIST) as i32;
        let style = if x == GRID_CENTER_X { GRID_CENTER_STYLE } else { GRID_STYLE };
        Line::new(Point::new(x, WD_OFFSETY), Point::new(x, WD_BOTTOM - 1))
            .into_styled(style)
            .draw(display)
            .ok();
    }

    for row in 0..=GRID_ROWS {
        let y = (WD_OFFSETY + (row * GRID_DIST) as i32).min(WD_BOTTOM - 1);
        let style = if y == WD_MIDY { GRID_CENTER_STYLE } else { GRID_STYLE };
        Line::new(Point::new(WD_OFFSETX, y), Point::new(GRID_RIGHT, y))
            .into_styled(style)
            .draw(display)
            .ok();
    }
}

// =============================================================================
// Edge Markers
// =============================================================================

/// Which plot edge a marker sits on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MarkerSide {
    /// Left edge, pointing right. Marks the zero line.
    Left,
    /// Right edge, pointing left. Marks the trigger level.
    Right,
}

impl MarkerSide {
    const fn column(self) -> i32 {
        match self {
            Self::Left => CURSOR_LEFTX,
            Self::Right => CURSOR_RIGHTX,
        }
    }
}

/// Erase the marker column on `side`.
pub fn clear_marker<D>(
    display: &mut D,
    side: MarkerSide,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let half = (MARKER_HEIGHT / 2) as i32;
    clear_block(
        display,
        side.column(),
        WD_OFFSETY - half,
        MARKER_WIDTH + 1,
        WD_HEIGHT + MARKER_HEIGHT + 1,
    );
}

/// Draw a filled arrowhead at `row` on `side`, clamped to the plot.
pub fn draw_marker<D>(
    display: &mut D,
    side: MarkerSide,
    row: i32,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let row = row.clamp(WD_OFFSETY, WD_BOTTOM);
    let half = (MARKER_HEIGHT / 2) as i32;
    let left = side.column();
    let right = left + MARKER_WIDTH as i32;

    let (base, tip) = match side {
        MarkerSide::Left => (left, right),
        MarkerSide::Right => (right, left),
    };

    Triangle::new(Point::new(base, row - half), Point::new(base, row + half), Point::new(tip, row))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)
        .ok();
}
