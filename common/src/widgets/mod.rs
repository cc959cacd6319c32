//! Widget components for the oscilloscope display.
//!
//! All widgets are generic over `DrawTarget<Color = Rgb565>` for platform independence.

mod cursor;
mod info;
mod primitives;

pub use cursor::{clear_cursor_labels, draw_cursor_labels, draw_cursor_lines};
pub use info::{
    InfoBar,
    draw_label,
    draw_measurements,
    draw_single_indicator,
    draw_timebase_label,
    frequency_text,
    timebase_text,
};
pub use primitives::{MarkerSide, clear_block, clear_marker, clear_plot, draw_grid, draw_marker, fill_block};
