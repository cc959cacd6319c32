//! Color constants for the oscilloscope display.
//!
//! Standard colors come from the `RgbColor` trait constants so the values are
//! exact for Rgb565. Custom colors are application-specific tints.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors (from RgbColor trait)
// =============================================================================

/// Pure black. Plot and label background.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white. Default label text.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure green. "SINGLE" indicator while single-shot mode is active.
pub const GREEN: Rgb565 = Rgb565::GREEN;

/// Pure blue. Grid center lines.
pub const BLUE: Rgb565 = Rgb565::BLUE;

/// Pure yellow. Waveform trace and the time/voltage cursor.
pub const YELLOW: Rgb565 = Rgb565::YELLOW;

/// Cyan. Offset and trigger markers at the plot edges.
pub const AQUA: Rgb565 = Rgb565::CYAN;

// =============================================================================
// Custom Colors (application-specific)
// =============================================================================

/// Hot pink. Highlights the adjust target currently selected.
/// RGB565: (31, 26, 22).
pub const HOT_PINK: Rgb565 = Rgb565::new(31, 26, 22);

/// Dim gray for grid lines so the trace stays readable.
/// RGB565: (8, 16, 8) - roughly 25% brightness.
pub const GRAY: Rgb565 = Rgb565::new(8, 16, 8);

// =============================================================================
// Semantic aliases
// =============================================================================

/// Waveform trace color.
pub const WAVEFORM: Rgb565 = YELLOW;

/// Plot background color.
pub const BACKGROUND: Rgb565 = BLACK;

/// Time/voltage cursor color.
pub const CURSOR: Rgb565 = YELLOW;
