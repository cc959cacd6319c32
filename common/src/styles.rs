//! Pre-computed static text styles.
//!
//! Label text is drawn over a cleared background rectangle, so the styles
//! carry no background color. Text is positioned by its top-left corner to
//! match the label layout constants in [`crate::config`].

use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle, ascii::FONT_8X13},
    pixelcolor::Rgb565,
    text::{Alignment, Baseline, TextStyle, TextStyleBuilder},
};
use profont::PROFONT_12_POINT;

use crate::colors::{GREEN, HOT_PINK, WHITE};

// =============================================================================
// Text Alignment Styles
// =============================================================================

/// Left-aligned text anchored at its top-left corner.
pub const TOP_LEFT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Top)
    .build();

// =============================================================================
// Font References
// =============================================================================

/// Measurement label font, one [`crate::config::CHAR_WIDTH`] per character.
pub const LABEL_FONT: &MonoFont = &FONT_8X13;

/// Bottom bar font (timebase, SINGLE indicator).
pub const BAR_FONT: &MonoFont = &PROFONT_12_POINT;

// =============================================================================
// Pre-computed Text Styles
// =============================================================================

/// Measurement labels (Vpp, Vmax, frequency, cursor readout).
pub const LABEL_STYLE_WHITE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(LABEL_FONT, WHITE);

/// Bottom bar text in its idle color.
pub const BAR_STYLE_WHITE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(BAR_FONT, WHITE);

/// Bottom bar text for the selected adjust target.
pub const BAR_STYLE_SELECTED: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(BAR_FONT, HOT_PINK);

/// "SINGLE" while single-shot mode is on.
pub const BAR_STYLE_ACTIVE: MonoTextStyle<'static, Rgb565> = MonoTextStyle::new(BAR_FONT, GREEN);
