//! Instrument configuration.
//!
//! Compile-time constants describe the fixed hardware and screen geometry.
//! [`ScopeSettings`] carries the values a board or a test may want to tune at
//! runtime (pixel scale, capture timeout, averaging depth, noise margin).
//!
//! Layout values are `const` so widget code never recomputes positions per
//! frame, the same way the rest of the rendering code is written.

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels (ILI9341 panel: 320x240).
pub const SCREEN_WIDTH: u32 = 320;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 240;

/// Left edge of the plot window.
pub const WD_OFFSETX: i32 = 10;

/// Top edge of the plot window.
pub const WD_OFFSETY: i32 = 20;

/// Plot window width (one column per sample plus the closing grid line).
pub const WD_WIDTH: u32 = 301;

/// Plot window height.
pub const WD_HEIGHT: u32 = 200;

/// Default zero-line row, the vertical center of the plot.
pub const WD_MIDY: i32 = WD_OFFSETY + (WD_HEIGHT / 2) as i32;

/// Bottom edge of the plot window (exclusive).
pub const WD_BOTTOM: i32 = WD_OFFSETY + WD_HEIGHT as i32;

/// Pixels per grid division.
pub const GRID_DIST: u32 = 25;

/// Number of horizontal divisions covered by one record.
pub const DIVISIONS: u32 = 12;

/// Character cell width of the label font.
pub const CHAR_WIDTH: u32 = 8;

// =============================================================================
// Acquisition Configuration
// =============================================================================

/// Samples per record.
pub const RECORD_LEN: usize = 300;

/// Largest raw value produced by the 12-bit ADC.
pub const ADC_MAX: u16 = 4095;

/// ADC reference voltage in millivolts.
pub const ADC_REF_MV: u32 = 3300;

/// Supported per-division times in microseconds, fastest first.
pub const TIMEBASES_US: [u16; 8] = [10, 20, 50, 100, 200, 500, 1000, 5000];

/// Timebase index selected at startup (200 us/div).
pub const DEFAULT_TIMEBASE_INDEX: usize = 4;

/// Captures folded into one displayed record in real-time mode.
pub const AVG_REFILL: u16 = 32;

/// Trigger level at startup, in raw ADC units.
pub const DEFAULT_TRIGGER_LEVEL: u16 = 2000;

/// How long a single capture may stay in flight before it is abandoned.
pub const CAPTURE_TIMEOUT_MS: u64 = 1000;

// =============================================================================
// Signal Processing
// =============================================================================

/// Samples skipped at the start of a record before edges are counted.
pub const SETTLING_SAMPLES: usize = 25;

/// Half-width of the hysteresis band around the trigger level.
pub const NOISE_MARGIN: u16 = 50;

// =============================================================================
// Input
// =============================================================================

/// Vertical offset change per plus/minus press, in pixel rows.
pub const MIDPOINT_STEP: i32 = 10;

/// Trigger level change per plus/minus press, in raw ADC units.
pub const TRIGGER_STEP: u16 = 100;

/// Confirmation polls taken after a button first reads at a new level.
pub const DEBOUNCE_TOTAL: u8 = 10;

/// Polls out of [`DEBOUNCE_TOTAL`] that must agree before an edge latches.
pub const DEBOUNCE_LIM: u8 = 8;

// =============================================================================
// Label Layout
// =============================================================================

/// Peak-to-peak voltage label position.
pub const PPV_OFFSETX: i32 = WD_OFFSETX + 5;
pub const PPV_OFFSETY: i32 = 2;
pub const PPV_SIZE: u32 = 9 * CHAR_WIDTH;

/// Max voltage label position.
pub const MAXV_OFFSETX: i32 = PPV_OFFSETX + PPV_SIZE as i32 + 20;
pub const MAXV_OFFSETY: i32 = 2;
pub const MAXV_SIZE: u32 = 9 * CHAR_WIDTH;

/// Frequency label position.
pub const FREQ_OFFSETX: i32 = MAXV_OFFSETX + MAXV_SIZE as i32 + 30;
pub const FREQ_OFFSETY: i32 = 2;
pub const FREQ_SIZE: u32 = 13 * CHAR_WIDTH;

/// Timebase label position (bottom bar).
pub const TIMEBASE_OFFSETX: i32 = 142;
pub const TIMEBASE_OFFSETY: i32 = SCREEN_HEIGHT as i32 - WD_OFFSETY + 4;
pub const TIMEBASE_SIZE: u32 = 6 * CHAR_WIDTH;

/// "SINGLE" indicator position (bottom bar).
pub const SINGLES_OFFSETX: i32 = 50;
pub const SINGLES_OFFSETY: i32 = SCREEN_HEIGHT as i32 - WD_OFFSETY + 4;

/// Time/voltage cursor labels.
pub const TVC_LABEL_OFFSETX: i32 = 200;
pub const TVC_LABEL_OFFSETY: i32 = SCREEN_HEIGHT as i32 - 45;
pub const TVC_LABEL_SIZE: u32 = 15 * CHAR_WIDTH;
pub const TVC_LABEL_HEIGHT: u32 = 16;

/// Offset marker column (left of the plot).
pub const CURSOR_LEFTX: i32 = 0;

/// Trigger marker column (right of the plot).
pub const CURSOR_RIGHTX: i32 = WD_OFFSETX + WD_WIDTH as i32;

/// Marker size in pixels.
pub const MARKER_WIDTH: u32 = 8;
pub const MARKER_HEIGHT: u32 = 8;

// =============================================================================
// Runtime Settings
// =============================================================================

/// Affine raw-to-pixel scale: `pixel = raw * num / den`.
///
/// Built through [`PixelScale::new`], which keeps `den` non-zero and `num`
/// small enough that `ADC_MAX * num` fits in an `i32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelScale {
    num: u32,
    den: u32,
}

impl PixelScale {
    /// Largest accepted numerator.
    pub const MAX_NUM: u32 = i32::MAX as u32 / ADC_MAX as u32;

    /// Full ADC range spans half the plot height.
    pub const DEFAULT: Self = Self::new(WD_HEIGHT / 2, ADC_MAX as u32);

    /// Scale `num / den`, with `num` clamped to [`Self::MAX_NUM`] and a zero
    /// `den` treated as 1.
    pub const fn new(
        num: u32,
        den: u32,
    ) -> Self {
        Self {
            num: if num > Self::MAX_NUM { Self::MAX_NUM } else { num },
            den: if den == 0 { 1 } else { den },
        }
    }

    #[inline]
    pub const fn num(&self) -> u32 { self.num }

    #[inline]
    pub const fn den(&self) -> u32 { self.den }
}

impl Default for PixelScale {
    fn default() -> Self { Self::DEFAULT }
}

/// Tunable parameters of one instrument instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopeSettings {
    /// Raw ADC to pixel mapping.
    pub pixel_scale: PixelScale,
    /// Per-capture timeout in milliseconds.
    pub capture_timeout_ms: u64,
    /// Captures averaged per displayed record (real-time mode).
    pub avg_refill: u16,
    /// Hysteresis half-width for frequency estimation.
    pub noise_margin: u16,
}

impl Default for ScopeSettings {
    fn default() -> Self {
        Self {
            pixel_scale: PixelScale::DEFAULT,
            capture_timeout_ms: CAPTURE_TIMEOUT_MS,
            avg_refill: AVG_REFILL,
            noise_margin: NOISE_MARGIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_geometry() {
        assert_eq!(WD_MIDY, 120);
        assert_eq!(WD_BOTTOM, 220);
        assert!(RECORD_LEN as u32 <= WD_WIDTH);
        assert_eq!(GRID_DIST * DIVISIONS, RECORD_LEN as u32);
    }

    #[test]
    fn test_debounce_limits() {
        assert!(DEBOUNCE_LIM <= DEBOUNCE_TOTAL);
        assert!(DEBOUNCE_LIM > 0);
    }

    #[test]
    fn test_default_timebase_is_mid_table() {
        assert_eq!(TIMEBASES_US[DEFAULT_TIMEBASE_INDEX], 200);
    }

    #[test]
    fn test_pixel_scale_rejects_zero_denominator() {
        let scale = PixelScale::new(100, 0);
        assert_eq!(scale.den(), 1);
        assert_eq!(scale.num(), 100);
    }

    #[test]
    fn test_pixel_scale_clamps_numerator() {
        let scale = PixelScale::new(u32::MAX, 1);
        assert_eq!(scale.num(), PixelScale::MAX_NUM);
        assert!(u64::from(ADC_MAX) * u64::from(scale.num()) <= i32::MAX as u64);
    }
}
