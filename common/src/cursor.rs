//! Time/voltage cursor over a frozen single-shot record.
//!
//! The cursor is a sample index; its vertical position follows the sample
//! under it. Steps are requested by the input state machine and applied on
//! the next render pass.

use core::fmt::Write;

use heapless::String;

use crate::config::{PixelScale, RECORD_LEN};
use crate::signal::{adc_to_millivolts, sample_interval_us};

/// Capacity of a formatted cursor label.
pub const LABEL_LEN: usize = 20;

/// Direction of a cursor step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CursorStep {
    Plus,
    Minus,
}

/// Cursor position and pending steps.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CursorAnalyzer {
    index: usize,
    row: i32,
    plus: bool,
    minus: bool,
}

impl CursorAnalyzer {
    pub const fn new() -> Self {
        Self {
            index: RECORD_LEN / 2,
            row: 0,
            plus: false,
            minus: false,
        }
    }

    /// Place the cursor at the record center.
    pub fn enter(
        &mut self,
        record: &[u16],
        midpoint: i32,
        scale: &PixelScale,
    ) {
        *self = Self::new();
        self.track(record, midpoint, scale);
    }

    /// Queue a step for the next update.
    pub fn request_step(
        &mut self,
        step: CursorStep,
    ) {
        match step {
            CursorStep::Plus => self.plus = true,
            CursorStep::Minus => self.minus = true,
        }
    }

    /// Drop pending steps.
    pub fn clear_steps(&mut self) {
        self.plus = false;
        self.minus = false;
    }

    #[inline]
    pub const fn has_pending_step(&self) -> bool { self.plus || self.minus }

    /// Apply one pending step, plus first.
    ///
    /// Returns true when the cursor moved. A step at either end of the record
    /// is consumed without moving.
    pub fn update(
        &mut self,
        record: &[u16],
        midpoint: i32,
        scale: &PixelScale,
    ) -> bool {
        let step = if self.plus {
            self.plus = false;
            CursorStep::Plus
        } else if self.minus {
            self.minus = false;
            CursorStep::Minus
        } else {
            return false;
        };

        let last = RECORD_LEN - 1;
        let next = match step {
            CursorStep::Plus => (self.index + 1).min(last),
            CursorStep::Minus => self.index.saturating_sub(1),
        };
        if next == self.index {
            return false;
        }

        self.index = next;
        self.track(record, midpoint, scale);
        true
    }

    fn track(
        &mut self,
        record: &[u16],
        midpoint: i32,
        scale: &PixelScale,
    ) {
        let raw = record.get(self.index).copied().unwrap_or(0);
        self.row = midpoint - scale.map_to_pixel(raw);
    }

    /// Sample index under the cursor.
    #[inline]
    pub const fn index(&self) -> usize { self.index }

    /// Pixel row of the sample under the cursor.
    #[inline]
    pub const fn row(&self) -> i32 { self.row }

    /// Time from the record start to the cursor, in microseconds.
    pub fn elapsed_us(
        &self,
        timebase_us: u16,
    ) -> f64 {
        self.index as f64 * f64::from(sample_interval_us(timebase_us))
    }

    /// Time label, e.g. `1200.000us`.
    pub fn time_label(
        &self,
        timebase_us: u16,
    ) -> String<LABEL_LEN> {
        format_micros(self.elapsed_us(timebase_us))
    }

    /// Voltage label of the sample under the cursor, e.g. `1.65V`.
    pub fn voltage_label(
        &self,
        record: &[u16],
    ) -> String<LABEL_LEN> {
        let raw = record.get(self.index).copied().unwrap_or(0);
        format_volts(adc_to_millivolts(raw))
    }
}

impl Default for CursorAnalyzer {
    fn default() -> Self { Self::new() }
}

/// Format a non-negative microsecond value with exactly three decimals.
pub fn format_micros(value: f64) -> String<LABEL_LEN> {
    let mut out = String::new();
    let whole = value as u32;

    // Digits come out least significant first.
    let mut digits = [0u8; 10];
    let mut count = 0;
    let mut rest = whole;
    loop {
        digits[count] = b'0' + (rest % 10) as u8;
        count += 1;
        rest /= 10;
        if rest == 0 {
            break;
        }
    }
    for &d in digits[..count].iter().rev() {
        out.push(char::from(d)).ok();
    }

    out.push('.').ok();
    let mut frac = value - f64::from(whole);
    for _ in 0..3 {
        frac *= 10.0;
        let d = (frac as u8).min(9);
        out.push(char::from(b'0' + d)).ok();
        frac -= f64::from(d);
    }

    out.push_str("us").ok();
    out
}

/// Format millivolts as volts with two decimals.
pub fn format_volts(millivolts: u32) -> String<LABEL_LEN> {
    let mut out = String::new();
    write!(out, "{}.{:02}V", millivolts / 1000, (millivolts % 1000) / 10).ok();
    out
}
