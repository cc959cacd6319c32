//! Fixed-capacity waveform records and the statistics derived from them.

use core::ops::{Deref, DerefMut};

use crate::config::{RECORD_LEN, WD_MIDY};

/// One waveform capture: `RECORD_LEN` raw ADC samples.
///
/// Records are plain arrays so they can live in statics and be moved between
/// the control loop and the sampling producer without allocation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SampleRecord {
    samples: [u16; RECORD_LEN],
}

impl SampleRecord {
    /// Zero-filled record.
    pub const fn new() -> Self {
        Self {
            samples: [0; RECORD_LEN],
        }
    }

    /// Record with every sample set to `value`.
    pub const fn filled(value: u16) -> Self {
        Self {
            samples: [value; RECORD_LEN],
        }
    }

    /// Overwrite this record with the contents of `other`.
    #[inline]
    pub fn copy_from(
        &mut self,
        other: &Self,
    ) {
        self.samples = other.samples;
    }
}

impl Default for SampleRecord {
    fn default() -> Self { Self::new() }
}

impl Deref for SampleRecord {
    type Target = [u16];

    fn deref(&self) -> &[u16] { &self.samples }
}

impl DerefMut for SampleRecord {
    fn deref_mut(&mut self) -> &mut [u16] { &mut self.samples }
}

/// Per-render statistics of the display record.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct WaveformStats {
    /// Pixel row drawn as the signal zero line.
    pub midpoint: i32,
    /// Smallest raw sample of the last rendered record.
    pub min: u16,
    /// Largest raw sample of the last rendered record.
    pub max: u16,
    /// Estimated fundamental frequency in Hz, 0 when undetermined.
    pub frequency: f32,
}

impl WaveformStats {
    pub const fn new() -> Self {
        Self {
            midpoint: WD_MIDY,
            min: 0,
            max: 0,
            frequency: 0.0,
        }
    }
}

impl Default for WaveformStats {
    fn default() -> Self { Self::new() }
}
