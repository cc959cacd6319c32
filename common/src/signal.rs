//! Pure signal computations over a sample record.
//!
//! Nothing here keeps state between calls: the functions take a record (or a
//! single sample) plus the parameters they need and return a value.
//!
//! # Frequency Estimation
//!
//! [`estimate_frequency`] counts rising edges through a hysteresis band
//! `[level - margin, level + margin]`. An edge qualifies only when the previous
//! sample is below the band and the current one is above it, so noise riding
//! on a slow edge is not counted twice. The first period is discarded because
//! the record starts at an arbitrary phase; later periods are blended as
//! `avg = (avg + f) / 2`, which weights recent periods more heavily.

use crate::config::{ADC_MAX, ADC_REF_MV, DIVISIONS, PixelScale, RECORD_LEN, SETTLING_SAMPLES};

impl PixelScale {
    /// Map a raw ADC value to a pixel offset above the zero line.
    ///
    /// Values above `ADC_MAX` are treated as `ADC_MAX`.
    #[inline]
    pub const fn map_to_pixel(
        &self,
        raw: u16,
    ) -> i32 {
        let raw = if raw > ADC_MAX { ADC_MAX } else { raw };
        (raw as u32 * self.num() / self.den()) as i32
    }
}

/// Smallest and largest sample, seeded with the first one.
///
/// Returns `(0, 0)` for an empty slice.
pub fn track_extrema(record: &[u16]) -> (u16, u16) {
    let Some(&first) = record.first() else {
        return (0, 0);
    };

    record[1..].iter().fold((first, first), |(min, max), &s| (min.min(s), max.max(s)))
}

/// Time between two samples in microseconds for the given timebase.
///
/// One record spans [`DIVISIONS`] divisions of `timebase_us` each.
#[inline]
pub fn sample_interval_us(timebase_us: u16) -> f32 { (DIVISIONS as f32 * timebase_us as f32) / RECORD_LEN as f32 }

/// Estimate the fundamental frequency in Hz, or 0 when fewer than two
/// qualifying edges are present after the settling samples.
pub fn estimate_frequency(
    record: &[u16],
    trigger_level: u16,
    noise_margin: u16,
    sample_interval_us: f32,
) -> f32 {
    let Some(&first) = record.first() else {
        return 0.0;
    };

    let low = i32::from(trigger_level) - i32::from(noise_margin);
    let high = i32::from(trigger_level) + i32::from(noise_margin);

    let mut prev = i32::from(first);
    // The edge that starts a record counts as the first one seen.
    let mut period: u32 = 1;
    let mut edges: u32 = 0;
    let mut freq_avg = 0.0f32;

    for (i, &sample) in record.iter().enumerate().skip(1) {
        let current = i32::from(sample);

        if i > SETTLING_SAMPLES {
            if prev < low && current > high {
                if edges >= 1 {
                    let f = period_frequency(period, sample_interval_us);
                    freq_avg = if freq_avg == 0.0 { f } else { (freq_avg + f) / 2.0 };
                }
                period = 1;
                edges += 1;
            } else {
                period += 1;
            }
        }

        prev = current;
    }

    if edges > 1 { freq_avg } else { 0.0 }
}

#[inline]
fn period_frequency(
    period_samples: u32,
    sample_interval_us: f32,
) -> f32 {
    1_000_000.0 / (period_samples as f32 * sample_interval_us)
}

/// Convert a raw ADC value to millivolts at the ADC input.
#[inline]
pub const fn adc_to_millivolts(raw: u16) -> u32 { raw as u32 * ADC_REF_MV / ADC_MAX as u32 }
