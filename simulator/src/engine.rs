//! Synthetic sampling engine.
//!
//! Generates a continuous test signal and answers capture requests the way the
//! ADC/DMA producer does: search for a rising trigger crossing for at most the
//! holdoff time, fill the requested number of samples, and post the buffer
//! once the capture would have finished in real time.

use dso_common::config::ADC_MAX;
use dso_common::{Capture, CaptureRequest, CaptureSlot, SampleRecord, SamplingEngine};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use log::{debug, info};

use crate::timing::Clock;

/// Test signal shape.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Shape {
    Sine,
    Square,
    Triangle,
}

impl Shape {
    pub const fn next(self) -> Self {
        match self {
            Self::Sine => Self::Square,
            Self::Square => Self::Triangle,
            Self::Triangle => Self::Sine,
        }
    }
}

/// Signal frequencies selectable at runtime, in Hz.
const FREQUENCIES_HZ: [f32; 5] = [50.0, 200.0, 1_000.0, 2_500.0, 10_000.0];

struct Pending {
    capture: Capture,
    ready_at_ms: u64,
}

pub struct SyntheticEngine {
    clock: Clock,
    shape: Shape,
    freq_idx: usize,
    /// Signal time of the next sample, in microseconds.
    time_us: f64,
    /// When set, requests are accepted but never completed.
    stalled: bool,
    pending: Option<Pending>,
}

impl SyntheticEngine {
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            shape: Shape::Sine,
            freq_idx: 2,
            time_us: 0.0,
            stalled: false,
            pending: None,
        }
    }

    pub fn cycle_shape(&mut self) {
        self.shape = self.shape.next();
        info!("signal shape: {:?}", self.shape);
    }

    pub fn cycle_frequency(&mut self) {
        self.freq_idx = (self.freq_idx + 1) % FREQUENCIES_HZ.len();
        info!("signal frequency: {} Hz", FREQUENCIES_HZ[self.freq_idx]);
    }

    pub fn toggle_stall(&mut self) {
        self.stalled = !self.stalled;
        info!("sampling engine {}", if self.stalled { "stalled" } else { "running" });
    }

    /// Post the pending capture once its real-time duration has elapsed.
    pub fn service(
        &mut self,
        slot: &CaptureSlot<NoopRawMutex>,
    ) {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|p| self.clock.now_ms() >= p.ready_at_ms);
        if !due {
            return;
        }
        if let Some(pending) = self.pending.take() {
            slot.complete(pending.capture);
        }
    }

    /// Raw ADC value of the test signal at `t_us`.
    fn sample_at(
        &self,
        t_us: f64,
    ) -> u16 {
        let freq = f64::from(FREQUENCIES_HZ[self.freq_idx]);
        let phase = (t_us * freq / 1e6).fract();
        let unit = match self.shape {
            Shape::Sine => (phase * std::f64::consts::TAU).sin(),
            Shape::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Shape::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
        };
        // 80% of full scale around mid-range.
        let mid = f64::from(ADC_MAX) / 2.0;
        (mid + unit * mid * 0.8).clamp(0.0, f64::from(ADC_MAX)) as u16
    }
}

impl SamplingEngine for SyntheticEngine {
    fn request_capture(
        &mut self,
        request: CaptureRequest,
        mut buffer: SampleRecord,
    ) {
        if self.stalled {
            debug!("dropping capture request while stalled");
            return;
        }

        let step_us = f64::from(request.period_ns) / 1000.0;
        let mut trigger = request.trigger;

        // Look for a rising crossing, free-running after the holdoff.
        let search_start = self.time_us;
        while self.time_us - search_start < f64::from(trigger.holdoff_us) {
            let s = self.sample_at(self.time_us);
            self.time_us += step_us;
            if trigger.feed(s) {
                break;
            }
        }

        let len = request.len.min(buffer.len());
        for s in &mut buffer[..len] {
            *s = self.sample_at(self.time_us);
            self.time_us += step_us;
        }

        let elapsed_us = self.time_us - search_start;
        let ready_at_ms = self.clock.now_ms() + (elapsed_us / 1000.0).ceil() as u64;
        self.pending = Some(Pending {
            capture: request.complete(buffer, len),
            ready_at_ms,
        });
    }
}
