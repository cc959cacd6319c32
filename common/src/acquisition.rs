//! Acquisition control: sampling parameters, capture lifecycle and averaging.
//!
//! # Buffer Handoff
//!
//! The raw record is shared between the control loop and the sampling
//! producer (a DMA completion interrupt on hardware). Instead of a flag polled
//! next to shared memory, ownership of the buffer itself moves:
//!
//! 1. [`AcquisitionController`] holds the raw [`SampleRecord`] while idle.
//! 2. A capture request moves it into the [`SamplingEngine`].
//! 3. The producer fills it and posts it back through the [`CaptureSlot`].
//!
//! While a capture is in flight the controller has no raw buffer, so it can
//! neither read it nor start a second capture into it.
//!
//! # Averaging
//!
//! In real-time mode one displayed record is the incremental mean of
//! `avg_refill` captures. Intermediate completions immediately re-issue the
//! next capture; only the final one copies the averaged record to the display
//! record.
//!
//! # Timeouts
//!
//! A producer that never completes would stall the control loop forever.
//! [`AcquisitionController::poll`] returns [`CaptureError::Timeout`] once a
//! capture has been in flight for the configured timeout and drops back to
//! idle so the next iteration can retry.
//!
//! Every request carries a generation number that the producer echoes back.
//! A completion from an abandoned request arrives with an old generation; its
//! buffer is reclaimed and the controller keeps waiting for the current one.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use log::{debug, warn};
use thiserror::Error;

use crate::config::{
    ADC_MAX,
    AVG_REFILL,
    CAPTURE_TIMEOUT_MS,
    DEFAULT_TIMEBASE_INDEX,
    DEFAULT_TRIGGER_LEVEL,
    DIVISIONS,
    RECORD_LEN,
    ScopeSettings,
    TIMEBASES_US,
};
use crate::record::SampleRecord;
use crate::state::SingleShot;

// =============================================================================
// Timebase
// =============================================================================

/// Index into [`TIMEBASES_US`], wrapping on increment and decrement.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Timebase(usize);

impl Timebase {
    /// Timebase at `index`, reduced modulo the table length.
    pub const fn new(index: usize) -> Self { Self(index % TIMEBASES_US.len()) }

    #[inline]
    pub const fn index(self) -> usize { self.0 }

    /// Time per division in microseconds.
    #[inline]
    pub const fn micros(self) -> u16 { TIMEBASES_US[self.0] }

    /// Next slower timebase, wrapping to the fastest.
    pub const fn next(self) -> Self { Self((self.0 + 1) % TIMEBASES_US.len()) }

    /// Next faster timebase, wrapping to the slowest.
    pub const fn prev(self) -> Self {
        if self.0 == 0 {
            Self(TIMEBASES_US.len() - 1)
        } else {
            Self(self.0 - 1)
        }
    }
}

impl Default for Timebase {
    fn default() -> Self { Self(DEFAULT_TIMEBASE_INDEX) }
}

/// Record length reduction for timebases the sampling clock cannot resolve.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Decimation {
    Full,
    Half,
    Quarter,
}

impl Decimation {
    /// Decimation required at `timebase`: the fastest entry samples a quarter
    /// record, the second fastest half a record.
    pub const fn for_timebase(timebase: Timebase) -> Self {
        match timebase.index() {
            0 => Self::Quarter,
            1 => Self::Half,
            _ => Self::Full,
        }
    }

    /// Number of samples requested per capture.
    pub const fn record_len(self) -> usize {
        match self {
            Self::Full => RECORD_LEN,
            Self::Half => RECORD_LEN / 2,
            Self::Quarter => RECORD_LEN / 4,
        }
    }
}

// =============================================================================
// Acquisition Configuration
// =============================================================================

/// Parameters of the next capture. Changed only by input transitions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AcquisitionConfig {
    pub timebase: Timebase,
    /// Fold several captures into each displayed record.
    pub averaging: bool,
    /// Trigger level in raw ADC units.
    pub trigger_level: u16,
    /// Continuous capture (as opposed to a frozen single-shot record).
    pub real_time: bool,
}

impl AcquisitionConfig {
    pub const fn new() -> Self {
        Self {
            timebase: Timebase(DEFAULT_TIMEBASE_INDEX),
            averaging: true,
            trigger_level: DEFAULT_TRIGGER_LEVEL,
            real_time: true,
        }
    }

    #[inline]
    pub const fn decimation(&self) -> Decimation { Decimation::for_timebase(self.timebase) }

    /// Samples per capture at the current timebase.
    #[inline]
    pub const fn buffer_len(&self) -> usize { self.decimation().record_len() }

    /// Sampling period in nanoseconds: the record spans twelve divisions.
    pub const fn sample_period_ns(&self) -> u32 {
        DIVISIONS * self.timebase.micros() as u32 * 1000 / self.buffer_len() as u32
    }

    /// Raise the trigger level by `step`, saturating at `ADC_MAX`.
    pub fn raise_trigger(
        &mut self,
        step: u16,
    ) {
        self.trigger_level = self.trigger_level.saturating_add(step).min(ADC_MAX);
    }

    /// Lower the trigger level by `step`, saturating at 0.
    pub fn lower_trigger(
        &mut self,
        step: u16,
    ) {
        self.trigger_level = self.trigger_level.saturating_sub(step);
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Capture Requests and Producer Interface
// =============================================================================

/// Rising-edge trigger search state handed to the producer with each request.
///
/// The previous sample starts at `ADC_MAX` so the first sample of a capture
/// can never be mistaken for a crossing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TriggerSearch {
    pub level: u16,
    prev: u16,
    /// Microseconds to wait for a crossing before free-running.
    pub holdoff_us: u16,
}

impl TriggerSearch {
    pub const fn new(
        level: u16,
        holdoff_us: u16,
    ) -> Self {
        Self {
            level,
            prev: ADC_MAX,
            holdoff_us,
        }
    }

    /// Feed one sample; true when it completes a rising crossing of the level.
    pub fn feed(
        &mut self,
        sample: u16,
    ) -> bool {
        let crossed = self.prev < self.level && sample >= self.level;
        self.prev = sample;
        crossed
    }
}

/// What the producer should capture next.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CaptureRequest {
    /// Sampling period in nanoseconds.
    pub period_ns: u32,
    /// Samples to write, starting at index 0.
    pub len: usize,
    pub trigger: TriggerSearch,
    /// Echoed back in the [`Capture`] answering this request.
    pub generation: u32,
}

impl CaptureRequest {
    /// Completion for this request carrying `len` valid samples of `record`.
    pub const fn complete(
        &self,
        record: SampleRecord,
        len: usize,
    ) -> Capture {
        Capture {
            record,
            len,
            generation: self.generation,
        }
    }
}

/// A filled raw buffer coming back from the producer.
#[derive(Clone, Copy, Debug)]
pub struct Capture {
    pub record: SampleRecord,
    /// Number of valid samples at the start of `record`.
    pub len: usize,
    /// Generation of the request this capture answers.
    pub generation: u32,
}

/// Single-slot completion channel between producer and control loop.
///
/// Use `CriticalSectionRawMutex` when the producer runs in interrupt context
/// and `NoopRawMutex` when both sides run on one thread.
pub struct CaptureSlot<M: RawMutex> {
    signal: Signal<M, Capture>,
}

impl<M: RawMutex> CaptureSlot<M> {
    pub const fn new() -> Self { Self { signal: Signal::new() } }

    /// Producer side: post a completed capture.
    pub fn complete(
        &self,
        capture: Capture,
    ) {
        self.signal.signal(capture);
    }

    /// Consumer side: take a completed capture if one is waiting.
    pub fn try_take(&self) -> Option<Capture> { self.signal.try_take() }

    /// Drop any completion that is still waiting.
    pub fn reset(&self) { self.signal.reset(); }
}

impl<M: RawMutex> Default for CaptureSlot<M> {
    fn default() -> Self { Self::new() }
}

/// Hardware collaborator that fills raw records.
///
/// Implementations write exactly `request.len` samples into `buffer` and then
/// post it to their [`CaptureSlot`] once, built with
/// [`CaptureRequest::complete`] so the generation is echoed.
pub trait SamplingEngine {
    fn request_capture(
        &mut self,
        request: CaptureRequest,
        buffer: SampleRecord,
    );
}

/// Capture failures surfaced to the control loop.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum CaptureError {
    /// The producer did not complete within the timeout. Retryable.
    #[error("capture timed out after {waited_ms} ms")]
    Timeout { waited_ms: u64 },
}

/// Result of a successful [`AcquisitionController::poll`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PollOutcome {
    /// No capture in flight.
    Idle,
    /// A capture is still in flight.
    Pending,
    /// An intermediate capture was averaged and the next one issued.
    Accumulated,
    /// The averaging cycle finished and the display record was refreshed.
    Completed,
}

// =============================================================================
// Acquisition Controller
// =============================================================================

#[derive(Clone, Copy, Debug)]
struct InFlight {
    requested_at_ms: u64,
    single_shot: bool,
    generation: u32,
}

/// Owns the sampling parameters, the raw and averaged records, and the
/// capture lifecycle.
pub struct AcquisitionController {
    config: AcquisitionConfig,
    /// Raw buffer while idle; `None` while the producer owns it.
    raw: Option<SampleRecord>,
    averaged: SampleRecord,
    in_flight: Option<InFlight>,
    /// Generation of the most recent request.
    generation: u32,
    /// Captures folded into `averaged` in the current cycle.
    avg_count: u16,
    /// Captures making up the current cycle.
    avg_total: u16,
    avg_refill: u16,
    timeout_ms: u64,
}

impl AcquisitionController {
    pub const fn new() -> Self {
        Self {
            config: AcquisitionConfig::new(),
            raw: Some(SampleRecord::new()),
            averaged: SampleRecord::new(),
            in_flight: None,
            generation: 0,
            avg_count: 0,
            avg_total: 1,
            avg_refill: AVG_REFILL,
            timeout_ms: CAPTURE_TIMEOUT_MS,
        }
    }

    /// Controller using the averaging depth and timeout from `settings`.
    pub fn with_settings(settings: &ScopeSettings) -> Self {
        Self {
            avg_refill: settings.avg_refill.max(1),
            timeout_ms: settings.capture_timeout_ms,
            ..Self::new()
        }
    }

    #[inline]
    pub const fn config(&self) -> &AcquisitionConfig { &self.config }

    #[inline]
    pub fn config_mut(&mut self) -> &mut AcquisitionConfig { &mut self.config }

    /// Select a timebase and return the derived configuration.
    pub fn configure(
        &mut self,
        timebase_index: usize,
    ) -> AcquisitionConfig {
        self.config.timebase = Timebase::new(timebase_index);
        debug!(
            "timebase {}us: {} samples every {}ns",
            self.config.timebase.micros(),
            self.config.buffer_len(),
            self.config.sample_period_ns()
        );
        self.config
    }

    /// True when no capture is in flight, i.e. the display record may be read
    /// and a new capture may be requested.
    #[inline]
    pub const fn sampling_done(&self) -> bool { self.in_flight.is_none() }

    /// True when the control loop may run a display pass.
    ///
    /// Single-shot mode never blocks the loop: the user must be able to leave
    /// it while the trigger is still pending.
    #[inline]
    pub const fn is_ready(
        &self,
        single_shot: SingleShot,
    ) -> bool {
        single_shot.is_active() || self.sampling_done()
    }

    /// Start a new capture cycle.
    ///
    /// Does nothing while a capture is in flight or while a single-shot capture
    /// has already been started. Arming single-shot moves it to `Started`.
    pub fn begin_capture<E, M>(
        &mut self,
        single_shot: &mut SingleShot,
        engine: &mut E,
        slot: &CaptureSlot<M>,
        now_ms: u64,
    ) where
        E: SamplingEngine,
        M: RawMutex,
    {
        if self.in_flight.is_some() || single_shot.is_started() {
            return;
        }

        let is_single = *single_shot == SingleShot::Armed;
        if is_single {
            *single_shot = SingleShot::Started;
        }

        self.avg_total = if is_single || !self.config.averaging {
            1
        } else {
            self.avg_refill
        };
        self.avg_count = 0;

        // A completion left over from a timed-out capture must not be mistaken
        // for this one.
        slot.reset();
        self.issue(engine, is_single, now_ms);
    }

    fn issue<E: SamplingEngine>(
        &mut self,
        engine: &mut E,
        single_shot: bool,
        now_ms: u64,
    ) {
        let Some(buffer) = self.raw.take() else {
            return;
        };

        self.generation = self.generation.wrapping_add(1);
        let request = CaptureRequest {
            period_ns: self.config.sample_period_ns(),
            len: self.config.buffer_len(),
            trigger: TriggerSearch::new(self.config.trigger_level, self.config.timebase.micros() / 2),
            generation: self.generation,
        };
        self.in_flight = Some(InFlight {
            requested_at_ms: now_ms,
            single_shot,
            generation: self.generation,
        });
        engine.request_capture(request, buffer);
    }

    /// Service the completion slot.
    ///
    /// Folds a completed capture into the averaged record, re-issues the next
    /// capture of the cycle, and copies the averaged record into `display`
    /// when the cycle ends. A finished single-shot capture moves
    /// `single_shot` from `Started` to `Captured`.
    pub fn poll<E, M>(
        &mut self,
        slot: &CaptureSlot<M>,
        engine: &mut E,
        display: &mut SampleRecord,
        single_shot: &mut SingleShot,
        now_ms: u64,
    ) -> Result<PollOutcome, CaptureError>
    where
        E: SamplingEngine,
        M: RawMutex,
    {
        let Some(in_flight) = self.in_flight else {
            return Ok(PollOutcome::Idle);
        };

        let current = match slot.try_take() {
            Some(capture) if capture.generation == in_flight.generation => Some(capture),
            Some(stale) => {
                debug!(
                    "discarding late capture (generation {}, waiting for {})",
                    stale.generation, in_flight.generation
                );
                if self.raw.is_none() {
                    self.raw = Some(stale.record);
                }
                None
            }
            None => None,
        };

        let Some(capture) = current else {
            let waited_ms = now_ms.saturating_sub(in_flight.requested_at_ms);
            if waited_ms < self.timeout_ms {
                return Ok(PollOutcome::Pending);
            }

            warn!("capture timed out after {} ms, retrying", waited_ms);
            self.in_flight = None;
            // The stalled producer keeps the old buffer; continue with a fresh one.
            self.raw = Some(SampleRecord::new());
            if in_flight.single_shot && *single_shot == SingleShot::Started {
                *single_shot = SingleShot::Armed;
            }
            return Err(CaptureError::Timeout { waited_ms });
        };

        self.in_flight = None;
        self.accumulate(&capture);
        self.raw = Some(capture.record);

        if self.avg_count < self.avg_total && !single_shot.is_active() {
            self.issue(engine, false, now_ms);
            return Ok(PollOutcome::Accumulated);
        }

        display.copy_from(&self.averaged);
        if in_flight.single_shot && *single_shot == SingleShot::Started {
            *single_shot = SingleShot::Captured;
        }
        debug!("capture cycle complete ({} records)", self.avg_count);
        Ok(PollOutcome::Completed)
    }

    /// Incremental mean over the valid part of the capture.
    fn accumulate(
        &mut self,
        capture: &Capture,
    ) {
        self.avg_count = self.avg_count.saturating_add(1);
        let k = i32::from(self.avg_count);
        let len = capture.len.min(RECORD_LEN);

        for (avg, &raw) in self.averaged[..len].iter_mut().zip(&capture.record[..len]) {
            let a = i32::from(*avg);
            *avg = (a + (i32::from(raw) - a) / k) as u16;
        }
    }
}

impl Default for AcquisitionController {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    use super::*;

    /// Records requests and keeps every buffer; tests complete them by hand.
    struct ManualEngine {
        requests: Vec<CaptureRequest>,
        /// Buffers not yet posted, oldest first.
        held: Vec<(CaptureRequest, SampleRecord)>,
    }

    impl ManualEngine {
        fn new() -> Self {
            Self {
                requests: Vec::new(),
                held: Vec::new(),
            }
        }

        /// Post the most recent request filled with `value`.
        fn finish(
            &mut self,
            slot: &CaptureSlot<NoopRawMutex>,
            value: u16,
        ) {
            let (request, record) = self.held.pop().expect("no capture in flight");
            slot.complete(fill(request, record, value));
        }

        /// Post the oldest request filled with `value`.
        fn finish_oldest(
            &mut self,
            slot: &CaptureSlot<NoopRawMutex>,
            value: u16,
        ) {
            let (request, record) = self.held.remove(0);
            slot.complete(fill(request, record, value));
        }
    }

    fn fill(
        request: CaptureRequest,
        mut record: SampleRecord,
        value: u16,
    ) -> Capture {
        for s in &mut record[..request.len] {
            *s = value;
        }
        request.complete(record, request.len)
    }

    impl SamplingEngine for ManualEngine {
        fn request_capture(
            &mut self,
            request: CaptureRequest,
            buffer: SampleRecord,
        ) {
            self.requests.push(request);
            self.held.push((request, buffer));
        }
    }

    #[test]
    fn test_timebase_wraps() {
        let last = Timebase::new(TIMEBASES_US.len() - 1);
        assert_eq!(last.next().index(), 0);
        assert_eq!(Timebase::new(0).prev().index(), TIMEBASES_US.len() - 1);
        assert_eq!(Timebase::default().micros(), 200);
    }

    #[test]
    fn test_configure_buffer_lengths() {
        let mut ctrl = AcquisitionController::new();
        for index in 0..TIMEBASES_US.len() {
            let config = ctrl.configure(index);
            let expected = match index {
                0 => RECORD_LEN / 4,
                1 => RECORD_LEN / 2,
                _ => RECORD_LEN,
            };
            assert_eq!(config.buffer_len(), expected, "timebase index {index}");
        }
    }

    #[test]
    fn test_sample_period() {
        let mut ctrl = AcquisitionController::new();
        assert_eq!(ctrl.configure(0).sample_period_ns(), 1600);
        assert_eq!(ctrl.configure(1).sample_period_ns(), 1600);
        assert_eq!(ctrl.configure(2).sample_period_ns(), 2000);
        assert_eq!(ctrl.configure(4).sample_period_ns(), 8000);
    }

    #[test]
    fn test_trigger_steps_saturate() {
        let mut config = AcquisitionConfig::new();
        config.trigger_level = ADC_MAX - 10;
        config.raise_trigger(100);
        assert_eq!(config.trigger_level, ADC_MAX);
        config.trigger_level = 30;
        config.lower_trigger(100);
        assert_eq!(config.trigger_level, 0);
    }

    #[test]
    fn test_trigger_search_needs_rising_crossing() {
        let mut search = TriggerSearch::new(2000, 100);
        assert!(!search.feed(3000), "first sample cannot trigger");
        assert!(!search.feed(1000));
        assert!(search.feed(2500));
        assert!(!search.feed(2600));
    }

    #[test]
    fn test_averaging_cycle_copies_to_display_at_end() {
        let slot = CaptureSlot::<NoopRawMutex>::new();
        let mut engine = ManualEngine::new();
        let mut ctrl = AcquisitionController::with_settings(&ScopeSettings {
            avg_refill: 2,
            ..ScopeSettings::default()
        });
        let mut display = SampleRecord::new();
        let mut ss = SingleShot::Off;

        ctrl.begin_capture(&mut ss, &mut engine, &slot, 0);
        assert!(!ctrl.sampling_done());

        engine.finish(&slot, 1000);
        let outcome = ctrl.poll(&slot, &mut engine, &mut display, &mut ss, 1).unwrap();
        assert_eq!(outcome, PollOutcome::Accumulated);
        assert_eq!(display[0], 0, "display untouched mid-cycle");
        assert_eq!(engine.requests.len(), 2);

        engine.finish(&slot, 2000);
        let outcome = ctrl.poll(&slot, &mut engine, &mut display, &mut ss, 2).unwrap();
        assert_eq!(outcome, PollOutcome::Completed);
        assert!(ctrl.sampling_done());
        assert_eq!(display[0], 1500);
        assert_eq!(display[RECORD_LEN - 1], 1500);
    }

    #[test]
    fn test_begin_capture_ignored_while_in_flight() {
        let slot = CaptureSlot::<NoopRawMutex>::new();
        let mut engine = ManualEngine::new();
        let mut ctrl = AcquisitionController::new();
        let mut ss = SingleShot::Off;

        ctrl.begin_capture(&mut ss, &mut engine, &slot, 0);
        ctrl.begin_capture(&mut ss, &mut engine, &slot, 1);
        assert_eq!(engine.requests.len(), 1);
    }

    #[test]
    fn test_averaging_disabled_completes_after_one_capture() {
        let slot = CaptureSlot::<NoopRawMutex>::new();
        let mut engine = ManualEngine::new();
        let mut ctrl = AcquisitionController::new();
        ctrl.config_mut().averaging = false;
        let mut display = SampleRecord::new();
        let mut ss = SingleShot::Off;

        ctrl.begin_capture(&mut ss, &mut engine, &slot, 0);
        engine.finish(&slot, 3000);
        let outcome = ctrl.poll(&slot, &mut engine, &mut display, &mut ss, 1).unwrap();
        assert_eq!(outcome, PollOutcome::Completed);
        assert_eq!(display[10], 3000);
    }

    #[test]
    fn test_decimated_capture_only_updates_prefix() {
        let slot = CaptureSlot::<NoopRawMutex>::new();
        let mut engine = ManualEngine::new();
        let mut ctrl = AcquisitionController::new();
        ctrl.config_mut().averaging = false;
        ctrl.configure(0);
        let mut display = SampleRecord::new();
        let mut ss = SingleShot::Off;

        ctrl.begin_capture(&mut ss, &mut engine, &slot, 0);
        assert_eq!(engine.requests[0].len, RECORD_LEN / 4);
        engine.finish(&slot, 4000);
        ctrl.poll(&slot, &mut engine, &mut display, &mut ss, 1).unwrap();
        assert_eq!(display[RECORD_LEN / 4 - 1], 4000);
        assert_eq!(display[RECORD_LEN / 4], 0);
    }

    #[test]
    fn test_single_shot_captures_once() {
        let slot = CaptureSlot::<NoopRawMutex>::new();
        let mut engine = ManualEngine::new();
        let mut ctrl = AcquisitionController::new();
        let mut display = SampleRecord::new();
        let mut ss = SingleShot::Armed;

        ctrl.begin_capture(&mut ss, &mut engine, &slot, 0);
        assert_eq!(ss, SingleShot::Started);
        assert!(ctrl.is_ready(ss), "single-shot never blocks the loop");

        engine.finish(&slot, 2222);
        let outcome = ctrl.poll(&slot, &mut engine, &mut display, &mut ss, 1).unwrap();
        assert_eq!(outcome, PollOutcome::Completed);
        assert_eq!(ss, SingleShot::Captured);
        assert_eq!(display[0], 2222);

        ctrl.begin_capture(&mut ss, &mut engine, &slot, 2);
        assert_eq!(engine.requests.len(), 1, "frozen after capture");
    }

    #[test]
    fn test_timeout_is_reported_and_retryable() {
        let slot = CaptureSlot::<NoopRawMutex>::new();
        let mut engine = ManualEngine::new();
        let mut ctrl = AcquisitionController::new();
        let mut display = SampleRecord::new();
        let mut ss = SingleShot::Off;

        ctrl.begin_capture(&mut ss, &mut engine, &slot, 0);
        assert_eq!(
            ctrl.poll(&slot, &mut engine, &mut display, &mut ss, CAPTURE_TIMEOUT_MS - 1),
            Ok(PollOutcome::Pending)
        );
        assert_eq!(
            ctrl.poll(&slot, &mut engine, &mut display, &mut ss, CAPTURE_TIMEOUT_MS),
            Err(CaptureError::Timeout {
                waited_ms: CAPTURE_TIMEOUT_MS
            })
        );
        assert!(ctrl.sampling_done());

        ctrl.begin_capture(&mut ss, &mut engine, &slot, CAPTURE_TIMEOUT_MS + 1);
        assert_eq!(engine.requests.len(), 2);
    }

    #[test]
    fn test_single_shot_timeout_rearms() {
        let slot = CaptureSlot::<NoopRawMutex>::new();
        let mut engine = ManualEngine::new();
        let mut ctrl = AcquisitionController::new();
        let mut display = SampleRecord::new();
        let mut ss = SingleShot::Armed;

        ctrl.begin_capture(&mut ss, &mut engine, &slot, 0);
        let result = ctrl.poll(&slot, &mut engine, &mut display, &mut ss, CAPTURE_TIMEOUT_MS);
        assert!(result.is_err());
        assert_eq!(ss, SingleShot::Armed);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let slot = CaptureSlot::<NoopRawMutex>::new();
        let mut engine = ManualEngine::new();
        let mut ctrl = AcquisitionController::new();
        ctrl.config_mut().averaging = false;
        let mut display = SampleRecord::new();
        let mut ss = SingleShot::Off;

        ctrl.begin_capture(&mut ss, &mut engine, &slot, 0);
        let _ = ctrl.poll(&slot, &mut engine, &mut display, &mut ss, CAPTURE_TIMEOUT_MS);
        // The late producer finally posts the old buffer.
        engine.finish(&slot, 999);

        ctrl.begin_capture(&mut ss, &mut engine, &slot, CAPTURE_TIMEOUT_MS + 1);
        assert_eq!(
            ctrl.poll(&slot, &mut engine, &mut display, &mut ss, CAPTURE_TIMEOUT_MS + 2),
            Ok(PollOutcome::Pending)
        );
        assert_eq!(display[0], 0);
    }

    #[test]
    fn test_late_completion_after_retry_is_ignored() {
        let slot = CaptureSlot::<NoopRawMutex>::new();
        let mut engine = ManualEngine::new();
        let mut ctrl = AcquisitionController::new();
        ctrl.config_mut().averaging = false;
        let mut display = SampleRecord::new();
        let mut ss = SingleShot::Off;

        ctrl.begin_capture(&mut ss, &mut engine, &slot, 0);
        assert!(ctrl.poll(&slot, &mut engine, &mut display, &mut ss, CAPTURE_TIMEOUT_MS).is_err());
        ctrl.begin_capture(&mut ss, &mut engine, &slot, CAPTURE_TIMEOUT_MS + 1);
        assert_eq!(engine.held.len(), 2);

        // The first request completes only after the retry was issued.
        engine.finish_oldest(&slot, 999);
        assert_eq!(
            ctrl.poll(&slot, &mut engine, &mut display, &mut ss, CAPTURE_TIMEOUT_MS + 2),
            Ok(PollOutcome::Pending)
        );
        assert_eq!(display[0], 0);
        assert!(!ctrl.sampling_done(), "retry still in flight");

        ctrl.begin_capture(&mut ss, &mut engine, &slot, CAPTURE_TIMEOUT_MS + 3);
        assert_eq!(engine.requests.len(), 2, "no second request while the retry is pending");

        engine.finish(&slot, 1234);
        assert_eq!(
            ctrl.poll(&slot, &mut engine, &mut display, &mut ss, CAPTURE_TIMEOUT_MS + 4),
            Ok(PollOutcome::Completed)
        );
        assert_eq!(display[0], 1234);
        assert!(ctrl.sampling_done());
    }
}
