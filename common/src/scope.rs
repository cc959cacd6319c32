//! The instrument: one control-loop iteration at a time.
//!
//! [`Scope`] owns every piece of mutable state. Hardware collaborators (the
//! display, buttons, remote link and sampling engine) are borrowed per call
//! so the same loop runs on the board, in the simulator and in tests.
//!
//! Each [`Scope::step`] runs:
//!
//! 1. Service the capture slot (averaging, completion, timeout).
//! 2. Return early while a real-time capture is still in flight.
//! 3. Read and dispatch input, drawing mode changes.
//! 4. Start the next capture.
//! 5. Render the display record (or update the cursor).
//! 6. Redraw the info bar.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use log::info;

use crate::acquisition::{AcquisitionConfig, AcquisitionController, CaptureError, CaptureSlot, SamplingEngine};
use crate::colors::BACKGROUND;
use crate::config::{RECORD_LEN, ScopeSettings, WD_MIDY};
use crate::cursor::CursorAnalyzer;
use crate::record::{SampleRecord, WaveformStats};
use crate::remote::RemoteLink;
use crate::render::WaveformRenderer;
use crate::signal::{estimate_frequency, sample_interval_us, track_extrema};
use crate::state::{ButtonPins, ControlFlags, InputResult, InputStateMachine, SelectedTarget, SingleShot};
use crate::widgets::{
    InfoBar,
    clear_cursor_labels,
    clear_plot,
    draw_cursor_labels,
    draw_cursor_lines,
    draw_grid,
    draw_measurements,
    draw_single_indicator,
};

/// Result of one control-loop iteration.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepOutcome {
    /// A real-time capture is in flight; nothing was processed.
    Waiting,
    /// Input was processed and the display pass ran.
    Rendered,
}

/// Complete instrument state.
pub struct Scope {
    settings: ScopeSettings,
    acquisition: AcquisitionController,
    input: InputStateMachine,
    renderer: WaveformRenderer,
    cursor: CursorAnalyzer,
    display: SampleRecord,
    /// Zero-line row for the next render.
    midpoint: i32,
    /// Statistics of the waveform currently on screen.
    stats: WaveformStats,
}

impl Scope {
    pub fn new(settings: ScopeSettings) -> Self {
        Self {
            settings,
            acquisition: AcquisitionController::with_settings(&settings),
            input: InputStateMachine::new(),
            renderer: WaveformRenderer::new(settings.pixel_scale),
            cursor: CursorAnalyzer::new(),
            display: SampleRecord::new(),
            midpoint: WD_MIDY,
            stats: WaveformStats::new(),
        }
    }

    #[inline]
    pub const fn config(&self) -> &AcquisitionConfig { self.acquisition.config() }

    #[inline]
    pub const fn flags(&self) -> &ControlFlags { &self.input.flags }

    #[inline]
    pub const fn display_record(&self) -> &SampleRecord { &self.display }

    #[inline]
    pub const fn stats(&self) -> &WaveformStats { &self.stats }

    #[inline]
    pub const fn cursor(&self) -> &CursorAnalyzer { &self.cursor }

    #[inline]
    pub const fn midpoint(&self) -> i32 { self.midpoint }

    /// Draw the initial screen.
    pub fn start<D>(
        &mut self,
        display: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        display.clear(BACKGROUND).ok();
        draw_grid(display);
        draw_single_indicator(display, false);
        draw_measurements(display, &self.stats);
        self.draw_info_bar(display);
        info!("scope started at {}us/div", self.config().timebase.micros());
    }

    /// Run one control-loop iteration.
    ///
    /// A capture timeout is returned after the capture state has been reset;
    /// the next call retries.
    #[allow(clippy::too_many_arguments)]
    pub fn step<D, P, L, E, M>(
        &mut self,
        display: &mut D,
        pins: &mut P,
        link: &mut L,
        engine: &mut E,
        slot: &CaptureSlot<M>,
        now_ms: u64,
    ) -> Result<StepOutcome, CaptureError>
    where
        D: DrawTarget<Color = Rgb565>,
        P: ButtonPins,
        L: RemoteLink,
        E: SamplingEngine,
        M: RawMutex,
    {
        self.acquisition
            .poll(slot, engine, &mut self.display, &mut self.input.flags.single_shot, now_ms)?;

        if !self.acquisition.is_ready(self.input.flags.single_shot) {
            return Ok(StepOutcome::Waiting);
        }

        let result = self.input.process(
            pins,
            link,
            &mut self.acquisition,
            &mut self.midpoint,
            &mut self.cursor,
            &self.display,
        );
        self.apply_input(display, &result);

        self.acquisition
            .begin_capture(&mut self.input.flags.single_shot, engine, slot, now_ms);

        let rendered = self.render_pass(display);
        if rendered {
            draw_measurements(display, &self.stats);
        }
        self.draw_info_bar(display);

        Ok(StepOutcome::Rendered)
    }

    /// Screen updates for single-shot toggles and offset changes.
    fn apply_input<D>(
        &mut self,
        display: &mut D,
        result: &InputResult,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        match result.single_shot {
            Some(true) => {
                draw_single_indicator(display, true);
                clear_plot(display);
                draw_grid(display);
            }
            Some(false) => {
                draw_single_indicator(display, false);
                clear_plot(display);
                clear_cursor_labels(display);
                draw_grid(display);
            }
            None => {}
        }

        // The trigger marker is drawn relative to the zero line.
        if result.adjusted == Some(SelectedTarget::Offset) {
            self.input.flags.refresh.trigger = true;
        }
    }

    /// Returns true when a new waveform was rendered.
    fn render_pass<D>(
        &mut self,
        display: &mut D,
    ) -> bool
    where
        D: DrawTarget<Color = Rgb565>,
    {
        match self.input.flags.single_shot {
            // Waiting for the trigger: keep the plot clear.
            SingleShot::Armed | SingleShot::Started => false,
            SingleShot::Analyzing => {
                let scale = self.settings.pixel_scale;
                if self.cursor.update(&self.display, self.midpoint, &scale) {
                    clear_plot(display);
                    draw_grid(display);
                    self.renderer.draw(display, &self.display, self.midpoint);
                    self.draw_cursor(display);
                }
                false
            }
            SingleShot::Captured => {
                self.input.flags.single_shot = SingleShot::Analyzing;
                self.render_waveform(display);
                self.cursor.enter(&self.display, self.midpoint, &self.settings.pixel_scale);
                self.draw_cursor(display);
                info!("single-shot captured, {} samples frozen", RECORD_LEN);
                true
            }
            SingleShot::Off => {
                self.render_waveform(display);
                true
            }
        }
    }

    /// Clear the previous waveform, draw the grid and the display record,
    /// and refresh the statistics.
    fn render_waveform<D>(
        &mut self,
        display: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        self.renderer.clear_previous(display, &self.stats);
        draw_grid(display);

        let (min, max) = track_extrema(&self.display);
        let config = self.acquisition.config();
        let frequency = estimate_frequency(
            &self.display,
            config.trigger_level,
            self.settings.noise_margin,
            sample_interval_us(config.timebase.micros()),
        );

        self.renderer.draw(display, &self.display, self.midpoint);
        self.stats = WaveformStats {
            midpoint: self.midpoint,
            min,
            max,
            frequency,
        };
    }

    fn draw_cursor<D>(
        &self,
        display: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        draw_cursor_lines(display, self.cursor.index(), self.cursor.row());
        draw_cursor_labels(display, &self.cursor, &self.display, self.config().timebase.micros());
    }

    fn draw_info_bar<D>(
        &mut self,
        display: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        let config = self.acquisition.config();
        let bar = InfoBar {
            timebase_us: config.timebase.micros(),
            midpoint: self.midpoint,
            trigger_level: config.trigger_level,
            selected: self.input.flags.selected,
        };
        bar.draw(display, &mut self.input.flags.refresh, &self.settings.pixel_scale);
    }
}

impl Default for Scope {
    fn default() -> Self { Self::new(ScopeSettings::default()) }
}
