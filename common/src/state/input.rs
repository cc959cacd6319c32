//! Input processing: button and remote edges into mode transitions.
//!
//! Runs once per control-loop iteration in two stages:
//!
//! 1. **Read**: a waiting remote command is applied to the pending edges;
//!    otherwise the buttons are debounced. Never both in one iteration.
//! 2. **Dispatch**: pending edges are consumed in a fixed order (send
//!    waveform, OK, select, plus, minus). The returned [`InputResult`] tells
//!    the caller what to redraw.

use log::{debug, info};

use super::button::{Button, ButtonPins, ButtonState};
use super::flags::{ControlFlags, RefreshFlags, SelectedTarget, SingleShot};
use crate::acquisition::AcquisitionController;
use crate::config::{MIDPOINT_STEP, TRIGGER_STEP, WD_BOTTOM, WD_OFFSETY};
use crate::cursor::{CursorAnalyzer, CursorStep};
use crate::record::SampleRecord;
use crate::remote::{RemoteLink, RemoteReceiver, send_waveform};

/// What changed during one input pass.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct InputResult {
    /// The display record was sent over the remote link.
    pub waveform_sent: bool,
    /// Single-shot was toggled: `Some(true)` on, `Some(false)` off.
    pub single_shot: Option<bool>,
    /// The adjust target selection advanced.
    pub selection_changed: bool,
    /// A plus/minus edge adjusted this target.
    pub adjusted: Option<SelectedTarget>,
    /// A plus/minus edge was redirected to the cursor.
    pub cursor_step: bool,
}

impl InputResult {
    #[inline]
    pub const fn any(&self) -> bool {
        self.waveform_sent
            || self.single_shot.is_some()
            || self.selection_changed
            || self.adjusted.is_some()
            || self.cursor_step
    }
}

/// Button debounce state, remote receive state and the control flags.
pub struct InputStateMachine {
    buttons: [ButtonState; 4],
    remote: RemoteReceiver,
    pub flags: ControlFlags,
}

impl InputStateMachine {
    pub const fn new() -> Self {
        Self {
            buttons: [ButtonState::new(); 4],
            remote: RemoteReceiver::new(),
            flags: ControlFlags::new(),
        }
    }

    /// Read stage: raise pending edges from the remote link or the buttons.
    pub fn read<P, L>(
        &mut self,
        pins: &mut P,
        link: &mut L,
    ) where
        P: ButtonPins,
        L: RemoteLink,
    {
        self.remote.receive(link);
        if self.remote.dispatch(&mut self.flags) {
            return;
        }

        for button in Button::ALL {
            if !self.buttons[button.index()].just_pressed(|| pins.is_pressed(button)) {
                continue;
            }
            debug!("button {:?} pressed", button);
            let pending = &mut self.flags.pending;
            match button {
                Button::Plus => pending.plus = true,
                Button::Minus => pending.minus = true,
                Button::Select => pending.select = true,
                Button::Ok => pending.ok = true,
            }
        }
    }

    /// Run both stages.
    #[allow(clippy::too_many_arguments)]
    pub fn process<P, L>(
        &mut self,
        pins: &mut P,
        link: &mut L,
        acquisition: &mut AcquisitionController,
        midpoint: &mut i32,
        cursor: &mut CursorAnalyzer,
        display: &SampleRecord,
    ) -> InputResult
    where
        P: ButtonPins,
        L: RemoteLink,
    {
        self.read(pins, link);
        self.dispatch(link, acquisition, midpoint, cursor, display)
    }

    /// Dispatch stage: consume pending edges in order.
    pub fn dispatch<L: RemoteLink>(
        &mut self,
        link: &mut L,
        acquisition: &mut AcquisitionController,
        midpoint: &mut i32,
        cursor: &mut CursorAnalyzer,
        display: &SampleRecord,
    ) -> InputResult {
        let mut result = InputResult::default();

        if self.flags.pending.send_waveform {
            self.flags.pending.send_waveform = false;
            send_waveform(link, acquisition.config().timebase.micros(), display);
            self.remote.reset();
            result.waveform_sent = true;
        }

        if self.flags.pending.ok {
            self.flags.pending.ok = false;
            result.single_shot = Some(self.toggle_single_shot(acquisition, cursor));
        }

        if self.flags.pending.select {
            self.flags.pending.select = false;
            self.flags.selected = self.flags.selected.next();
            self.flags.refresh = RefreshFlags::ALL;
            result.selection_changed = true;
            debug!("adjusting {:?}", self.flags.selected);
        }

        for step in [CursorStep::Plus, CursorStep::Minus] {
            let pending = match step {
                CursorStep::Plus => &mut self.flags.pending.plus,
                CursorStep::Minus => &mut self.flags.pending.minus,
            };
            if !*pending {
                continue;
            }
            *pending = false;

            if self.flags.single_shot.is_analyzing() {
                cursor.request_step(step);
                result.cursor_step = true;
            } else {
                let target = self.flags.selected;
                adjust(target, step, acquisition, midpoint);
                self.flags.refresh.mark(target);
                result.adjusted = Some(target);
            }
        }

        result
    }

    /// Returns true when single-shot mode was entered.
    fn toggle_single_shot(
        &mut self,
        acquisition: &mut AcquisitionController,
        cursor: &mut CursorAnalyzer,
    ) -> bool {
        let entering = !self.flags.single_shot.is_active();
        if entering {
            self.flags.single_shot = SingleShot::Armed;
            info!("single-shot armed");
        } else {
            self.flags.single_shot = SingleShot::Off;
            cursor.clear_steps();
            info!("real-time capture resumed");
        }
        acquisition.config_mut().real_time = !entering;
        entering
    }
}

impl Default for InputStateMachine {
    fn default() -> Self { Self::new() }
}

/// Apply one plus/minus step to `target`.
fn adjust(
    target: SelectedTarget,
    step: CursorStep,
    acquisition: &mut AcquisitionController,
    midpoint: &mut i32,
) {
    match (target, step) {
        (SelectedTarget::Timebase, CursorStep::Plus) => {
            let next = acquisition.config().timebase.next();
            acquisition.configure(next.index());
        }
        (SelectedTarget::Timebase, CursorStep::Minus) => {
            let prev = acquisition.config().timebase.prev();
            acquisition.configure(prev.index());
        }
        // Plus moves the zero line up the screen.
        (SelectedTarget::Offset, CursorStep::Plus) => *midpoint = (*midpoint - MIDPOINT_STEP).max(WD_OFFSETY),
        (SelectedTarget::Offset, CursorStep::Minus) => *midpoint = (*midpoint + MIDPOINT_STEP).min(WD_BOTTOM),
        (SelectedTarget::Trigger, CursorStep::Plus) => acquisition.config_mut().raise_trigger(TRIGGER_STEP),
        (SelectedTarget::Trigger, CursorStep::Minus) => acquisition.config_mut().lower_trigger(TRIGGER_STEP),
    }
}
