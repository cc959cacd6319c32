//! Control flags connecting input, acquisition and rendering.
//!
//! Each group has exactly one producer and one consumer:
//!
//! | Group | Set by | Cleared by |
//! |-------|--------|------------|
//! | [`PendingEdges`] | debounced buttons, remote commands | input dispatch |
//! | [`SingleShot`] | input dispatch, acquisition, render pass | input dispatch |
//! | [`RefreshFlags`] | input dispatch | info bar drawing |

// =============================================================================
// Single-Shot Sub-State
// =============================================================================

/// Single-shot capture lifecycle.
///
/// `Off -> Armed` on toggle, `Armed -> Started` when the capture is issued,
/// `Started -> Captured` when it completes, `Captured -> Analyzing` on the
/// next render pass. Toggling from any active state returns to `Off`.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum SingleShot {
    /// Real-time capture.
    #[default]
    Off,
    /// Waiting for the capture to be issued.
    Armed,
    /// Capture issued, waiting for completion.
    Started,
    /// Record captured, not yet rendered.
    Captured,
    /// Record frozen on screen, cursor active.
    Analyzing,
}

impl SingleShot {
    /// Single-shot mode is on in any sub-state.
    #[inline]
    pub const fn is_active(self) -> bool { !matches!(self, Self::Off) }

    /// A single-shot capture has been issued (and possibly completed).
    #[inline]
    pub const fn is_started(self) -> bool { matches!(self, Self::Started | Self::Captured | Self::Analyzing) }

    /// A single-shot record is available.
    #[inline]
    pub const fn has_capture(self) -> bool { matches!(self, Self::Captured | Self::Analyzing) }

    #[inline]
    pub const fn is_analyzing(self) -> bool { matches!(self, Self::Analyzing) }
}

// =============================================================================
// Adjust Target Selection
// =============================================================================

/// Parameter changed by the plus/minus buttons.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum SelectedTarget {
    #[default]
    Timebase,
    /// Vertical offset of the zero line (left marker).
    Offset,
    /// Trigger level (right marker).
    Trigger,
}

impl SelectedTarget {
    /// Cycle: Timebase -> Offset -> Trigger -> Timebase
    pub const fn next(self) -> Self {
        match self {
            Self::Timebase => Self::Offset,
            Self::Offset => Self::Trigger,
            Self::Trigger => Self::Timebase,
        }
    }
}

// =============================================================================
// Flag Groups
// =============================================================================

/// Edges waiting to be dispatched.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct PendingEdges {
    pub ok: bool,
    pub select: bool,
    pub plus: bool,
    pub minus: bool,
    pub send_waveform: bool,
}

/// Info bar elements whose value changed and must be redrawn.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RefreshFlags {
    pub timebase: bool,
    pub offset: bool,
    pub trigger: bool,
}

impl RefreshFlags {
    /// Everything needs drawing.
    pub const ALL: Self = Self {
        timebase: true,
        offset: true,
        trigger: true,
    };

    /// Nothing needs drawing.
    pub const NONE: Self = Self {
        timebase: false,
        offset: false,
        trigger: false,
    };

    /// Mark the element for `target` dirty.
    pub fn mark(
        &mut self,
        target: SelectedTarget,
    ) {
        match target {
            SelectedTarget::Timebase => self.timebase = true,
            SelectedTarget::Offset => self.offset = true,
            SelectedTarget::Trigger => self.trigger = true,
        }
    }

    #[inline]
    pub const fn any(&self) -> bool { self.timebase || self.offset || self.trigger }
}

impl Default for RefreshFlags {
    fn default() -> Self { Self::ALL }
}

/// All control state shared by input, acquisition and rendering.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct ControlFlags {
    pub pending: PendingEdges,
    pub single_shot: SingleShot,
    pub selected: SelectedTarget,
    pub refresh: RefreshFlags,
}

impl ControlFlags {
    /// Startup state: real-time, timebase selected, everything to be drawn.
    pub const fn new() -> Self {
        Self {
            pending: PendingEdges {
                ok: false,
                select: false,
                plus: false,
                minus: false,
                send_waveform: false,
            },
            single_shot: SingleShot::Off,
            selected: SelectedTarget::Timebase,
            refresh: RefreshFlags::ALL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_target_cycle() {
        assert_eq!(SelectedTarget::Timebase.next(), SelectedTarget::Offset);
        assert_eq!(SelectedTarget::Offset.next(), SelectedTarget::Trigger);
        assert_eq!(SelectedTarget::Trigger.next(), SelectedTarget::Timebase);
    }

    #[test]
    fn test_single_shot_predicates() {
        assert!(!SingleShot::Off.is_active());
        assert!(SingleShot::Armed.is_active());
        assert!(!SingleShot::Armed.is_started());
        assert!(SingleShot::Started.is_started());
        assert!(!SingleShot::Started.has_capture());
        assert!(SingleShot::Captured.has_capture());
        assert!(SingleShot::Analyzing.has_capture());
        assert!(SingleShot::Analyzing.is_analyzing());
    }

    #[test]
    fn test_initial_flags() {
        let flags = ControlFlags::new();
        assert_eq!(flags, ControlFlags::default());
        assert_eq!(flags.refresh, RefreshFlags::ALL);
        assert_eq!(flags.single_shot, SingleShot::Off);
        assert_eq!(flags.pending, PendingEdges::default());
    }

    #[test]
    fn test_refresh_mark() {
        let mut refresh = RefreshFlags::NONE;
        assert!(!refresh.any());
        refresh.mark(SelectedTarget::Trigger);
        assert!(refresh.trigger && !refresh.offset && !refresh.timebase);
    }
}
