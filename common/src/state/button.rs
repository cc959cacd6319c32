//! Button debounce handling.
//!
//! A press is accepted when the first read is at the pressed level and at
//! least [`DEBOUNCE_LIM`] of the following [`DEBOUNCE_TOTAL`] reads agree. The
//! accepted level is latched so a held button yields one edge; a single
//! released read unlatches it.

use crate::config::{DEBOUNCE_LIM, DEBOUNCE_TOTAL};

/// Front-panel buttons, in polling order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Button {
    Plus,
    Minus,
    Select,
    Ok,
}

impl Button {
    pub const ALL: [Self; 4] = [Self::Plus, Self::Minus, Self::Select, Self::Ok];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Plus => 0,
            Self::Minus => 1,
            Self::Select => 2,
            Self::Ok => 3,
        }
    }
}

/// Raw access to the button inputs.
pub trait ButtonPins {
    /// Read the instantaneous level; true while pressed.
    fn is_pressed(
        &mut self,
        button: Button,
    ) -> bool;
}

/// Debounce state of one button.
#[derive(Clone, Copy, Default, Debug)]
pub struct ButtonState {
    latched: bool,
}

impl ButtonState {
    /// Create a new button state (not pressed).
    pub const fn new() -> Self { Self { latched: false } }

    /// Returns true only on a confirmed press edge.
    ///
    /// `read` samples the pin and returns true while pressed. It is called up
    /// to `DEBOUNCE_TOTAL + 1` times.
    pub fn just_pressed<F>(
        &mut self,
        mut read: F,
    ) -> bool
    where
        F: FnMut() -> bool,
    {
        if self.latched {
            if !confirmed(&mut read) {
                self.latched = false;
            }
            return false;
        }

        if confirmed(&mut read) {
            self.latched = true;
            return true;
        }

        false
    }

    /// Whether the button is currently latched as pressed.
    #[inline]
    pub const fn is_latched(&self) -> bool { self.latched }
}

fn confirmed<F: FnMut() -> bool>(read: &mut F) -> bool {
    if !read() {
        return false;
    }
    let agreeing = (0..DEBOUNCE_TOTAL).filter(|_| read()).count();
    agreeing >= usize::from(DEBOUNCE_LIM)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pin that reads pressed for the first `pressed_reads` reads of each poll.
    fn bouncing(pressed_reads: u8) -> impl FnMut() -> bool {
        let mut n = 0u8;
        move || {
            n += 1;
            n <= pressed_reads
        }
    }

    #[test]
    fn test_short_bounce_produces_no_edge() {
        let mut state = ButtonState::new();
        // First read plus DEBOUNCE_LIM - 1 confirmations.
        assert!(!state.just_pressed(bouncing(DEBOUNCE_LIM)));
        assert!(!state.is_latched());
    }

    #[test]
    fn test_confirmed_press_produces_edge() {
        let mut state = ButtonState::new();
        assert!(state.just_pressed(bouncing(DEBOUNCE_LIM + 1)));
        assert!(state.is_latched());
    }

    #[test]
    fn test_held_button_emits_single_edge() {
        let mut state = ButtonState::new();
        assert!(state.just_pressed(|| true));
        for _ in 0..20 {
            assert!(!state.just_pressed(|| true));
        }
    }

    #[test]
    fn test_release_and_repress_emits_again() {
        let mut state = ButtonState::new();
        assert!(state.just_pressed(|| true));
        assert!(!state.just_pressed(|| false));
        assert!(!state.is_latched());
        assert!(state.just_pressed(|| true));
    }

    #[test]
    fn test_released_button_is_idle() {
        let mut state = ButtonState::new();
        for _ in 0..5 {
            assert!(!state.just_pressed(|| false));
        }
    }

    #[test]
    fn test_button_slots_are_distinct() {
        let mut seen = [false; 4];
        for b in Button::ALL {
            assert!(!seen[b.index()]);
            seen[b.index()] = true;
        }
    }
}
