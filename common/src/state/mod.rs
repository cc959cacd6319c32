//! Control state for the instrument.
//!
//! - `flags`: Control flags, single-shot sub-state and adjust target selection
//! - `button`: Button debounce handling
//! - `input`: Button/remote edge processing and mode transitions

mod button;
mod flags;
mod input;

pub use button::{Button, ButtonPins, ButtonState};
pub use flags::{ControlFlags, PendingEdges, RefreshFlags, SelectedTarget, SingleShot};
pub use input::{InputResult, InputStateMachine};
