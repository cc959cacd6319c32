//! Acquisition, signal-processing and control core of a digital storage
//! oscilloscope.
//!
//! This crate contains the platform-agnostic instrument logic shared between
//! the desktop simulator and board firmware:
//!
//! - [`acquisition`]: Timebase, capture lifecycle, averaging and the producer handoff
//! - [`signal`]: Pixel mapping, extrema and frequency estimation
//! - [`render`]: Waveform rasterization into fill rectangles
//! - [`state`]: Control flags, button debounce and input transitions
//! - [`cursor`]: Time/voltage cursor over a frozen capture
//! - [`remote`]: Remote command codes and waveform serialization
//! - [`scope`]: The control loop tying everything together
//! - [`widgets`]: Grid, info bar, markers and cursor drawing
//! - [`colors`], [`styles`], [`config`]: Display and instrument constants
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` outside of tests. Hardware is reached only through
//! the [`acquisition::SamplingEngine`], [`state::ButtonPins`] and
//! [`remote::RemoteLink`] traits and an `embedded-graphics` `DrawTarget`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod acquisition;
pub mod colors;
pub mod config;
pub mod cursor;
pub mod record;
pub mod remote;
pub mod render;
pub mod scope;
pub mod signal;
pub mod state;
pub mod styles;
pub mod widgets;

#[cfg(test)]
mod testing;

// Re-export commonly used items
pub use acquisition::{AcquisitionController, Capture, CaptureError, CaptureRequest, CaptureSlot, SamplingEngine};
pub use config::ScopeSettings;
pub use record::SampleRecord;
pub use remote::RemoteLink;
pub use scope::{Scope, StepOutcome};
pub use state::{Button, ButtonPins};
