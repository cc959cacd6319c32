//! Digital storage oscilloscope simulator for desktop.
//!
//! Runs the instrument core against a synthetic sampling engine in an SDL
//! window using the embedded-graphics-simulator crate.
//!
//! Keys: `X` plus, `Y` minus, `A` select, `B` OK (single-shot),
//! `W` cycle signal shape, `F` cycle signal frequency, `K` stall the engine.
//! Remote command codes are read from stdin; tokens are written to stdout.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod engine;
mod io;
mod timing;

use std::thread;
use std::time::Instant;

use dso_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use dso_common::{Button, CaptureSlot, Scope, ScopeSettings, StepOutcome};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::Keycode;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use log::{debug, info};

use crate::engine::SyntheticEngine;
use crate::io::{KeyboardPins, StdioLink};
use crate::timing::{Clock, FRAME_TIME, POLL_INTERVAL};

fn button_for(keycode: Keycode) -> Option<Button> {
    match keycode {
        Keycode::X => Some(Button::Plus),
        Keycode::Y => Some(Button::Minus),
        Keycode::A => Some(Button::Select),
        Keycode::B => Some(Button::Ok),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let mut window = Window::new("DSO Simulator", &output_settings);

    // Sample averaging refills faster on the desktop.
    let mut scope = Scope::new(ScopeSettings {
        avg_refill: 8,
        ..ScopeSettings::default()
    });
    scope.start(&mut display);
    window.update(&display);

    let slot = CaptureSlot::<NoopRawMutex>::new();
    let clock = Clock::new();
    let mut engine = SyntheticEngine::new(clock);
    let mut pins = KeyboardPins::default();
    let mut link = StdioLink::spawn();

    info!("simulator running; X/Y adjust, A select, B single-shot");

    loop {
        let frame_start = Instant::now();

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if let Some(button) = button_for(keycode) {
                        pins.set(button, true);
                        continue;
                    }
                    if repeat {
                        continue;
                    }
                    match keycode {
                        Keycode::W => engine.cycle_shape(),
                        Keycode::F => engine.cycle_frequency(),
                        Keycode::K => engine.toggle_stall(),
                        _ => {}
                    }
                }
                SimulatorEvent::KeyUp { keycode, .. } => {
                    if let Some(button) = button_for(keycode) {
                        pins.set(button, false);
                    }
                }
                _ => {}
            }
        }

        // Iterate the control loop until a pass renders or the frame runs out.
        while frame_start.elapsed() < FRAME_TIME {
            engine.service(&slot);
            match scope.step(&mut display, &mut pins, &mut link, &mut engine, &slot, clock.now_ms()) {
                Ok(StepOutcome::Rendered) => break,
                Ok(StepOutcome::Waiting) => {}
                Err(e) => debug!("step skipped: {}", e),
            }
            thread::sleep(POLL_INTERVAL);
        }

        window.update(&display);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_TIME {
            thread::sleep(FRAME_TIME - elapsed);
        }
    }
}
