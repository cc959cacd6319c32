//! Simulated front panel and serial port.
//!
//! Buttons are keyboard keys held down in the simulator window. The remote
//! channel reads command codes from stdin (one per line, decimal or `0x` hex)
//! and writes outbound tokens to stdout, one per line.

use std::io::{BufRead, Write};
use std::sync::mpsc::{self, Receiver};
use std::{io, thread};

use dso_common::remote::Token;
use dso_common::{Button, ButtonPins, RemoteLink};
use log::warn;

/// Button levels driven by key events.
#[derive(Default)]
pub struct KeyboardPins {
    held: [bool; 4],
}

impl KeyboardPins {
    pub fn set(
        &mut self,
        button: Button,
        pressed: bool,
    ) {
        self.held[button.index()] = pressed;
    }
}

impl ButtonPins for KeyboardPins {
    fn is_pressed(
        &mut self,
        button: Button,
    ) -> bool {
        self.held[button.index()]
    }
}

/// Remote link over the process's standard streams.
pub struct StdioLink {
    commands: Receiver<u8>,
    out: io::Stdout,
}

impl StdioLink {
    /// Start the stdin reader thread.
    pub fn spawn() -> Self {
        let (tx, commands) = mpsc::channel();
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                match parse_code(line.trim()) {
                    Some(code) => {
                        if tx.send(code).is_err() {
                            break;
                        }
                    }
                    None => warn!("not a command code: {:?}", line),
                }
            }
        });
        Self {
            commands,
            out: io::stdout(),
        }
    }
}

impl RemoteLink for StdioLink {
    fn poll_command(&mut self) -> Option<u8> { self.commands.try_recv().ok() }

    fn send_token(
        &mut self,
        token: &Token,
    ) {
        let mut out = self.out.lock();
        if out.write_all(token).and_then(|()| out.write_all(b"\n")).is_err() {
            warn!("stdout closed, dropping token");
        }
    }
}

fn parse_code(text: &str) -> Option<u8> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}
