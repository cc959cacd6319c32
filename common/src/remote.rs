//! Remote serial protocol.
//!
//! Inbound: single-byte command codes that raise the same pending edges the
//! debounced buttons raise. Outbound: a captured record serialized as
//! fixed-width decimal tokens, the timebase first.

use log::debug;
use num_enum::TryFromPrimitive;

use crate::record::SampleRecord;
use crate::state::ControlFlags;

/// Digits per outbound token.
pub const TOKEN_WIDTH: usize = 5;

/// One outbound token: a zero-padded decimal value.
pub type Token = [u8; TOKEN_WIDTH];

/// Inbound command codes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, TryFromPrimitive)]
#[repr(u8)]
pub enum RemoteCommand {
    Select = 0x04,
    Plus = 0x05,
    Minus = 0x06,
    Single = 0x07,
    SendWaveform = 0x08,
}

impl RemoteCommand {
    /// Raise the pending edge for this command.
    ///
    /// `SendWaveform` is only honored once a single-shot record exists.
    pub fn apply(
        self,
        flags: &mut ControlFlags,
    ) {
        let pending = &mut flags.pending;
        match self {
            Self::Select => pending.select = true,
            Self::Plus => pending.plus = true,
            Self::Minus => pending.minus = true,
            Self::Single => pending.ok = true,
            Self::SendWaveform => {
                if flags.single_shot.has_capture() {
                    pending.send_waveform = true;
                } else {
                    debug!("waveform request ignored: no single-shot capture");
                }
            }
        }
    }
}

/// Serial transport for the remote channel.
pub trait RemoteLink {
    /// Next received command byte, if any.
    fn poll_command(&mut self) -> Option<u8>;

    /// Transmit one outbound token. Framing and acknowledgement are the
    /// transport's concern.
    fn send_token(
        &mut self,
        token: &Token,
    );
}

/// Receive state of the inbound channel.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum RxState {
    #[default]
    Waiting,
    Received(u8),
}

/// Holds at most one unconsumed command byte; a newer byte replaces it.
#[derive(Clone, Copy, Default, Debug)]
pub struct RemoteReceiver {
    state: RxState,
}

impl RemoteReceiver {
    pub const fn new() -> Self { Self { state: RxState::Waiting } }

    #[inline]
    pub const fn state(&self) -> RxState { self.state }

    #[inline]
    pub const fn is_waiting(&self) -> bool { matches!(self.state, RxState::Waiting) }

    /// Drain the link, keeping the most recent byte.
    pub fn receive<L: RemoteLink>(
        &mut self,
        link: &mut L,
    ) {
        while let Some(code) = link.poll_command() {
            self.state = RxState::Received(code);
        }
    }

    /// Consume the received command, applying it to `flags`.
    ///
    /// Returns true when a byte was consumed, known or not.
    pub fn dispatch(
        &mut self,
        flags: &mut ControlFlags,
    ) -> bool {
        let RxState::Received(code) = self.state else {
            return false;
        };
        self.state = RxState::Waiting;

        match RemoteCommand::try_from(code) {
            Ok(command) => {
                debug!("remote command {:?}", command);
                command.apply(flags);
            }
            Err(_) => debug!("ignoring unknown remote code {:#04x}", code),
        }
        true
    }

    pub fn reset(&mut self) { self.state = RxState::Waiting; }
}

/// Encode `value` as a zero-padded decimal token.
pub fn encode_token(value: u16) -> Token {
    let mut token = [b'0'; TOKEN_WIDTH];
    let mut rest = value;
    for digit in token.iter_mut().rev() {
        *digit = b'0' + (rest % 10) as u8;
        rest /= 10;
    }
    token
}

/// Values transmitted for one waveform transfer: the timebase, then every
/// sample of the record.
pub fn waveform_payload(
    timebase_us: u16,
    record: &SampleRecord,
) -> impl Iterator<Item = u16> + '_ {
    core::iter::once(timebase_us).chain(record.iter().copied())
}

/// Serialize `record` over `link`.
pub fn send_waveform<L: RemoteLink>(
    link: &mut L,
    timebase_us: u16,
    record: &SampleRecord,
) {
    for value in waveform_payload(timebase_us, record) {
        link.send_token(&encode_token(value));
    }
    debug!("sent waveform ({}us/div, {} samples)", timebase_us, record.len());
}
