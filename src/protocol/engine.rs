// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Half-duplex command/response engine.
//!
//! The engine is split across three contexts:
//!
//! - the receive interrupt feeds bytes to [`Link::on_byte_received`],
//! - the foreground loop calls [`Engine::poll`] to service an accepted request,
//! - the transmit-ready interrupt drains the response through [`Link::next_tx_byte`].
//!
//! Each [`ProtocolState`] is left by exactly one of those contexts, so the state word needs no
//! lock. The response buffer is only touched inside short critical sections.

use core::cell::RefCell;
use core::sync::atomic::{AtomicU8, Ordering};

use critical_section::Mutex;

use crate::protocol::messages::{status_response, Command, RESET_RESPONSE};
use crate::quadrature::MotionCounter;
use crate::switches::{ModeState, SharedMode};

/// Response buffer capacity in bytes.
pub const TX_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ProtocolState {
    Idle = 0,
    ResetRequested = 1,
    StatusRequested = 2,
    Responding = 3,
}

impl ProtocolState {
    #[inline]
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::ResetRequested,
            2 => Self::StatusRequested,
            3 => Self::Responding,
            _ => Self::Idle,
        }
    }
}

/// Why a received byte was dropped. None of these produce a reply or change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rejected {
    /// A request is pending or a response is still going out.
    Busy,
    /// The byte arrived with a framing, noise or overrun error.
    LineError,
    /// Not a command byte.
    Unknown(u8),
}

/// Response started by [`Engine::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    Reset,
    Status { delta: i16, mode: ModeState },
}

/// Serial transport hook used to start a transmission.
pub trait Transport {
    /// Arm the transmit-ready event. The driver then pulls bytes with [`Link::next_tx_byte`]
    /// until it returns `None`, at which point it must disarm the event again.
    fn begin_transmit(&mut self);
}

struct ResponseBuffer {
    buf: [u8; TX_CAPACITY],
    len: u8,
    pos: u8,
}

impl ResponseBuffer {
    const fn new() -> Self {
        Self {
            buf: [0; TX_CAPACITY],
            len: 0,
            pos: 0,
        }
    }

    fn load(&mut self, bytes: &[u8]) {
        let n = bytes.len().min(TX_CAPACITY);
        self.buf[..n].copy_from_slice(&bytes[..n]);
        self.len = n as u8;
        self.pos = 0;
    }

    fn next(&mut self) -> Option<u8> {
        if self.pos < self.len {
            let b = self.buf[self.pos as usize];
            self.pos += 1;
            Some(b)
        } else {
            None
        }
    }
}

/// Protocol state and response buffer shared with the serial interrupts.
pub struct Link {
    state: AtomicU8,
    tx: Mutex<RefCell<ResponseBuffer>>,
}

impl Link {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(ProtocolState::Idle as u8),
            tx: Mutex::new(RefCell::new(ResponseBuffer::new())),
        }
    }

    #[inline]
    pub fn state(&self) -> ProtocolState {
        ProtocolState::from_u8(self.state.load(Ordering::Acquire))
    }

    #[inline]
    fn set_state(&self, state: ProtocolState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Receive-interrupt entry point. A command is only accepted while idle.
    pub fn on_byte_received(&self, byte: u8, line_error: bool) -> Result<Command, Rejected> {
        let accepted = self.accept(byte, line_error);
        if let Err(reason) = &accepted {
            debug!("rx dropped: {}", reason);
        }
        accepted
    }

    fn accept(&self, byte: u8, line_error: bool) -> Result<Command, Rejected> {
        if self.state() != ProtocolState::Idle {
            return Err(Rejected::Busy);
        }
        if line_error {
            return Err(Rejected::LineError);
        }

        let cmd = Command::from_byte(byte).ok_or(Rejected::Unknown(byte))?;
        self.set_state(match cmd {
            Command::Reset => ProtocolState::ResetRequested,
            Command::Status => ProtocolState::StatusRequested,
        });
        Ok(cmd)
    }

    /// Transmit-ready entry point. Returns the next response byte, or `None` once the response is
    /// fully sent, which also returns the link to idle.
    pub fn next_tx_byte(&self) -> Option<u8> {
        if self.state() != ProtocolState::Responding {
            return None;
        }

        let next = critical_section::with(|cs| self.tx.borrow_ref_mut(cs).next());
        if next.is_none() {
            self.set_state(ProtocolState::Idle);
        }
        next
    }

    fn respond(&self, bytes: &[u8]) {
        critical_section::with(|cs| self.tx.borrow_ref_mut(cs).load(bytes));
        self.set_state(ProtocolState::Responding);
    }
}

impl Default for Link {
    fn default() -> Self {
        Self::new()
    }
}

/// Foreground half of the protocol.
pub struct Engine<'a> {
    link: &'a Link,
    motion: &'a MotionCounter,
    mode: &'a SharedMode,
}

impl<'a> Engine<'a> {
    pub fn new(link: &'a Link, motion: &'a MotionCounter, mode: &'a SharedMode) -> Self {
        Self { link, motion, mode }
    }

    /// Service a pending request, if any, and start sending its response.
    pub fn poll<T: Transport>(&mut self, transport: &mut T) -> Option<Response> {
        let response = match self.link.state() {
            ProtocolState::ResetRequested => {
                self.motion.reset();
                self.link.respond(&RESET_RESPONSE);
                Response::Reset
            }
            ProtocolState::StatusRequested => {
                let delta = self.motion.take_delta();
                let mode = self.mode.snapshot();
                self.link.respond(&status_response(delta, mode));
                Response::Status { delta, mode }
            }
            ProtocolState::Idle | ProtocolState::Responding => return None,
        };

        trace!("respond {}", response);
        transport.begin_transmit();
        Some(response)
    }
}
