// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Wire format of the pendant's serial protocol.
//!
//! Commands are single ASCII bytes. Responses are bracketed ASCII frames terminated by CR LF:
//!
//! | Command | Response |
//! | ------- | -------- |
//! | `R` | `[R]\r\n` |
//! | `S` | `[S` + delta (4 hex) + mode (2 hex) + `]\r\n` |
//!
//! Hex fields are uppercase, fixed width, most significant nibble first. The delta is the
//! two's-complement `i16`.

use crate::switches::ModeState;

pub const CMD_RESET: u8 = b'R';
pub const CMD_STATUS: u8 = b'S';

pub const RESET_RESPONSE: [u8; 5] = *b"[R]\r\n";
pub const STATUS_RESPONSE_LEN: usize = 11;

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Host requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Clear the motion accumulator.
    Reset,
    /// Report and clear the motion accumulator, plus the switch state.
    Status,
}

impl Command {
    #[inline]
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            CMD_RESET => Some(Command::Reset),
            CMD_STATUS => Some(Command::Status),
            _ => None,
        }
    }
}

#[inline]
fn put_hex_u8(out: &mut [u8], n: u8) {
    out[0] = HEX[((n >> 4) & 0xF) as usize];
    out[1] = HEX[(n & 0xF) as usize];
}

#[inline]
fn put_hex_u16(out: &mut [u8], n: u16) {
    put_hex_u8(&mut out[..2], (n >> 8) as u8);
    put_hex_u8(&mut out[2..4], n as u8);
}

/// Build the status frame for `delta` and `mode`.
pub fn status_response(delta: i16, mode: ModeState) -> [u8; STATUS_RESPONSE_LEN] {
    let mut frame = [0u8; STATUS_RESPONSE_LEN];
    frame[0] = b'[';
    frame[1] = b'S';
    put_hex_u16(&mut frame[2..6], delta as u16);
    put_hex_u8(&mut frame[6..8], mode.pack());
    frame[8] = b']';
    frame[9] = b'\r';
    frame[10] = b'\n';
    frame
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn parse_hex(digits: &[u8]) -> Option<u16> {
    digits
        .iter()
        .try_fold(0u16, |acc, &c| Some((acc << 4) | hex_value(c)? as u16))
}

/// Decoded `S` response, as the host sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    pub delta: i16,
    pub mode: ModeState,
}

impl StatusReport {
    /// Parse a complete status frame. Returns `None` for anything malformed.
    pub fn parse(frame: &[u8]) -> Option<Self> {
        if frame.len() != STATUS_RESPONSE_LEN
            || &frame[..2] != b"[S"
            || &frame[8..] != b"]\r\n"
        {
            return None;
        }

        let delta = parse_hex(&frame[2..6])? as i16;
        let mode = parse_hex(&frame[6..8])? as u8;
        Some(Self {
            delta,
            mode: ModeState::unpack(mode),
        })
    }
}
