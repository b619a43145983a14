// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Raw GPIO port levels to logical [`Inputs`].
//!
//! Selector switches and the rapid button are wired closed-to-ground with pull-ups, so they read
//! low when asserted. The e-stop line reads high when pressed. Encoder phases pass through at
//! their electrical level.

use crate::switches::Inputs;

/// Logical lines that are asserted when their pin reads low.
pub const ACTIVE_LOW: u16 = Inputs::AXIS_X
    | Inputs::AXIS_Y
    | Inputs::AXIS_Z
    | Inputs::AXIS_4
    | Inputs::STEP_X1
    | Inputs::STEP_X10
    | Inputs::STEP_X100
    | Inputs::RAPID;

/// Where a logical line lives within one GPIO port.
#[derive(Copy, Clone, Debug)]
pub struct PinMap {
    pub pin: u8,
    pub line: u16,
}

/// Collect the electrical levels of the mapped pins of one port input register.
pub fn gather(port_bits: u32, map: &[PinMap]) -> u16 {
    map.iter()
        .filter(|m| (port_bits & (1 << m.pin)) != 0)
        .fold(0, |acc, m| acc | m.line)
}

/// Apply wiring polarity to gathered levels.
#[inline]
pub fn from_levels(high: u16) -> Inputs {
    Inputs::from_bits(high ^ ACTIVE_LOW)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::switches::{Axis, ModeState, Step};

    const MAP: [PinMap; 4] = [
        PinMap { pin: 0, line: Inputs::ENC_A },
        PinMap { pin: 1, line: Inputs::ENC_B },
        PinMap { pin: 7, line: Inputs::AXIS_X },
        PinMap { pin: 12, line: Inputs::E_STOP },
    ];

    #[test]
    fn gather_picks_only_mapped_pins() {
        let levels = gather(0b1_0000_1000_0001 | (1 << 20), &MAP);
        assert_eq!(levels, Inputs::ENC_A | Inputs::AXIS_X | Inputs::E_STOP);
    }

    #[test]
    fn everything_pulled_up_is_idle() {
        // all switches open, e-stop released, encoder resting at 11
        let idle = ACTIVE_LOW | Inputs::ENC_A | Inputs::ENC_B;
        let inputs = from_levels(idle);

        assert_eq!(inputs.encoder(), 0b11);
        assert_eq!(ModeState::from_inputs(inputs), ModeState::default());
    }

    #[test]
    fn grounded_switches_assert() {
        let levels = (ACTIVE_LOW & !(Inputs::AXIS_Y | Inputs::STEP_X10)) | Inputs::E_STOP;
        let mode = ModeState::from_inputs(from_levels(levels));

        assert_eq!(mode.axis, Axis::Y);
        assert_eq!(mode.step, Step::X10);
        assert!(mode.e_stop);
    }
}
