// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Selector switch sampling and MPG indicator control.
//!
//! [`ModeSampler::tick`] runs from the periodic sampling timer. Each tick takes one snapshot of
//! every switch line, rebuilds [`ModeState`] from scratch, publishes it through [`SharedMode`] and
//! advances the indicator flash divider.

use core::sync::atomic::{AtomicU8, Ordering};

/// One snapshot of the pendant's logical input lines.
///
/// A set bit means the line is asserted (switch closed, button held), independent of the wiring
/// polarity, except for the encoder phases which carry their raw level.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Inputs(u16);

impl Inputs {
    pub const ENC_A: u16 = 1 << 0;
    pub const ENC_B: u16 = 1 << 1;
    pub const AXIS_X: u16 = 1 << 2;
    pub const AXIS_Y: u16 = 1 << 3;
    pub const AXIS_Z: u16 = 1 << 4;
    pub const AXIS_4: u16 = 1 << 5;
    pub const STEP_X1: u16 = 1 << 6;
    pub const STEP_X10: u16 = 1 << 7;
    pub const STEP_X100: u16 = 1 << 8;
    pub const RAPID: u16 = 1 << 9;
    pub const E_STOP: u16 = 1 << 10;

    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn contains(self, line: u16) -> bool {
        (self.0 & line) != 0
    }

    /// Encoder phase sample in the decoder's layout (bit 0 = A, bit 1 = B).
    #[inline]
    pub const fn encoder(self) -> u8 {
        (self.0 & (Self::ENC_A | Self::ENC_B)) as u8
    }
}

/// Source of switch snapshots.
pub trait SwitchInputs {
    /// Sample every input line at once.
    fn read_inputs(&mut self) -> Inputs;
}

impl<F: FnMut() -> Inputs> SwitchInputs for F {
    fn read_inputs(&mut self) -> Inputs {
        self()
    }
}

/// Sink for the MPG indicator light.
pub trait Indicator {
    fn write_indicator(&mut self, on: bool);
}

/// Axis selector position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Axis {
    #[default]
    None = 0,
    X = 1,
    Y = 2,
    Z = 3,
    Four = 4,
}

impl Axis {
    /// Convert from the 3-bit ordinal. Unknown values read as [`Axis::None`].
    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::X,
            2 => Self::Y,
            3 => Self::Z,
            4 => Self::Four,
            _ => Self::None,
        }
    }
}

/// Jog step multiplier.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Step {
    #[default]
    X1 = 0,
    X10 = 1,
    X100 = 2,
    /// Selected while the rapid button is held.
    X1000 = 3,
}

impl Step {
    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        match value & 0b11 {
            1 => Self::X10,
            2 => Self::X100,
            3 => Self::X1000,
            _ => Self::X1,
        }
    }
}

/// Pendant mode derived from one switch snapshot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeState {
    pub axis: Axis,
    pub step: Step,
    pub e_stop: bool,
}

impl ModeState {
    /// Decode a snapshot. Axis and step positions are resolved by fixed precedence in case more
    /// than one line reads asserted.
    pub fn from_inputs(inputs: Inputs) -> Self {
        let axis = if inputs.contains(Inputs::AXIS_X) {
            Axis::X
        } else if inputs.contains(Inputs::AXIS_Y) {
            Axis::Y
        } else if inputs.contains(Inputs::AXIS_Z) {
            Axis::Z
        } else if inputs.contains(Inputs::AXIS_4) {
            Axis::Four
        } else {
            Axis::None
        };

        let step = if inputs.contains(Inputs::RAPID) {
            Step::X1000
        } else if inputs.contains(Inputs::STEP_X10) {
            Step::X10
        } else if inputs.contains(Inputs::STEP_X100) {
            Step::X100
        } else {
            Step::X1
        };

        Self {
            axis,
            step,
            e_stop: inputs.contains(Inputs::E_STOP),
        }
    }

    /// Pack into the status byte: bits 0-2 axis, bits 3-4 step, bit 5 e-stop.
    #[inline]
    pub const fn pack(self) -> u8 {
        (self.axis as u8) | ((self.step as u8) << 3) | ((self.e_stop as u8) << 5)
    }

    #[inline]
    pub const fn unpack(bits: u8) -> Self {
        Self {
            axis: Axis::from_u8(bits & 0b111),
            step: Step::from_u8(bits >> 3),
            e_stop: (bits & (1 << 5)) != 0,
        }
    }
}

/// Indicator flash pattern for a mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Flash {
    Off,
    Slow,
    Fast,
}

impl Flash {
    /// No axis selected keeps the light dark, rapid jogging flashes fast.
    pub fn for_mode(mode: &ModeState) -> Self {
        match (mode.axis, mode.step) {
            (Axis::None, _) => Self::Off,
            (_, Step::X1000) => Self::Fast,
            _ => Self::Slow,
        }
    }
}

/// Latest [`ModeState`], shared between the sampling timer and the foreground.
///
/// Stored packed in one byte so every publish replaces the whole state and every read sees a
/// consistent snapshot.
pub struct SharedMode {
    bits: AtomicU8,
}

impl SharedMode {
    pub const fn new() -> Self {
        Self {
            bits: AtomicU8::new(0),
        }
    }

    #[inline]
    pub fn publish(&self, mode: ModeState) {
        self.bits.store(mode.pack(), Ordering::Release);
    }

    #[inline]
    pub fn snapshot(&self) -> ModeState {
        ModeState::unpack(self.bits.load(Ordering::Acquire))
    }
}

impl Default for SharedMode {
    fn default() -> Self {
        Self::new()
    }
}

/// Periodic switch sampler and indicator flasher.
pub struct ModeSampler<'a, I, L> {
    inputs: I,
    indicator: L,
    shared: &'a SharedMode,
    slow_ticks: u8,
    fast_ticks: u8,
    flash_div: u8,
    lit: bool,
}

impl<'a, I, L> ModeSampler<'a, I, L>
where
    I: SwitchInputs,
    L: Indicator,
{
    /// `slow_ticks` / `fast_ticks` are the indicator toggle periods in ticks. The indicator is
    /// driven off here.
    pub fn new(
        inputs: I,
        mut indicator: L,
        shared: &'a SharedMode,
        slow_ticks: u8,
        fast_ticks: u8,
    ) -> Self {
        indicator.write_indicator(false);
        Self {
            inputs,
            indicator,
            shared,
            slow_ticks,
            fast_ticks,
            flash_div: 0,
            lit: false,
        }
    }

    /// Run one sampling period. Returns the freshly published mode.
    pub fn tick(&mut self) -> ModeState {
        let mode = ModeState::from_inputs(self.inputs.read_inputs());
        self.shared.publish(mode);

        let rate = match Flash::for_mode(&mode) {
            Flash::Off => 0,
            Flash::Slow => self.slow_ticks,
            Flash::Fast => self.fast_ticks,
        };

        self.flash_div = self.flash_div.wrapping_add(1);

        if rate == 0 {
            if self.lit {
                self.set_lit(false);
            }
        } else if self.flash_div >= rate {
            self.set_lit(!self.lit);
            self.flash_div = 0;
        }

        mode
    }

    #[inline]
    pub fn indicator_lit(&self) -> bool {
        self.lit
    }

    fn set_lit(&mut self, on: bool) {
        self.lit = on;
        self.indicator.write_indicator(on);
    }

    pub fn free(self) -> (I, L) {
        (self.inputs, self.indicator)
    }
}
