// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 pendant interface board.

use core::convert::Infallible;

use stm32f7xx_hal::{
    gpio::{self, gpioa, gpiod, gpioe, Alternate, Input, Output, PullUp, PushPull},
    pac,
    prelude::*,
};

use crate::hw::inputs::{self, PinMap};
use crate::switches::{Inputs, SwitchInputs};

/// All board pins. Construct this once at startup using:
///
/// ```rust
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOD, dp.GPIOE);
/// ```
pub struct BoardPins {
    pub leds: LedPins,
    pub usart1: Usart1Pins,
    pub encoder: EncoderPins,
    pub switches: SwitchPins,
}

pub struct LedPins {
    /// Pendant MPG indicator (driven through a transistor, active-high).
    pub mpg: gpiod::PD8<Output<PushPull>>,
    /// On-board heartbeat LED (active-low).
    pub heartbeat: gpiod::PD10<Output<PushPull>>,
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// Hand-wheel phase inputs, sampled in software.
pub struct EncoderPins {
    pub a: gpioa::PA0<Input<PullUp>>,
    pub b: gpioa::PA1<Input<PullUp>>,
}

/// Pendant selector switches, all on GPIOE.
pub struct SwitchPins {
    pub axis_x: gpioe::PE0<Input<PullUp>>,
    pub axis_y: gpioe::PE1<Input<PullUp>>,
    pub axis_z: gpioe::PE2<Input<PullUp>>,
    pub axis_4: gpioe::PE3<Input<PullUp>>,
    pub x1: gpioe::PE4<Input<PullUp>>,
    pub x10: gpioe::PE5<Input<PullUp>>,
    pub x100: gpioe::PE6<Input<PullUp>>,
    pub rapid: gpioe::PE7<Input<PullUp>>,
    pub e_stop: gpioe::PE8<Input<PullUp>>,
}

const PORT_A: [PinMap; 2] = [
    PinMap { pin: 0, line: Inputs::ENC_A },
    PinMap { pin: 1, line: Inputs::ENC_B },
];

const PORT_E: [PinMap; 9] = [
    PinMap { pin: 0, line: Inputs::AXIS_X },
    PinMap { pin: 1, line: Inputs::AXIS_Y },
    PinMap { pin: 2, line: Inputs::AXIS_Z },
    PinMap { pin: 3, line: Inputs::AXIS_4 },
    PinMap { pin: 4, line: Inputs::STEP_X1 },
    PinMap { pin: 5, line: Inputs::STEP_X10 },
    PinMap { pin: 6, line: Inputs::STEP_X100 },
    PinMap { pin: 7, line: Inputs::RAPID },
    PinMap { pin: 8, line: Inputs::E_STOP },
];

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiod: pac::GPIOD, gpioe: pac::GPIOE) -> Self {
        let gpioa = gpioa.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();

        Self {
            leds: LedPins {
                mpg: gpiod.pd8.into_push_pull_output(),
                heartbeat: gpiod.pd10.into_push_pull_output(),
            },

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            encoder: EncoderPins {
                a: gpioa.pa0.into_pull_up_input(),
                b: gpioa.pa1.into_pull_up_input(),
            },

            switches: SwitchPins {
                axis_x: gpioe.pe0.into_pull_up_input(),
                axis_y: gpioe.pe1.into_pull_up_input(),
                axis_z: gpioe.pe2.into_pull_up_input(),
                axis_4: gpioe.pe3.into_pull_up_input(),
                x1: gpioe.pe4.into_pull_up_input(),
                x10: gpioe.pe5.into_pull_up_input(),
                x100: gpioe.pe6.into_pull_up_input(),
                rapid: gpioe.pe7.into_pull_up_input(),
                e_stop: gpioe.pe8.into_pull_up_input(),
            },
        }
    }
}

/// Reads the encoder and switch ports straight from their input data registers.
///
/// Owning the configured pins guarantees nothing else reconfigures them.
pub struct PortSnapshot {
    _encoder: EncoderPins,
    _switches: SwitchPins,
}

impl PortSnapshot {
    pub fn new(encoder: EncoderPins, switches: SwitchPins) -> Self {
        Self {
            _encoder: encoder,
            _switches: switches,
        }
    }

    /// Encoder phases only, for the foreground poll.
    #[inline]
    pub fn encoder() -> u8 {
        let gpioa = unsafe { &*pac::GPIOA::ptr() };
        let levels = inputs::gather(gpioa.idr.read().bits(), &PORT_A);
        inputs::from_levels(levels).encoder()
    }
}

impl SwitchInputs for PortSnapshot {
    fn read_inputs(&mut self) -> Inputs {
        let gpioa = unsafe { &*pac::GPIOA::ptr() };
        let gpioe = unsafe { &*pac::GPIOE::ptr() };

        // Back-to-back register reads: every switch on GPIOE is latched together.
        let a = gpioa.idr.read().bits();
        let e = gpioe.idr.read().bits();

        inputs::from_levels(inputs::gather(a, &PORT_A) | inputs::gather(e, &PORT_E))
    }
}

/// Push-pull output exposed through the `embedded-hal` 1.0 digital traits.
pub struct OutPin<const P: char, const N: u8> {
    pin: gpio::Pin<P, N, Output<PushPull>>,
}

impl<const P: char, const N: u8> OutPin<P, N> {
    pub fn new(pin: gpio::Pin<P, N, Output<PushPull>>) -> Self {
        Self { pin }
    }
}

impl<const P: char, const N: u8> embedded_hal::digital::ErrorType for OutPin<P, N> {
    type Error = Infallible;
}

impl<const P: char, const N: u8> embedded_hal::digital::OutputPin for OutPin<P, N> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high();
        Ok(())
    }
}
