// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Interrupt-driven USART1 transport for the host link.
//!
//! The HAL configures baud rate and framing; byte I/O then runs from the `USART1` interrupt using
//! direct register access. RXNE stays enabled at all times. TXE is only enabled while a response
//! is being sent and is switched back off once [`Link::next_tx_byte`] reports the buffer empty,
//! which returns the port to its idle receive configuration.
//!
//! To talk to the pendant from the host machine, connect to the USB-serial adapter and use
//! ```
//! $ screen /dev/tty.usbserial* 38400
//! ```

use stm32f7xx_hal::{
    pac,
    serial::{Pins, Serial},
};

use crate::protocol::{Link, Transport};

pub struct Usart<PINS> {
    _serial: Serial<pac::USART1, PINS>,
}

#[inline]
fn regs() -> &'static pac::usart1::RegisterBlock {
    unsafe { &*pac::USART1::ptr() }
}

impl<PINS: Pins<pac::USART1>> Usart<PINS> {
    /// Take over a configured serial port and start listening for commands.
    pub fn new(serial: Serial<pac::USART1, PINS>) -> Self {
        let usart = regs();
        usart
            .icr
            .write(|w| w.fecf().set_bit().ncf().set_bit().orecf().set_bit());
        usart.cr1.modify(|_, w| w.rxneie().set_bit().txeie().clear_bit());
        Self { _serial: serial }
    }
}

impl<PINS> Transport for Usart<PINS> {
    #[inline]
    fn begin_transmit(&mut self) {
        regs().cr1.modify(|_, w| w.txeie().set_bit());
    }
}

/// Service the `USART1` interrupt.
pub fn on_interrupt(link: &Link) {
    let usart = regs();
    let isr = usart.isr.read();

    if isr.rxne().bit_is_set() {
        let line_error = isr.fe().bit_is_set() || isr.nf().bit_is_set() || isr.ore().bit_is_set();
        let byte = usart.rdr.read().rdr().bits() as u8;

        if line_error {
            usart
                .icr
                .write(|w| w.fecf().set_bit().ncf().set_bit().orecf().set_bit());
        }

        // Rejections are logged by the link; there is nothing to send back.
        let _ = link.on_byte_received(byte, line_error);
    } else if isr.ore().bit_is_set() {
        usart.icr.write(|w| w.orecf().set_bit());
    }

    if isr.txe().bit_is_set() && usart.cr1.read().txeie().bit_is_set() {
        match link.next_tx_byte() {
            Some(b) => usart.tdr.write(|w| w.tdr().bits(b as u16)),
            None => usart.cr1.modify(|_, w| w.txeie().clear_bit()),
        }
    }
}
