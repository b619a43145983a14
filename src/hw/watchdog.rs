// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Independent watchdog (IWDG), clocked from the ~32 kHz LSI.

use stm32f7xx_hal::pac;

const KEY_RELOAD: u32 = 0xAAAA;
const KEY_UNLOCK: u32 = 0x5555;
const KEY_START: u32 = 0xCCCC;

/// LSI / 32 gives roughly one watchdog count per millisecond.
const PRESCALER_DIV32: u32 = 0b011;

pub struct Watchdog {
    iwdg: pac::IWDG,
}

impl Watchdog {
    /// Start the watchdog. It cannot be stopped again short of a reset.
    pub fn start(iwdg: pac::IWDG, timeout_ms: u32) -> Self {
        let reload = timeout_ms.clamp(1, 0x0FFF);

        iwdg.kr.write(|w| unsafe { w.bits(KEY_START) });
        iwdg.kr.write(|w| unsafe { w.bits(KEY_UNLOCK) });
        iwdg.pr.write(|w| unsafe { w.bits(PRESCALER_DIV32) });
        iwdg.rlr.write(|w| unsafe { w.bits(reload) });

        // Wait for the prescaler/reload updates to reach the LSI domain
        while iwdg.sr.read().bits() != 0 {}

        iwdg.kr.write(|w| unsafe { w.bits(KEY_RELOAD) });
        Self { iwdg }
    }

    #[inline]
    pub fn feed(&mut self) {
        self.iwdg.kr.write(|w| unsafe { w.bits(KEY_RELOAD) });
    }
}
