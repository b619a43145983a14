// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Mode sampler tick source on TIM6 (basic timer, update interrupt).

use stm32f7xx_hal::pac;

use crate::config::sampler_timer_divisors;

pub struct SampleTimer {
    _tim: pac::TIM6,
}

impl SampleTimer {
    /// Configure TIM6 to raise `TIM6_DAC` at `rate_hz`, given its kernel clock.
    pub fn tim6(tim6: pac::TIM6, timer_clock_hz: u32, rate_hz: u32) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim6en().set_bit());

        let tim = tim6;
        let (psc, arr) = sampler_timer_divisors(timer_clock_hz, rate_hz);

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        tim.psc.write(|w| unsafe { w.bits(psc as u32) });
        tim.arr.write(|w| unsafe { w.bits(arr as u32) });

        // Latch prescaler, then drop the update flag that the latch raised
        tim.egr.write(|w| w.ug().set_bit());
        tim.sr.modify(|_, w| w.uif().clear_bit());

        tim.dier.modify(|_, w| w.uie().set_bit());
        tim.cr1.modify(|_, w| w.cen().set_bit());

        Self { _tim: tim }
    }
}

/// Acknowledge the update interrupt. Returns whether it was pending.
#[inline]
pub fn clear_update() -> bool {
    let tim = unsafe { &*pac::TIM6::ptr() };
    let pending = tim.sr.read().uif().bit_is_set();
    if pending {
        tim.sr.modify(|_, w| w.uif().clear_bit());
    }
    pending
}
