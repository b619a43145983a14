// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Compile-time firmware configuration.
//!
//! Everything here is fixed at build time. The board layer reads [`Config::DEFAULT`] when it sets
//! up the serial port, the sampling timer and the watchdog; the portable logic takes the values it
//! needs as constructor arguments so tests can run with other settings.

/// Firmware tuning parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Serial link baud rate (8 data bits, no parity, 1 stop bit).
    pub baud_rate: u32,
    /// Mode sampler tick rate in Hz.
    pub sample_rate_hz: u32,
    /// Indicator toggle period, in sampler ticks, while jogging normally.
    pub slow_flash_ticks: u8,
    /// Indicator toggle period, in sampler ticks, while the rapid button is held.
    pub fast_flash_ticks: u8,
    /// Valid quadrature transitions per reported count (4 = one count per full Gray cycle).
    pub quarters_per_detent: u8,
    /// Foreground iterations between heartbeat LED toggles.
    pub heartbeat_period: u32,
    /// Independent watchdog timeout in milliseconds.
    pub watchdog_timeout_ms: u32,
}

impl Config {
    pub const DEFAULT: Config = Config {
        baud_rate: 38_400,
        sample_rate_hz: 30,
        slow_flash_ticks: 15,
        fast_flash_ticks: 4,
        quarters_per_detent: 4,
        heartbeat_period: 65_536,
        watchdog_timeout_ms: 250,
    };
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Sampler timer prescaler and auto-reload values for a timer clocked at `timer_clock_hz`.
///
/// The prescaler brings the count rate down to 10 kHz, the reload then divides to the tick rate.
pub const fn sampler_timer_divisors(timer_clock_hz: u32, sample_rate_hz: u32) -> (u16, u16) {
    let psc = timer_clock_hz / 10_000 - 1;
    let arr = 10_000 / sample_rate_hz - 1;
    (psc as u16, arr as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pendant_wiring() {
        let cfg = Config::default();
        assert_eq!(cfg.baud_rate, 38_400);
        assert!(cfg.fast_flash_ticks < cfg.slow_flash_ticks);
        assert_eq!(cfg.quarters_per_detent, 4);
    }

    #[test]
    fn sampler_divisors_for_16mhz_hsi() {
        let (psc, arr) = sampler_timer_divisors(16_000_000, 30);
        assert_eq!(psc, 1_599);
        assert_eq!(arr, 332);
        // 16 MHz / 1600 / 333 ~= 30.03 Hz
    }
}
