// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

/// Foreground-loop divider for the board status LED.
pub struct Heartbeat {
    count: u32,
    period: u32,
}

impl Heartbeat {
    pub fn new(period: u32) -> Self {
        Self {
            count: 0,
            period: period.max(1),
        }
    }

    /// Count one loop iteration. Returns `true` when the LED is due to toggle.
    #[inline]
    pub fn tick(&mut self) -> bool {
        let due = self.count == 0;
        self.count += 1;
        if self.count >= self.period {
            self.count = 0;
        }
        due
    }
}
