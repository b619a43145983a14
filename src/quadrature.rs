// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Hand-wheel quadrature decoding.
//!
//! The hand-wheel drives two phase lines, A and B, through a 2-bit Gray sequence. A sample packs
//! them as `bit 0 = A`, `bit 1 = B`; turning clockwise walks `00 -> 01 -> 11 -> 10 -> 00`.
//!
//! [`QuadratureDecoder`] owns the phase history and is driven from a single context (an edge
//! interrupt or the foreground poll). It commits whole detents into a [`MotionCounter`], which is
//! the only state shared with the protocol side.

use core::cell::Cell;

use critical_section::Mutex;

/// Signed quarter step for each `(previous << 2) | current` sample pair.
///
/// Pairs where both lines changed at once cannot come from a real quadrature source and count as
/// zero, as do pairs with no change.
const TRANSITIONS: [i8; 16] = [
    0, 1, -1, 0, //
    -1, 0, 0, 1, //
    1, 0, 0, -1, //
    0, -1, 1, 0, //
];

/// Net hand-wheel motion since the last read, in detents.
///
/// Every access runs inside a critical section, so a detent committed by an interrupt can never
/// land between the read and the clear of [`take_delta`](Self::take_delta).
pub struct MotionCounter {
    delta: Mutex<Cell<i16>>,
}

impl MotionCounter {
    pub const fn new() -> Self {
        Self {
            delta: Mutex::new(Cell::new(0)),
        }
    }

    /// Accumulate `step` detents. Wraps at the `i16` range.
    #[inline]
    pub fn add(&self, step: i16) {
        critical_section::with(|cs| {
            let delta = self.delta.borrow(cs);
            delta.set(delta.get().wrapping_add(step));
        });
    }

    /// Discard any accumulated motion.
    #[inline]
    pub fn reset(&self) {
        critical_section::with(|cs| self.delta.borrow(cs).set(0));
    }

    /// Return the motion accumulated since the previous call (or [`reset`](Self::reset)) and
    /// clear it.
    #[inline]
    pub fn take_delta(&self) -> i16 {
        critical_section::with(|cs| self.delta.borrow(cs).replace(0))
    }
}

impl Default for MotionCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Detent-committing quadrature decoder.
///
/// Valid quarter steps are summed into a sub-detent position. Only when that position reaches a
/// full detent in either direction is a count committed and the position rezeroed. Contact bounce
/// at a resting detent and partial turns that come back never reach the threshold, so they emit
/// nothing.
pub struct QuadratureDecoder<'a> {
    counter: &'a MotionCounter,
    prev: u8,
    quarters: i8,
    quarters_per_detent: i8,
}

impl<'a> QuadratureDecoder<'a> {
    /// Create a decoder resting at the detent given by `initial` (the A/B sample at start-up).
    ///
    /// `quarters_per_detent` is rounded down to 1, 2 or 4 so a count always lands on the same
    /// Gray phase; 4 reports one count per full cycle, 1 reports every valid transition.
    pub fn new(counter: &'a MotionCounter, initial: u8, quarters_per_detent: u8) -> Self {
        Self {
            counter,
            prev: initial & 0b11,
            quarters: 0,
            quarters_per_detent: match quarters_per_detent {
                0 | 1 => 1,
                2 | 3 => 2,
                _ => 4,
            },
        }
    }

    /// Feed one A/B sample. Returns the detent committed by this sample: -1, 0 or +1.
    pub fn sample(&mut self, bits: u8) -> i8 {
        let bits = bits & 0b11;
        let step = TRANSITIONS[((self.prev << 2) | bits) as usize];
        self.prev = bits;

        if step == 0 {
            return 0;
        }

        self.quarters += step;

        let committed = if self.quarters >= self.quarters_per_detent {
            1
        } else if self.quarters <= -self.quarters_per_detent {
            -1
        } else {
            return 0;
        };

        self.quarters = 0;
        self.counter.add(committed as i16);
        committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CW: [u8; 4] = [0b01, 0b11, 0b10, 0b00];
    const CCW: [u8; 4] = [0b10, 0b11, 0b01, 0b00];

    fn turn(decoder: &mut QuadratureDecoder<'_>, seq: &[u8]) {
        for &bits in seq {
            decoder.sample(bits);
        }
    }

    #[test]
    fn full_cycle_commits_one_detent_each_way() {
        let counter = MotionCounter::new();
        let mut dec = QuadratureDecoder::new(&counter, 0, 4);

        turn(&mut dec, &CW);
        assert_eq!(counter.take_delta(), 1);

        turn(&mut dec, &CCW);
        turn(&mut dec, &CCW);
        assert_eq!(counter.take_delta(), -2);
    }

    #[test]
    fn count_is_committed_on_the_closing_transition() {
        let counter = MotionCounter::new();
        let mut dec = QuadratureDecoder::new(&counter, 0, 4);

        assert_eq!(dec.sample(0b01), 0);
        assert_eq!(dec.sample(0b11), 0);
        assert_eq!(dec.sample(0b10), 0);
        assert_eq!(dec.sample(0b00), 1);
    }

    #[test]
    fn take_delta_clears() {
        let counter = MotionCounter::new();
        let mut dec = QuadratureDecoder::new(&counter, 0, 4);

        for _ in 0..3 {
            turn(&mut dec, &CW);
        }
        assert_eq!(counter.take_delta(), 3);
        assert_eq!(counter.take_delta(), 0);
    }

    #[test]
    fn reset_discards_motion() {
        let counter = MotionCounter::new();
        let mut dec = QuadratureDecoder::new(&counter, 0, 4);

        turn(&mut dec, &CCW);
        counter.reset();
        assert_eq!(counter.take_delta(), 0);
    }

    #[test]
    fn bounce_at_rest_emits_nothing() {
        let counter = MotionCounter::new();
        let mut dec = QuadratureDecoder::new(&counter, 0, 4);

        for _ in 0..10 {
            turn(&mut dec, &[0b01, 0b00, 0b10, 0b00]);
        }
        assert_eq!(counter.take_delta(), 0);
    }

    #[test]
    fn bounce_after_a_detent_does_not_double_count() {
        let counter = MotionCounter::new();
        let mut dec = QuadratureDecoder::new(&counter, 0, 4);

        turn(&mut dec, &CW);
        turn(&mut dec, &[0b10, 0b00, 0b10, 0b00]);
        assert_eq!(counter.take_delta(), 1);
    }

    #[test]
    fn half_turn_and_back_emits_nothing() {
        let counter = MotionCounter::new();
        let mut dec = QuadratureDecoder::new(&counter, 0, 4);

        turn(&mut dec, &[0b01, 0b11, 0b10, 0b11, 0b01, 0b00]);
        assert_eq!(counter.take_delta(), 0);
    }

    #[test]
    fn simultaneous_edges_do_not_count() {
        let counter = MotionCounter::new();
        let mut dec = QuadratureDecoder::new(&counter, 0, 4);

        // 00 <-> 11 and 01 <-> 10 flip both lines at once
        for _ in 0..8 {
            assert_eq!(dec.sample(0b11), 0);
            assert_eq!(dec.sample(0b00), 0);
        }
        turn(&mut dec, &[0b01, 0b10, 0b01, 0b10]);
        assert_eq!(counter.take_delta(), 0);
    }

    #[test]
    fn rest_position_follows_initial_sample() {
        let counter = MotionCounter::new();
        let mut dec = QuadratureDecoder::new(&counter, 0b11, 4);

        turn(&mut dec, &[0b10, 0b00, 0b01, 0b11]);
        assert_eq!(counter.take_delta(), 1);
    }

    #[test]
    fn accumulator_wraps_at_i16() {
        let counter = MotionCounter::new();
        counter.add(i16::MAX);
        counter.add(1);
        assert_eq!(counter.take_delta(), i16::MIN);
    }

    /// Net count after a walk of `quarters` valid transitions (signed), with no-op repeats and
    /// returning glitches interleaved between every step.
    fn noisy_walk(quarters_per_detent: u8, moves: &[i32]) -> i16 {
        let counter = MotionCounter::new();
        let mut dec = QuadratureDecoder::new(&counter, 0, quarters_per_detent);
        let mut pos: usize = 0;
        let gray = [0b00u8, 0b01, 0b11, 0b10];

        for &m in moves {
            for _ in 0..m.unsigned_abs() {
                pos = if m > 0 { (pos + 1) % 4 } else { (pos + 3) % 4 };
                let bits = gray[pos];
                dec.sample(bits);
                dec.sample(bits);
                dec.sample(bits ^ 0b11);
                dec.sample(bits);
            }
        }
        counter.take_delta()
    }

    // Both the per-detent and per-transition resolutions must report the net walk divided by
    // their step size, however much noise sits between the real transitions.
    #[test]
    fn net_count_is_independent_of_interleaved_noise() {
        let moves = [12, -4, 9, -1, -8, 20];
        let net: i32 = moves.iter().sum();
        assert_eq!(net, 28);

        assert_eq!(noisy_walk(4, &moves), 7);
        assert_eq!(noisy_walk(1, &moves), 28);
        assert_eq!(noisy_walk(2, &moves), 14);
    }

    #[test]
    fn unsupported_resolutions_round_down() {
        let moves = [12, -4, 9, -1, -8, 20];

        assert_eq!(noisy_walk(3, &moves), noisy_walk(2, &moves));
        assert_eq!(noisy_walk(0, &moves), 28);
        assert_eq!(noisy_walk(9, &moves), 7);

        // with a step of 3 one full cycle would end a quarter short of a detent
        let counter = MotionCounter::new();
        let mut dec = QuadratureDecoder::new(&counter, 0, 3);
        let committed: i8 = CW.iter().map(|&b| dec.sample(b)).sum();
        assert_eq!(committed, 2);
    }

    #[test]
    fn take_delta_never_loses_concurrent_counts() {
        let counter = MotionCounter::new();
        let mut taken: i32 = 0;

        std::thread::scope(|s| {
            let writer = s.spawn(|| {
                for _ in 0..20_000 {
                    counter.add(1);
                }
            });
            while !writer.is_finished() {
                taken += counter.take_delta() as i32;
            }
        });
        taken += counter.take_delta() as i32;

        assert_eq!(taken, 20_000);
    }
}
