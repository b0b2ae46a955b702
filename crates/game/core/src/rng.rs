//! Replica of the game's NPC slot generator.
//!
//! The game picks NPC spawn slots with a pair of 16-bit shift registers. Every
//! level entry consumes a data-dependent number of steps, so the replica must
//! match the console bit-for-bit or all later spawns diverge.
//!
//! # Determinism
//!
//! Two generators with the same registers always produce the same slots.
//! Register equality is therefore part of state equivalence during search.

use core::num::NonZeroU32;

use crate::config::GameConfig;

/// Two-register feedback generator used for NPC slot selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotRng {
    low: u16,
    high: u16,
}

impl SlotRng {
    /// Feedback constant XORed into the high register when the low register
    /// carries out.
    const FEEDBACK: u16 = 0xb400;

    /// Generator with the power-on registers used by the game.
    pub const fn new() -> Self {
        Self::with_seed(GameConfig::DEFAULT_RNG_LOW, GameConfig::DEFAULT_RNG_HIGH)
    }

    pub const fn with_seed(low: u16, high: u16) -> Self {
        Self { low, high }
    }

    /// Current `(low, high)` register values.
    pub const fn registers(&self) -> (u16, u16) {
        (self.low, self.high)
    }

    pub fn reseed(&mut self, low: u16, high: u16) {
        self.low = low;
        self.high = high;
    }

    /// Advances the registers by one step.
    ///
    /// The high register shifts left and its top bit carries into the low
    /// register, which also shifts left. When the low register's top bit falls
    /// out, the feedback constant is folded into the high register.
    pub fn advance(&mut self) -> &mut Self {
        let high_carry = self.high >> 15;
        self.high <<= 1;
        let low_carry = self.low >> 15;
        self.low = (self.low << 1) | high_carry;
        if low_carry != 0 {
            self.high ^= Self::FEEDBACK;
        }
        self
    }

    /// Advances the registers by `steps` single steps.
    pub fn advance_by(&mut self, steps: u32) -> &mut Self {
        for _ in 0..steps {
            self.advance();
        }
        self
    }

    /// Reads a slot candidate for a level with `count` slots.
    ///
    /// Masks the low register down to the smallest power of two that is at
    /// least `count`, so the result may still be `>= count`.
    pub fn slot(&self, count: NonZeroU32) -> u32 {
        let width = Self::bit_width(count);
        let mask = 0xffff_u32 >> 16_u32.saturating_sub(width);
        u32::from(self.low) & mask
    }

    /// Draws a slot in `[0, count)` the way the game does on level entry.
    ///
    /// Each attempt advances the registers `bit_width(count)` times and rejects
    /// candidates outside the range. Terminates because the low register
    /// eventually cycles through small values.
    pub fn advance_in_level(&mut self, count: NonZeroU32) -> u32 {
        let width = Self::bit_width(count);
        loop {
            self.advance_by(width);
            let slot = self.slot(count);
            if slot < count.get() {
                return slot;
            }
        }
    }

    /// `floor(log2 n) + 1`.
    const fn bit_width(count: NonZeroU32) -> u32 {
        u32::BITS - count.get().leading_zeros()
    }
}

impl Default for SlotRng {
    fn default() -> Self {
        Self::new()
    }
}
