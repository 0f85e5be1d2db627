//! Buffered random-bit supply
//!
//! Every stochastic decision the engine makes (processing order, move
//! direction, reaction firing) draws from [`BufferedRng`], which generates
//! random bytes in bulk from a seeded xoshiro generator and hands them out
//! a few bits at a time. Bulk generation amortizes the per-call cost of the
//! generator; a pass over a large lattice consumes many thousands of draws.
//!
//! The [`RandomSource`] trait is the capability the rest of the engine
//! codes against, so tests can substitute a scripted bit sequence.

use rand::RngCore;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

/// Buffer length in whole 64-bit words. The buffer is refilled a word at a
/// time but consumed bit-wise, so the two granularities meet only at the
/// refill boundary.
const BUFFER_WORDS: usize = 256;
const BUFFER_BYTES: usize = BUFFER_WORDS * 8;
const BUFFER_BITS: usize = BUFFER_BYTES * 8;

/// Source of uniform random bits and integers
///
/// `next_in_range`, `next_f64`, and `check_probability` are derived from
/// `next_bits`, so an implementation only has to supply the bit stream.
pub trait RandomSource {
    /// Next `bits` pseudorandom bits, LSB-first. `bits` must be in 1..=32;
    /// anything else is a programming error and panics.
    fn next_bits(&mut self, bits: u32) -> u32;

    /// Uniform value in `[0, bound)` by rejection sampling over the
    /// smallest sufficient bit width. `bound == 0` panics.
    fn next_in_range(&mut self, bound: u32) -> u32 {
        assert!(bound > 0, "next_in_range bound must be positive");
        if bound == 1 {
            return 0;
        }
        let bits = 32 - (bound - 1).leading_zeros();
        loop {
            let value = self.next_bits(bits);
            if value < bound {
                return value;
            }
        }
    }

    /// Uniform value in `[0.0, 1.0)` from 32 buffered bits
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_bits(32)) / 4_294_967_296.0
    }

    /// Check if a random value is less than the probability threshold
    fn check_probability(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }
}

/// Seedable, buffered random-bit supplier backing the whole engine
pub struct BufferedRng {
    generator: Xoshiro256StarStar,
    buffer: [u8; BUFFER_BYTES],
    /// Bit offset of the next unconsumed bit in `buffer`
    cursor: usize,
}

impl BufferedRng {
    /// Create a supplier whose entire bit sequence is a pure function of
    /// `seed`.
    pub fn new(seed: u64) -> Self {
        let mut rng = Self {
            generator: Xoshiro256StarStar::seed_from_u64(seed),
            buffer: [0; BUFFER_BYTES],
            cursor: BUFFER_BITS,
        };
        rng.refill();
        rng
    }

    /// Reset the generator and buffer deterministically. After `reseed(s)`
    /// the supplier behaves exactly like a fresh `BufferedRng::new(s)`.
    pub fn reseed(&mut self, seed: u64) {
        self.generator = Xoshiro256StarStar::seed_from_u64(seed);
        self.cursor = BUFFER_BITS;
        self.refill();
    }

    /// Regenerate the buffer wholesale, one 64-bit word at a time
    fn refill(&mut self) {
        for word in self.buffer.chunks_exact_mut(8) {
            word.copy_from_slice(&self.generator.next_u64().to_le_bytes());
        }
        self.cursor = 0;
    }
}

impl RandomSource for BufferedRng {
    fn next_bits(&mut self, bits: u32) -> u32 {
        assert!(
            (1..=32).contains(&bits),
            "next_bits count must be in 1..=32, got {bits}"
        );
        let mut value = 0u32;
        for i in 0..bits {
            if self.cursor == BUFFER_BITS {
                self.refill();
            }
            let bit = (self.buffer[self.cursor / 8] >> (self.cursor % 8)) & 1;
            value |= u32::from(bit) << i;
            self.cursor += 1;
        }
        value
    }
}
