//! Deterministic random number generation for tests, demos and benchmarks.
//!
//! Scenario synthesis must be reproducible across runs and platforms, so the
//! crate ships a tiny xorshift64 generator instead of relying on OS entropy.

use rand::RngCore;

/// Simple deterministic random number generator using Xorshift64.
///
/// Minimal, fast and reproducible. Quality is good enough for scenario
/// synthesis; do not use for anything cryptographic.
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new generator with the given seed.
    /// A zero seed is replaced by 1 to avoid the degenerate all-zero state.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn step(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl RngCore for SimpleRng {
    fn next_u32(&mut self) -> u32 {
        self.step() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.step()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut i = 0;
        let len = dest.len();
        while i + 8 <= len {
            dest[i..i + 8].copy_from_slice(&self.step().to_le_bytes());
            i += 8;
        }
        if i < len {
            let bytes = self.step().to_le_bytes();
            let remaining = len - i;
            dest[i..].copy_from_slice(&bytes[..remaining]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
