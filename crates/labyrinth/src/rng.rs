//! Counter-based deterministic random stream.
//!
//! Purpose
//! - Every generation run owns one `MazeRng`; the k-th draw is a pure function
//!   of `(seed, k)`, so identical seeds replay identical mazes on any platform
//!   and any `rand` release.
//!
//! Model
//! - `next_u64` mixes the seed with the draw counter through the SplitMix64
//!   finalizer; `next_f64` keeps the top 53 bits.
//! - Implements `RngCore`/`SeedableRng` so callers may still use `rand`
//!   adaptors; `seed_from_u64` stores the raw seed (no PCG pre-mixing).

use rand::{RngCore, SeedableRng};

const GOLDEN: u64 = 0x9e37_79b9_7f4a_7c15;

#[inline]
fn mix(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

/// Seeded float stream in `[0, 1)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeRng {
    seed: u64,
    counter: u64,
}

impl MazeRng {
    pub fn new(seed: u64) -> Self {
        Self { seed, counter: 0 }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of 64-bit draws taken so far.
    pub fn draws(&self) -> u64 {
        self.counter
    }

    /// Next float in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

impl RngCore for MazeRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        let k = mix(self.seed ^ mix(self.counter.wrapping_add(GOLDEN)));
        self.counter = self.counter.wrapping_add(1);
        k
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for MazeRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = MazeRng::seed_from_u64(38763);
        let mut b = MazeRng::new(38763);
        for _ in 0..1000 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
        assert_eq!(a.draws(), 1000);
    }

    #[test]
    fn floats_stay_in_unit_interval() {
        let mut rng = MazeRng::new(7);
        for _ in 0..10_000 {
            let u = rng.next_f64();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn draw_is_function_of_counter() {
        let mut a = MazeRng::new(99);
        let _ = a.next_u64();
        let third_a = {
            let _ = a.next_u64();
            a.next_u64()
        };
        let mut b = MazeRng::new(99);
        b.counter = 2;
        assert_eq!(b.next_u64(), third_a);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = MazeRng::new(1);
        let mut b = MazeRng::new(2);
        let same = (0..64).filter(|_| a.next_u64() == b.next_u64()).count();
        assert_eq!(same, 0);
    }

    #[test]
    fn composes_with_rand_adaptors() {
        let mut rng = MazeRng::from_seed(5u64.to_le_bytes());
        assert_eq!(rng.seed(), 5);
        let x: f64 = rng.gen_range(-2.0..2.0);
        assert!((-2.0..2.0).contains(&x));
        let mut buf = [0u8; 13];
        rng.fill_bytes(&mut buf);
        assert!(buf.iter().any(|&b| b != 0));
    }
}
