//! Random Number Generator

use hexf::*;

// pbrt
use crate::core::pbrt::Float;

pub const FLOAT_ONE_MINUS_EPSILON: Float = hexf32!("0x1.fffffep-1");
pub const PCG32_DEFAULT_STATE: u64 = 0x853c_49e6_748f_ea9b;
pub const PCG32_DEFAULT_STREAM: u64 = 0xda3e_39cb_94b9_5bdb;
pub const PCG32_MULT: u64 = 0x5851_f42d_4c95_7f2d;

/// PCG32 random number generator. Two generators created with the
/// same sequence index produce identical streams.
#[derive(Debug, Copy, Clone)]
pub struct Rng {
    state: u64,
    inc: u64,
}

impl Default for Rng {
    fn default() -> Self {
        Rng::new()
    }
}

impl Rng {
    pub fn new() -> Self {
        Rng {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
    pub fn with_sequence(initseq: u64) -> Self {
        let mut rng: Rng = Rng::new();
        rng.set_sequence(initseq);
        rng
    }
    pub fn set_sequence(&mut self, initseq: u64) {
        self.state = 0_u64;
        self.inc = initseq.wrapping_shl(1) | 1;
        self.uniform_uint32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        self.uniform_uint32();
    }
    pub fn uniform_uint32(&mut self) -> u32 {
        let oldstate: u64 = self.state;
        self.state = oldstate.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);
        let xorshifted: u32 = (oldstate.wrapping_shr(18) ^ oldstate).wrapping_shr(27) as u32;
        let rot: u32 = oldstate.wrapping_shr(59) as u32;
        xorshifted.wrapping_shr(rot) | xorshifted.wrapping_shl(rot.wrapping_neg() & 31)
    }
    pub fn uniform_uint32_bounded(&mut self, b: u32) -> u32 {
        // bitwise not in Rust is ! (not the ~ operator like in C)
        let threshold = (!b).wrapping_add(1) % b;
        loop {
            let r = self.uniform_uint32();
            if r >= threshold {
                return r % b;
            }
        }
    }
    /// Uniform value in `[0, 1)`.
    pub fn uniform_float(&mut self) -> Float {
        (self.uniform_uint32() as Float * hexf32!("0x1.0p-32") as Float)
            .min(FLOAT_ONE_MINUS_EPSILON)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn same_sequence_same_stream() {
        let mut a = Rng::with_sequence(42);
        let mut b = Rng::with_sequence(42);
        for _ in 0..100 {
            assert_eq!(a.uniform_uint32(), b.uniform_uint32());
        }
        let mut c = Rng::with_sequence(43);
        let differs = (0..100).any(|_| a.uniform_uint32() != c.uniform_uint32());
        assert!(differs);
    }

    #[test]
    fn uniform_float_stays_below_one() {
        let mut rng = Rng::with_sequence(7);
        for _ in 0..10_000 {
            let u = rng.uniform_float();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn bounded_values_in_range() {
        let mut rng = Rng::new();
        for _ in 0..1000 {
            assert!(rng.uniform_uint32_bounded(7) < 7);
        }
    }
}
