// pbrt
use crate::core::geometry::{Point2f, Point2i};
use crate::core::pbrt::Float;
use crate::core::rng::Rng;
use crate::core::sampler::Sampler;

/// Independent uniform samples from a PCG stream.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    pub samples_per_pixel: u32,
    pub rng: Rng,
    seed: u64,
    pub current_pixel: Point2i,
    pub current_pixel_sample_index: u32,
}

impl RandomSampler {
    pub fn new(samples_per_pixel: u32, seed: u64) -> Self {
        RandomSampler {
            samples_per_pixel,
            rng: Rng::with_sequence(seed),
            seed,
            current_pixel: Point2i::default(),
            current_pixel_sample_index: 0_u32,
        }
    }
}

impl Sampler for RandomSampler {
    /// Re-derives the stream from the pixel and sample index so a
    /// pixel renders the same no matter which thread picks it up.
    fn start_pixel_sample(&mut self, p: Point2i, sample_index: u32) {
        self.current_pixel = p;
        self.current_pixel_sample_index = sample_index;
        let pixel_hash: u64 = ((p.x as u32 as u64) << 32 | p.y as u32 as u64)
            .wrapping_mul(0x9e37_79b9_7f4a_7c15)
            ^ (sample_index as u64).wrapping_mul(0xc2b2_ae3d_27d4_eb4f);
        self.rng.set_sequence(pixel_hash ^ self.seed);
    }
    fn get_1d(&mut self) -> Float {
        self.rng.uniform_float()
    }
    fn get_2d(&mut self) -> Point2f {
        // C++: call x first
        let x = self.rng.uniform_float();
        let y = self.rng.uniform_float();
        Point2f { x, y }
    }
    fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng.set_sequence(seed);
    }
    fn box_clone(&self) -> Box<dyn Sampler> {
        Box::new(self.clone())
    }
    fn get_samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reseed_reproduces_sequence() {
        let mut a = RandomSampler::new(1, 3);
        let first: Vec<Float> = (0..8).map(|_| a.get_1d()).collect();
        a.reseed(3);
        let second: Vec<Float> = (0..8).map(|_| a.get_1d()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn pixel_samples_do_not_depend_on_history() {
        let mut a = RandomSampler::new(4, 11);
        let mut b = a.box_clone();
        for _ in 0..17 {
            a.get_2d();
        }
        let p = Point2i { x: 5, y: 9 };
        a.start_pixel_sample(p, 2);
        b.start_pixel_sample(p, 2);
        assert_eq!(a.get_1d(), b.get_1d());
        assert_eq!(a.get_2d(), b.get_2d());
    }
}
