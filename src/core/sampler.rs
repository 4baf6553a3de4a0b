//! The **Sampler** trait defines the interface to the generators of
//! sample values used by the photon walker and the gather pass.

// pbrt
use crate::core::geometry::{Point2f, Point2i};
use crate::core::pbrt::Float;

pub trait Sampler: Send {
    /// Prepare for the *sample_index*th sample of pixel *p*.
    fn start_pixel_sample(&mut self, p: Point2i, sample_index: u32);
    /// One uniform value in `[0, 1)`.
    fn get_1d(&mut self) -> Float;
    fn get_2d(&mut self) -> Point2f;
    /// Restart the sequence; equal seeds yield equal sequences.
    fn reseed(&mut self, seed: u64);
    fn box_clone(&self) -> Box<dyn Sampler>;
    fn get_samples_per_pixel(&self) -> u32;
}
