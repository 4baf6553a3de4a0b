//! All camera implementations share the **Camera** trait: turn a pixel
//! sample into a world space ray.

// pbrt
use crate::core::geometry::{Point2f, Point2i, Ray};

pub trait Camera: Send + Sync {
    /// Primary ray through *pixel*, offset within the pixel by
    /// *sample* in `[0, 1)^2`.
    fn generate_ray(&self, pixel: &Point2i, sample: &Point2f) -> Ray;
    fn resolution(&self) -> Point2i;
}
