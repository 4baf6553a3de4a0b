//! The **Film** collects the pixel estimates of the gather pass.
//! Worker threads fill a **FilmTile** each and hand it over to the
//! thread owning the film, which merges it.

// std
use std::path::Path;
// others
use image::ImageResult;
use num::Zero;
// pbrt
use crate::core::geometry::{Bounds2i, Point2i};
use crate::core::pbrt::{clamp_t, gamma_correct, Float, Spectrum};

#[derive(Debug, Clone)]
pub struct FilmTile {
    pub pixel_bounds: Bounds2i,
    pixels: Vec<Spectrum>,
    weights: Vec<Float>,
}

impl FilmTile {
    pub fn new(pixel_bounds: Bounds2i) -> Self {
        let area: usize = pixel_bounds.area().max(0) as usize;
        FilmTile {
            pixel_bounds,
            pixels: vec![Spectrum::zero(); area],
            weights: vec![0.0 as Float; area],
        }
    }
    fn offset(&self, p: &Point2i) -> usize {
        let width: i32 = self.pixel_bounds.p_max.x - self.pixel_bounds.p_min.x;
        ((p.y - self.pixel_bounds.p_min.y) * width + (p.x - self.pixel_bounds.p_min.x)) as usize
    }
    pub fn add_sample(&mut self, p: &Point2i, l: &Spectrum) {
        let offset: usize = self.offset(p);
        self.pixels[offset] += *l;
        self.weights[offset] += 1.0 as Float;
    }
}

#[derive(Debug, Clone)]
pub struct Film {
    pub full_resolution: Point2i,
    pixels: Vec<Spectrum>,
}

impl Film {
    pub fn new(full_resolution: Point2i) -> Self {
        let area: usize = (full_resolution.x.max(0) * full_resolution.y.max(0)) as usize;
        Film {
            full_resolution,
            pixels: vec![Spectrum::zero(); area],
        }
    }
    pub fn get_sample_bounds(&self) -> Bounds2i {
        Bounds2i::new(Point2i { x: 0, y: 0 }, self.full_resolution)
    }
    pub fn merge_film_tile(&mut self, tile: &FilmTile) {
        for p in &tile.pixel_bounds {
            let offset: usize = tile.offset(&p);
            let weight: Float = tile.weights[offset];
            if weight > 0.0 as Float {
                let index: usize = (p.y * self.full_resolution.x + p.x) as usize;
                self.pixels[index] = tile.pixels[offset] / weight;
            }
        }
    }
    pub fn get_pixel(&self, p: &Point2i) -> Spectrum {
        self.pixels[(p.y * self.full_resolution.x + p.x) as usize]
    }
    pub fn pixels(&self) -> &[Spectrum] {
        &self.pixels
    }
    /// Mean of all pixels.
    pub fn average(&self) -> Spectrum {
        if self.pixels.is_empty() {
            return Spectrum::zero();
        }
        let sum: Spectrum = self.pixels.iter().fold(Spectrum::zero(), |sum, l| sum + *l);
        sum / self.pixels.len() as Float
    }
    /// Gamma corrected 8-bit RGB.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut buffer: Vec<u8> = Vec::with_capacity(3 * self.pixels.len());
        for l in &self.pixels {
            for c in 0..3 {
                let v: Float = gamma_correct(l[c].max(0.0 as Float)) * 255.0 as Float + 0.5;
                buffer.push(clamp_t(v, 0.0 as Float, 255.0 as Float) as u8);
            }
        }
        buffer
    }
    pub fn write_image(&self, path: &Path) -> ImageResult<()> {
        image::save_buffer(
            path,
            &self.to_rgb8(),
            self.full_resolution.x as u32,
            self.full_resolution.y as u32,
            image::ColorType::Rgb8,
        )
    }
}
