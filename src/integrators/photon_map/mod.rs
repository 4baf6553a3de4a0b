//! # Photon Mapping
//!
//! A two pass algorithm. The first pass traces photons from the
//! emitters through the scene and stores them wherever they hit a
//! non-specular surface (surface photons) or scatter inside a
//! participating medium (volume photons). Both stores are balanced
//! **KdTree**s, built once and only read afterwards.
//!
//! The second pass traces one eye path per pixel sample. Specular
//! surfaces are followed, and at the first diffuse or glossy vertex
//! the nearby photons are used for a density estimate of the
//! reflected radiance. Inside a medium the volume photons estimate
//! the in-scattered radiance instead.
//!
//! Whether direct lighting comes out of the photon map as well or is
//! sampled explicitly at the gather vertex is controlled by
//! **DirectLighting**.

// std
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
// others
use atomic::Atomic;
use log::{debug, info, warn};
use thiserror::Error;
// pbrt
use crate::blockqueue::BlockQueue;
use crate::core::camera::Camera;
use crate::core::film::{Film, FilmTile};
use crate::core::geometry::{Bounds2i, Point2i};
use crate::core::lightdistrib::{compute_light_power_distribution, LightDistribution};
use crate::core::pbrt::{Float, Spectrum};
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::integrators::photon_map::kdtree::KdTree;
use crate::integrators::photon_map::photon::{Photon, VolumePhoton};
use crate::integrators::photon_map::settings::{PhotonMapSettings, SettingsError};
use crate::integrators::photon_map::tracer::PhotonTracer;
use crate::samplers::random::RandomSampler;

pub mod kdtree;
pub mod photon;
pub mod settings;
pub mod tracer;

/// Photon paths traced by a worker before the deposits are handed to
/// the collecting thread.
const PHOTON_BATCH: usize = 1024;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid photon map settings: {0}")]
    InvalidSettings(#[from] SettingsError),
    #[error("the scene has no light emitting any power")]
    NoEmitters,
    #[error("the camera resolution has no pixels")]
    EmptyImage,
    #[error("a worker thread panicked")]
    WorkerPanicked,
}

/// Photons traced by one worker for a range of consecutive paths.
struct PhotonBatch {
    index: usize,
    /// Surface and volume deposits of every path, in tracing order.
    paths: Vec<(usize, usize)>,
    surface: Vec<Photon>,
    volume: Vec<VolumePhoton>,
}

/// Result of the photon pass.
pub struct PhotonMaps {
    pub surface: KdTree<Photon>,
    pub volume: Option<KdTree<VolumePhoton>>,
    /// Paths traced while the surface store was accepting photons.
    pub surface_paths: usize,
    /// Paths traced while the volume store was accepting photons.
    pub volume_paths: usize,
}

pub struct PhotonMapIntegrator {
    pub camera: Arc<dyn Camera>,
    pub settings: PhotonMapSettings,
}

impl PhotonMapIntegrator {
    pub fn new(camera: Arc<dyn Camera>, settings: PhotonMapSettings) -> Self {
        PhotonMapIntegrator { camera, settings }
    }
    fn num_cores(&self) -> usize {
        if self.settings.num_threads == 0 {
            num_cpus::get()
        } else {
            self.settings.num_threads
        }
    }
    /// Render the scene; returns the finished image.
    pub fn render(&self, scene: &Scene) -> Result<Film, RenderError> {
        self.settings.validate()?;
        let resolution: Point2i = self.camera.resolution();
        if resolution.x <= 0 || resolution.y <= 0 {
            return Err(RenderError::EmptyImage);
        }
        let light_distrib: LightDistribution =
            compute_light_power_distribution(scene).ok_or(RenderError::NoEmitters)?;
        let maps: PhotonMaps = self.trace_photons(scene, &light_distrib)?;
        self.gather(scene, &light_distrib, &maps)
    }
    /// First pass: fill and build the photon stores.
    pub fn trace_photons(
        &self,
        scene: &Scene,
        light_distrib: &LightDistribution,
    ) -> Result<PhotonMaps, RenderError> {
        let start = Instant::now();
        let num_cores: usize = self.num_cores();
        let settings: &PhotonMapSettings = &self.settings;
        let budget: usize = settings.path_budget();
        let volume_enabled: bool = settings.volume_photon_count > 0 && scene.medium.is_some();
        info!(
            "Tracing photons with {} thread(s), {} surface / {} volume photons wanted ...",
            num_cores,
            settings.photon_count,
            if volume_enabled {
                settings.volume_photon_count
            } else {
                0
            }
        );
        let done: Atomic<bool> = Atomic::new(false);
        let next_batch: AtomicUsize = AtomicUsize::new(0);
        let camera: &dyn Camera = self.camera.as_ref();
        let prototype: RandomSampler = RandomSampler::new(settings.spp, settings.seed);
        let collected = crossbeam::scope(|scope| {
            let (batch_tx, batch_rx) = crossbeam_channel::bounded::<PhotonBatch>(num_cores);
            let done = &done;
            let next_batch = &next_batch;
            // spawn worker threads
            for _ in 0..num_cores {
                let batch_tx = batch_tx.clone();
                let mut sampler: Box<dyn Sampler> = prototype.box_clone();
                scope.spawn(move |_| {
                    let mut tracer = PhotonTracer::new(scene, camera, settings, light_distrib);
                    while !done.load(Ordering::Acquire) {
                        let index: usize = next_batch.fetch_add(1, Ordering::AcqRel);
                        let first: usize = index * PHOTON_BATCH;
                        if first >= budget {
                            break;
                        }
                        // batches are reproducible no matter which thread traces them
                        sampler.reseed(batch_seed(settings.seed, index));
                        let mut batch = PhotonBatch {
                            index,
                            paths: Vec::with_capacity(PHOTON_BATCH),
                            surface: Vec::new(),
                            volume: Vec::new(),
                        };
                        for _ in first..budget.min(first + PHOTON_BATCH) {
                            let deposited = tracer.trace_photon(
                                &mut batch.surface,
                                &mut batch.volume,
                                sampler.as_mut(),
                            );
                            batch.paths.push(deposited);
                        }
                        if batch_tx.send(batch).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(batch_tx);
            // merge batches in order until the stores are full
            let mut pb = pbr::ProgressBar::new(settings.photon_count as u64);
            let mut pending: BTreeMap<usize, PhotonBatch> = BTreeMap::new();
            let mut next_index: usize = 0;
            let mut surface: Vec<Photon> = Vec::new();
            let mut volume: Vec<VolumePhoton> = Vec::new();
            let mut paths: usize = 0;
            let mut surface_paths: usize = 0;
            let mut volume_paths: usize = 0;
            let mut finished: bool = false;
            for batch in batch_rx.iter() {
                pending.insert(batch.index, batch);
                while let Some(batch) = pending.remove(&next_index) {
                    next_index += 1;
                    if finished {
                        // drain, the workers stop on their own
                        continue;
                    }
                    let mut s_offset: usize = 0;
                    let mut v_offset: usize = 0;
                    for (n_surface, n_volume) in batch.paths.iter() {
                        let surface_full: bool = surface.len() >= settings.photon_count;
                        let volume_full: bool =
                            !volume_enabled || volume.len() >= settings.volume_photon_count;
                        if paths >= budget || (surface_full && volume_full) {
                            finished = true;
                            break;
                        }
                        paths += 1;
                        if !surface_full {
                            surface.extend_from_slice(
                                &batch.surface[s_offset..s_offset + n_surface],
                            );
                            surface_paths += 1;
                        }
                        if !volume_full {
                            volume.extend(
                                batch.volume[v_offset..v_offset + n_volume].iter().cloned(),
                            );
                            volume_paths += 1;
                        }
                        s_offset += n_surface;
                        v_offset += n_volume;
                    }
                    pb.set(surface.len().min(settings.photon_count) as u64);
                    if !finished
                        && (paths >= budget
                            || (surface.len() >= settings.photon_count
                                && (!volume_enabled
                                    || volume.len() >= settings.volume_photon_count)))
                    {
                        finished = true;
                    }
                    if finished {
                        done.store(true, Ordering::Release);
                    }
                }
            }
            pb.finish();
            (surface, volume, paths, surface_paths, volume_paths)
        })
        .map_err(|_| RenderError::WorkerPanicked)?;
        let (mut surface, mut volume, paths, surface_paths, volume_paths) = collected;
        if surface.len() < settings.photon_count {
            warn!(
                "Stored {} of {} surface photons after {} paths",
                surface.len(),
                settings.photon_count,
                paths
            );
        }
        // every store estimates flux per path it was open for
        if surface_paths > 0 {
            let inv: Float = 1.0 as Float / surface_paths as Float;
            for photon in surface.iter_mut() {
                photon.power = photon.power * inv;
            }
        }
        if volume_paths > 0 {
            let inv: Float = 1.0 as Float / volume_paths as Float;
            for photon in volume.iter_mut() {
                photon.power = photon.power * inv;
            }
        }
        info!(
            "Traced {} photon paths, stored {} surface and {} volume photons in {:.3}s",
            paths,
            surface.len(),
            volume.len(),
            start.elapsed().as_secs_f32()
        );
        debug!(
            "{} caustic surface photons, {} surface and {} volume photons scattered in a medium",
            surface.iter().filter(|photon| photon.is_caustic()).count(),
            surface.iter().filter(|photon| photon.scattered_in_medium()).count(),
            volume.iter().filter(|photon| photon.scattered_in_medium()).count()
        );
        let build_start = Instant::now();
        let surface_tree: KdTree<Photon> = KdTree::new(surface);
        let volume_tree: Option<KdTree<VolumePhoton>> = if volume_enabled {
            Some(KdTree::new(volume))
        } else {
            None
        };
        debug!(
            "Built photon kd-trees in {:.3}s",
            build_start.elapsed().as_secs_f32()
        );
        Ok(PhotonMaps {
            surface: surface_tree,
            volume: volume_tree,
            surface_paths,
            volume_paths,
        })
    }
    /// Second pass: density estimation for every pixel sample.
    pub fn gather(
        &self,
        scene: &Scene,
        light_distrib: &LightDistribution,
        maps: &PhotonMaps,
    ) -> Result<Film, RenderError> {
        let start = Instant::now();
        let num_cores: usize = self.num_cores();
        let settings: &PhotonMapSettings = &self.settings;
        let mut film: Film = Film::new(self.camera.resolution());
        let sample_bounds: Bounds2i = film.get_sample_bounds();
        let tile_size: i32 = 16;
        let n_tiles: Point2i = Point2i {
            x: (sample_bounds.p_max.x - sample_bounds.p_min.x + tile_size - 1) / tile_size,
            y: (sample_bounds.p_max.y - sample_bounds.p_min.y + tile_size - 1) / tile_size,
        };
        info!("Gathering with {} thread(s) ...", num_cores);
        let block_queue = BlockQueue::new(
            (
                (n_tiles.x * tile_size) as u32,
                (n_tiles.y * tile_size) as u32,
            ),
            (tile_size as u32, tile_size as u32),
        );
        let bq = &block_queue;
        let camera: &dyn Camera = self.camera.as_ref();
        let surface_tree: &KdTree<Photon> = &maps.surface;
        let volume_tree: Option<&KdTree<VolumePhoton>> = maps.volume.as_ref();
        let sampler: RandomSampler = RandomSampler::new(settings.spp, settings.seed);
        let film_ref: &mut Film = &mut film;
        crossbeam::scope(|scope| {
            let (pixel_tx, pixel_rx) = crossbeam_channel::bounded::<FilmTile>(num_cores);
            // spawn worker threads
            for _ in 0..num_cores {
                let pixel_tx = pixel_tx.clone();
                let mut tile_sampler: Box<dyn Sampler> = sampler.box_clone();
                scope.spawn(move |_| {
                    let mut tracer = PhotonTracer::new(scene, camera, settings, light_distrib);
                    while let Some((x, y)) = bq.next() {
                        let x0: i32 = sample_bounds.p_min.x + x as i32 * tile_size;
                        let x1: i32 = std::cmp::min(x0 + tile_size, sample_bounds.p_max.x);
                        let y0: i32 = sample_bounds.p_min.y + y as i32 * tile_size;
                        let y1: i32 = std::cmp::min(y0 + tile_size, sample_bounds.p_max.y);
                        let tile_bounds: Bounds2i =
                            Bounds2i::new(Point2i { x: x0, y: y0 }, Point2i { x: x1, y: y1 });
                        let mut film_tile: FilmTile = FilmTile::new(tile_bounds);
                        for pixel in &tile_bounds {
                            for sample_index in 0..settings.spp {
                                tile_sampler.start_pixel_sample(pixel, sample_index);
                                let l: Spectrum = tracer.trace_sample(
                                    &pixel,
                                    surface_tree,
                                    volume_tree,
                                    tile_sampler.as_mut(),
                                    settings.gather_radius,
                                );
                                let l: Spectrum = checked_radiance(l, &pixel, sample_index);
                                film_tile.add_sample(&pixel, &l);
                            }
                        }
                        // send the tile through the channel to main thread
                        if pixel_tx.send(film_tile).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(pixel_tx);
            for _ in pbr::PbIter::new(0..bq.len()) {
                match pixel_rx.recv() {
                    // merge image tile into _Film_
                    Ok(film_tile) => film_ref.merge_film_tile(&film_tile),
                    Err(_) => break,
                }
            }
        })
        .map_err(|_| RenderError::WorkerPanicked)?;
        info!("Gather pass took {:.3}s", start.elapsed().as_secs_f32());
        Ok(film)
    }
}

/// Stream seed of a batch of photon paths.
fn batch_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

/// Replace radiance samples which are not valid with black.
fn checked_radiance(l: Spectrum, pixel: &Point2i, sample_index: u32) -> Spectrum {
    let y: Float = l.y();
    if l.has_nans() {
        warn!(
            "Not-a-number radiance value returned for pixel ({:?}, {:?}), sample {:?}. \
             Setting to black.",
            pixel.x, pixel.y, sample_index
        );
        Spectrum::default()
    } else if y < -10.0e-5 as Float {
        warn!(
            "Negative luminance value, {:?}, returned for pixel ({:?}, {:?}), sample {:?}. \
             Setting to black.",
            y, pixel.x, pixel.y, sample_index
        );
        Spectrum::default()
    } else if y.is_infinite() {
        warn!(
            "Infinite luminance value returned for pixel ({:?}, {:?}), sample {:?}. \
             Setting to black.",
            pixel.x, pixel.y, sample_index
        );
        Spectrum::default()
    } else {
        l.sanitize()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn invalid_samples_become_black() {
        let p = Point2i { x: 1, y: 2 };
        assert!(checked_radiance(Spectrum::new(Float::NAN), &p, 0).is_black());
        assert!(checked_radiance(Spectrum::new(-1.0), &p, 0).is_black());
        assert!(checked_radiance(Spectrum::new(Float::INFINITY), &p, 0).is_black());
        let mixed = checked_radiance(Spectrum::rgb(1.0, -1e-6, 0.5), &p, 0);
        assert_eq!(mixed, Spectrum::rgb(1.0, 0.0, 0.5));
    }

    #[test]
    fn batch_seeds_differ() {
        assert_ne!(batch_seed(0, 0), batch_seed(0, 1));
        assert_ne!(batch_seed(0, 3), batch_seed(1, 3));
    }
}
