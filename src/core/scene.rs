//! # Scene
//!
//! The **Scene** stores the primitives (lights included) and an
//! optional homogeneous region of participating media. Intersection
//! tests simply loop over all primitives, which is fine for the small
//! scenes the photon mapper is exercised with.

// std
use std::sync::Arc;
// pbrt
use crate::core::geometry::{bnd3_union_bnd3f, Bounds3f, Normal3f, Ray, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::medium::Medium;
use crate::core::pbrt::{Float, Spectrum};
use crate::core::primitive::Primitive;

/// A participating medium filling an axis-aligned box.
#[derive(Clone)]
pub struct MediumRegion {
    pub medium: Arc<dyn Medium>,
    pub bounds: Bounds3f,
}

#[derive(Clone)]
pub struct Scene {
    pub primitives: Vec<Arc<dyn Primitive>>,
    /// Indices of the emissive primitives.
    pub lights: Vec<usize>,
    pub infinite_lights: Vec<usize>,
    pub medium: Option<MediumRegion>,
    pub world_bound: Bounds3f,
}

impl Scene {
    pub fn new(primitives: Vec<Arc<dyn Primitive>>, medium: Option<MediumRegion>) -> Self {
        let mut world_bound: Bounds3f = Bounds3f::default();
        let mut lights: Vec<usize> = Vec::new();
        let mut infinite_lights: Vec<usize> = Vec::new();
        for (i, prim) in primitives.iter().enumerate() {
            if prim.is_emissive() {
                lights.push(i);
                if prim.is_infinite() {
                    infinite_lights.push(i);
                }
            }
            if !prim.is_infinite() {
                world_bound = bnd3_union_bnd3f(&world_bound, &prim.world_bound());
            }
        }
        if let Some(ref region) = medium {
            world_bound = bnd3_union_bnd3f(&world_bound, &region.bounds);
        }
        Scene {
            primitives,
            lights,
            infinite_lights,
            medium,
            world_bound,
        }
    }
    pub fn world_bound(&self) -> Bounds3f {
        self.world_bound
    }
    /// Closest hit along the ray; `ray.t_max` ends up at the hit.
    pub fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction> {
        let mut closest: Option<SurfaceInteraction> = None;
        for (i, prim) in self.primitives.iter().enumerate() {
            if let Some(mut si) = prim.intersect(ray) {
                si.primitive = Some(i);
                closest = Some(si);
            }
        }
        closest
    }
    pub fn occluded(&self, ray: &Ray) -> bool {
        self.primitives.iter().any(|prim| prim.occluded(ray))
    }
    /// Radiance emitted by the primitive hit at *si* towards `si.wo`.
    pub fn emission(&self, si: &SurfaceInteraction) -> Spectrum {
        match si.primitive {
            Some(index) => self.primitives[index].emission(si, &si.wo),
            None => Spectrum::default(),
        }
    }
    /// Radiance arriving along a ray that left the scene.
    pub fn escaped_radiance(&self, ray: &Ray) -> Spectrum {
        let mut l: Spectrum = Spectrum::default();
        if self.infinite_lights.is_empty() {
            return l;
        }
        let si: SurfaceInteraction = self.escaped_interaction(ray);
        for index in &self.infinite_lights {
            l += self.primitives[*index].emission(&si, &si.wo);
        }
        l
    }
    /// Stand-in hit record for a ray which escaped towards infinity.
    pub fn escaped_interaction(&self, ray: &Ray) -> SurfaceInteraction {
        let d: Vector3f = ray.d.normalize();
        SurfaceInteraction::new(ray.o, Normal3f::from(-d), -d, Float::INFINITY)
    }
    /// Parametric range of the ray (up to `ray.t_max`) inside the
    /// medium region.
    pub fn medium_segment(&self, ray: &Ray) -> Option<(Arc<dyn Medium>, Float, Float)> {
        let region: &MediumRegion = self.medium.as_ref()?;
        let (t0, t1) = region.bounds.intersect_p(ray)?;
        if t1 <= t0 {
            return None;
        }
        Some((region.medium.clone(), t0, t1))
    }
    /// Transmittance along the ray up to `ray.t_max`.
    pub fn transmittance(&self, ray: &Ray) -> Spectrum {
        match self.medium_segment(ray) {
            Some((medium, t0, t1)) => {
                let segment: Ray = Ray::with_t_max(ray.position(t0), ray.d, t1 - t0);
                medium.tr(&segment)
            }
            None => Spectrum::new(1.0 as Float),
        }
    }
}
