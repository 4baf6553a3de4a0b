//! A **Primitive** couples geometry with its scattering function and,
//! if it emits light, with its emission. Lights are primitives too:
//! point lights are delta primitives which cannot be hit, an infinite
//! light surrounds the scene.

// std
use std::sync::Arc;
// pbrt
use crate::core::geometry::{Bounds3f, Normal3f, Point3f, Ray, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::pbrt::{Float, Spectrum};
use crate::core::reflection::Bsdf;
use crate::core::sampler::Sampler;

/// A position and direction sampled on an emitter.
#[derive(Debug, Default, Copy, Clone)]
pub struct LightSample {
    /// Point on the emitter.
    pub p: Point3f,
    /// Emitter normal at *p* (zero for point lights).
    pub n: Normal3f,
    /// Outbound samples: direction of emission. Inbound samples: unit
    /// direction from the reference point towards *p*.
    pub d: Vector3f,
    /// Inbound samples: distance to *p*, infinite for infinite lights.
    pub dist: Float,
    /// Emitted quantity divided by the sample density: flux for
    /// outbound samples, radiance for inbound samples.
    pub weight: Spectrum,
    /// Density of the sample; solid angle density for inbound samples.
    pub pdf: Float,
}

pub trait Primitive: Send + Sync {
    /// Closest hit with `t < ray.t_max`; shortens `ray.t_max` on success.
    fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction>;
    fn occluded(&self, ray: &Ray) -> bool;
    fn is_delta(&self) -> bool {
        false
    }
    fn is_infinite(&self) -> bool {
        false
    }
    fn is_emissive(&self) -> bool;
    /// Sample a photon leaving the emitter.
    fn sample_outbound_direction(&self, sampler: &mut dyn Sampler) -> Option<LightSample>;
    /// Sample a direction from *p* towards the emitter.
    fn sample_inbound_direction(&self, p: &Point3f, sampler: &mut dyn Sampler)
        -> Option<LightSample>;
    /// Solid angle density with which `sample_inbound_direction(p)`
    /// produces the point *si* seen along `-si.wo`.
    fn inbound_pdf(&self, p: &Point3f, si: &SurfaceInteraction) -> Float;
    /// Radiance leaving *si* in direction *w*.
    fn emission(&self, si: &SurfaceInteraction, w: &Vector3f) -> Spectrum;
    /// Rough emitted power as seen from *p*, or in total for `None`.
    fn approximate_radiance(&self, p: Option<&Point3f>) -> Float;
    fn bsdf(&self, index: usize) -> Option<Arc<dyn Bsdf>>;
    fn world_bound(&self) -> Bounds3f;
}
