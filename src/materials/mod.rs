//! Scattering functions attached to shapes.
//!
//! - GlassBsdf
//! - MatteBsdf
//! - MirrorBsdf
//!
//! ## Matte
//!
//! Purely diffuse (Lambertian) surface. Only matte surfaces store
//! photons and gather them; the other two are delta distributions
//! which the photon walker and the gather pass continue through.
//!
//! ## Mirror
//!
//! A simple mirror, modeled with perfect specular reflection.
//!
//! ## Glass
//!
//! A smooth dielectric which reflects or refracts depending on the
//! Fresnel reflectance. Caustics behind glass objects are what the
//! surface photon map resolves best.

pub mod glass;
pub mod matte;
pub mod mirror;
