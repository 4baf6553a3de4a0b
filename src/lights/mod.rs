//! In order for objects in a scene to be visible, there must be a
//! source of illumination so that some light is reflected from them
//! to the camera sensor. Besides emissive shapes (see **Quad** and
//! **Sphere**) there are two light primitives:
//!
//! - PointLight
//! - UniformInfiniteLight
//!
//! ## Point Lights
//!
//! Isotropic point light source that emits the same amount of light
//! in all directions. Being a delta light it can only be reached by
//! explicit light sampling, never by a ray.
//!
//! ## Infinite Lights
//!
//! An infinitely far away light source that surrounds the entire
//! scene with constant radiance. Rays which leave the scene pick up
//! its radiance.

pub mod infinite;
pub mod point;
