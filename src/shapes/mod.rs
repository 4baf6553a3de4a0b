//! Geometric shapes the photon mapper can hit. Each shape carries its
//! scattering function and, optionally, an emitted radiance which
//! turns it into an area light.
//!
//! - Quad
//! - Sphere
//!
//! ## Quads
//!
//! A **Quad** is a parallelogram given by a base corner and two
//! edges. Emissive quads only emit on their front side, the one the
//! cross product of the edges points to.
//!
//! ## Spheres
//!
//! Spheres are a special case of a general type of surfaces called
//! quadrics. They are the simplest type of curved surfaces that is
//! useful to a ray tracer and are a good starting point for general
//! ray intersection routines. Lit spheres are sampled uniformly
//! within the cone of directions they subtend.

pub mod quad;
pub mod sphere;
