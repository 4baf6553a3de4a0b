//! Implementations of the **Medium** trait provide representations of
//! volumetric scattering properties in a region of space.
//!
//! - HomogeneousMedium
//!
//! ## Homogeneous Medium
//!
//! Constant absorption and scattering everywhere inside the region,
//! with a Henyey-Greenstein phase function. Fog around a light source
//! is enough to see volume photons at work.

pub mod homogeneous;
