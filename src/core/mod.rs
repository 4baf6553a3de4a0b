//! The building blocks every other module is written against: basic
//! types for geometry and color, random numbers and sampling, and the
//! traits a scene is assembled from (**Primitive**, **Bsdf**,
//! **Medium**, **Camera**, **Sampler**).

pub mod camera;
pub mod film;
pub mod geometry;
pub mod interaction;
pub mod lightdistrib;
pub mod medium;
pub mod pbrt;
pub mod primitive;
pub mod reflection;
pub mod rng;
pub mod sampler;
pub mod sampling;
pub mod scene;
pub mod spectrum;
