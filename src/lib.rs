//! # rs_photon
//!
//! [Rust][rust] crate rendering images with photon mapping, in the
//! spirit of the [PBRT book][book]. Light is traced from the emitters
//! into the scene first and stored in photon maps; the render pass
//! then estimates the radiance reaching the camera from the density of
//! nearby photons.
//!
//! The render loop can be found [here].
//!
//! [rust]: https://www.rust-lang.org
//! [book]: http://www.pbrt.org
//! [here]: integrators/photon_map/struct.PhotonMapIntegrator.html#method.render

#[macro_use]
extern crate impl_ops;

pub mod blockqueue;
pub mod cameras;
pub mod core;
pub mod integrators;
pub mod lights;
pub mod materials;
pub mod media;
pub mod samplers;
pub mod shapes;
