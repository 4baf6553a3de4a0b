//! Integrators compute the radiance arriving at the film.
//!
//! - PhotonMapIntegrator
//!
//! ## Photon Mapping
//!
//! Traces photons from the light sources first, stores them in
//! kd-trees and estimates the reflected (or in-scattered) radiance at
//! the points seen by the camera from the photons found nearby. See
//! the **photon_map** module for the details.

pub mod photon_map;
