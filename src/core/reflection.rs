//! Scattering functions at surfaces. A **Bsdf** works in world space
//! and receives the geometric normal of the hit; all directions point
//! away from the surface.

// pbrt
use crate::core::geometry::{vec3_dot_nrmf, Normal3f, Point2f, Vector3f};
use crate::core::pbrt::{clamp_t, Float, Spectrum};

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BxdfType {
    BsdfReflection = 1,
    BsdfTransmission = 2,
    BsdfDiffuse = 4,
    BsdfGlossy = 8,
    BsdfSpecular = 16,
    BsdfAll = 31,
}

/// Scattering is evaluated differently when light is transported
/// from the camera (radiance) or from the emitters (importance);
/// refraction is not symmetric.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransportMode {
    Radiance,
    Importance,
}

#[derive(Debug, Default, Copy, Clone)]
pub struct BsdfSample {
    pub wi: Vector3f,
    pub f: Spectrum,
    pub pdf: Float,
    pub sampled_type: u8,
}

impl BsdfSample {
    pub fn is_specular(&self) -> bool {
        self.sampled_type & BxdfType::BsdfSpecular as u8 != 0
    }
}

pub trait Bsdf: Send + Sync {
    /// Value of the distribution function for the pair of directions.
    /// Delta components evaluate to black.
    fn f(&self, wo: &Vector3f, wi: &Vector3f, n: &Normal3f, mode: TransportMode) -> Spectrum;
    fn sample_f(
        &self,
        wo: &Vector3f,
        n: &Normal3f,
        u: &Point2f,
        mode: TransportMode,
    ) -> Option<BsdfSample>;
    fn pdf(&self, wo: &Vector3f, wi: &Vector3f, n: &Normal3f) -> Float;
    /// Union of the **BxdfType** bits of all lobes.
    fn flags(&self) -> u8;
    fn is_specular(&self) -> bool {
        self.flags() & (BxdfType::BsdfDiffuse as u8 | BxdfType::BsdfGlossy as u8) == 0
    }
}

/// Check that two vectors lie on the same side of the surface.
pub fn same_hemisphere(w: &Vector3f, wp: &Vector3f, n: &Normal3f) -> bool {
    vec3_dot_nrmf(w, n) * vec3_dot_nrmf(wp, n) > 0.0 as Float
}

/// Direction of the refracted ray for *wi* through an interface with
/// relative index *eta*, or `None` on total internal reflection. The
/// normal must lie on the side of *wi*.
pub fn refract(wi: &Vector3f, n: &Normal3f, eta: Float) -> Option<Vector3f> {
    // compute $\cos \theta_\roman{t}$ using Snell's law
    let cos_theta_i: Float = vec3_dot_nrmf(wi, n);
    let sin2_theta_i: Float = (0.0 as Float).max(1.0 as Float - cos_theta_i * cos_theta_i);
    let sin2_theta_t: Float = eta * eta * sin2_theta_i;
    // handle total internal reflection for transmission
    if sin2_theta_t >= 1.0 as Float {
        return None;
    }
    let cos_theta_t: Float = (1.0 as Float - sin2_theta_t).sqrt();
    Some(-(*wi) * eta + Vector3f::from(*n) * (eta * cos_theta_i - cos_theta_t))
}

/// Computes the Fresnel reflection formula for dielectric materials
/// and unpolarized light.
pub fn fr_dielectric(cos_theta_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let mut cos_theta_i = clamp_t(cos_theta_i, -1.0, 1.0);
    // potentially swap indices of refraction
    let entering: bool = cos_theta_i > 0.0;
    let mut local_eta_i = eta_i;
    let mut local_eta_t = eta_t;
    if !entering {
        std::mem::swap(&mut local_eta_i, &mut local_eta_t);
        cos_theta_i = cos_theta_i.abs();
    }
    // compute _cos_theta_t_ using Snell's law
    let sin_theta_i: Float = (0.0 as Float)
        .max(1.0 as Float - cos_theta_i * cos_theta_i)
        .sqrt();
    let sin_theta_t: Float = local_eta_i / local_eta_t * sin_theta_i;
    // handle total internal reflection
    if sin_theta_t >= 1.0 as Float {
        return 1.0 as Float;
    }
    let cos_theta_t: Float = (0.0 as Float)
        .max(1.0 as Float - sin_theta_t * sin_theta_t)
        .sqrt();
    let r_parl: Float = ((local_eta_t * cos_theta_i) - (local_eta_i * cos_theta_t))
        / ((local_eta_t * cos_theta_i) + (local_eta_i * cos_theta_t));
    let r_perp: Float = ((local_eta_i * cos_theta_i) - (local_eta_t * cos_theta_t))
        / ((local_eta_i * cos_theta_i) + (local_eta_t * cos_theta_t));
    (r_parl * r_parl + r_perp * r_perp) / 2.0
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fresnel_at_normal_incidence() {
        // ((1.5 - 1) / (1.5 + 1))^2
        assert!((fr_dielectric(1.0, 1.0, 1.5) - 0.04).abs() < 1e-5);
        // leaving the denser medium at a grazing angle
        assert_eq!(fr_dielectric(-0.1, 1.0, 1.5), 1.0);
    }

    #[test]
    fn refract_bends_towards_normal() {
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.6, 0.0, 0.8);
        let wt = refract(&wi, &n, 1.0 / 1.5).unwrap();
        assert!(wt.z < 0.0);
        assert!((wt.length() - 1.0).abs() < 1e-5);
        // sin(theta_t) = sin(theta_i) / 1.5
        assert!((wt.x + 0.4).abs() < 1e-5);
        assert!(refract(&Vector3f::new(0.9, 0.0, 0.436), &n, 1.5).is_none());
    }
}
