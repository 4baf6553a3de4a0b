//! Participating media. A **Medium** samples free-flight distances
//! along a ray segment and reports the transmittance of a segment; its
//! **PhaseFunction** describes the angular distribution of scattered
//! light.

// std
use std::f32::consts::PI;
// pbrt
use crate::core::geometry::{
    spherical_direction_vec3, vec3_coordinate_system, vec3_dot_vec3f, Point2f, Point3f, Ray,
    Vector3f,
};
use crate::core::pbrt::{Float, Spectrum, INV_4_PI};
use crate::core::sampler::Sampler;

pub trait PhaseFunction: Send + Sync {
    /// Value for the pair of directions; both point away from the
    /// scattering point.
    fn p(&self, wo: &Vector3f, wi: &Vector3f) -> Float;
    /// Sampled incident direction together with the phase value, which
    /// is also its density.
    fn sample_p(&self, wo: &Vector3f, u: &Point2f) -> (Float, Vector3f);
}

/// Henyey-Greenstein phase function.
#[derive(Debug, Copy, Clone)]
pub struct HenyeyGreenstein {
    /// The asymmetry parameter, `g = 0` is isotropic.
    pub g: Float,
}

impl HenyeyGreenstein {
    pub fn new(g: Float) -> Self {
        HenyeyGreenstein { g }
    }
}

impl PhaseFunction for HenyeyGreenstein {
    fn p(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        phase_hg(vec3_dot_vec3f(wo, wi), self.g)
    }
    fn sample_p(&self, wo: &Vector3f, u: &Point2f) -> (Float, Vector3f) {
        // compute $\cos \theta$ for Henyey--Greenstein sample
        let g: Float = self.g;
        let cos_theta: Float = if g.abs() < 1e-3 as Float {
            1.0 as Float - 2.0 as Float * u.x
        } else {
            let sqr_term: Float = (1.0 as Float - g * g) / (1.0 as Float + g - 2.0 as Float * g * u.x);
            -(1.0 as Float + g * g - sqr_term * sqr_term) / (2.0 as Float * g)
        };
        // compute direction _wi_ for Henyey--Greenstein sample
        let sin_theta: Float = (0.0 as Float)
            .max(1.0 as Float - cos_theta * cos_theta)
            .sqrt();
        let phi: Float = 2.0 as Float * PI * u.y;
        let (v1, v2) = vec3_coordinate_system(wo);
        let wi: Vector3f = spherical_direction_vec3(sin_theta, cos_theta, phi, &v1, &v2, wo);
        (phase_hg(cos_theta, g), wi)
    }
}

pub fn phase_hg(cos_theta: Float, g: Float) -> Float {
    let denom: Float = 1.0 as Float + g * g + 2.0 as Float * g * cos_theta;
    INV_4_PI * (1.0 as Float - g * g) / (denom * denom.sqrt())
}

/// Outcome of a free-flight distance sample along a ray segment.
#[derive(Debug, Default, Copy, Clone)]
pub struct MediumSample {
    /// Scattering position (or the end of the segment if *exited*).
    pub p: Point3f,
    /// Ray parameter of *p*.
    pub t: Float,
    /// No scattering event happened before the segment ended.
    pub exited: bool,
    /// Transmittance up to *p* divided by the density of the sample.
    pub tr_pdf: Spectrum,
    pub sigma_s: Spectrum,
}

impl MediumSample {
    /// Throughput factor of the sampled segment.
    pub fn weight(&self) -> Spectrum {
        if self.exited {
            self.tr_pdf
        } else {
            self.tr_pdf * self.sigma_s
        }
    }
}

pub trait Medium: Send + Sync {
    /// Sample a scattering event on `[0, ray.t_max]`.
    fn sample(&self, ray: &Ray, sampler: &mut dyn Sampler) -> MediumSample;
    /// Beam transmittance of `[0, ray.t_max]`.
    fn tr(&self, ray: &Ray) -> Spectrum;
    fn phase(&self) -> &dyn PhaseFunction;
}

#[cfg(test)]
mod test {
    use super::*;

    fn integrate_over_sphere(g: Float) -> Float {
        let hg = HenyeyGreenstein::new(g);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let n: usize = 4000;
        let mut sum: Float = 0.0;
        for i in 0..n {
            // midpoint rule over cos(theta)
            let cos_theta: Float = -1.0 + (i as Float + 0.5) * 2.0 / n as Float;
            let sin_theta: Float = (1.0 - cos_theta * cos_theta).sqrt();
            let wi = Vector3f::new(sin_theta, 0.0, cos_theta);
            sum += hg.p(&wo, &wi) * 2.0 * PI * (2.0 / n as Float);
        }
        sum
    }

    #[test]
    fn henyey_greenstein_is_normalized() {
        for g in [-0.7 as Float, 0.0, 0.3, 0.8].iter() {
            assert!((integrate_over_sphere(*g) - 1.0).abs() < 1e-2, "g = {}", g);
        }
        assert!((phase_hg(0.3, 0.0) - INV_4_PI).abs() < 1e-7);
    }

    #[test]
    fn sampled_value_matches_evaluation() {
        let hg = HenyeyGreenstein::new(0.6);
        let wo = Vector3f::new(0.0, 0.6, 0.8);
        for i in 0..16 {
            let u = Point2f {
                x: (i as Float + 0.5) / 16.0,
                y: 0.37,
            };
            let (pdf, wi) = hg.sample_p(&wo, &u);
            assert!((wi.length() - 1.0).abs() < 1e-4);
            assert!((pdf - hg.p(&wo, &wi)).abs() < 1e-3 * pdf.max(1.0));
        }
    }

    #[test]
    fn exited_sample_ignores_scattering_coefficient() {
        let ms = MediumSample {
            exited: true,
            tr_pdf: Spectrum::new(0.5),
            sigma_s: Spectrum::new(0.2),
            ..Default::default()
        };
        assert_eq!(ms.weight(), Spectrum::new(0.5));
        let scattered = MediumSample { exited: false, ..ms };
        assert!((scattered.weight()[1] - 0.1).abs() < 1e-6);
    }
}
