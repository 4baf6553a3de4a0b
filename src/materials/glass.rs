// pbrt
use crate::core::geometry::{
    nrm_faceforward_vec3, vec3_abs_dot_nrmf, vec3_dot_nrmf, vec3_reflect, Normal3f, Point2f,
    Vector3f,
};
use crate::core::pbrt::{Float, Spectrum};
use crate::core::reflection::{fr_dielectric, refract, Bsdf, BsdfSample, BxdfType, TransportMode};

/// Smooth dielectric interface; chooses between specular reflection
/// and transmission with the Fresnel reflectance.
#[derive(Debug, Copy, Clone)]
pub struct GlassBsdf {
    pub r: Spectrum,
    pub t: Spectrum,
    /// Index of refraction inside, relative to the outside.
    pub eta: Float,
}

impl GlassBsdf {
    pub fn new(r: Spectrum, t: Spectrum, eta: Float) -> Self {
        GlassBsdf { r, t, eta }
    }
}

impl Bsdf for GlassBsdf {
    fn f(&self, _wo: &Vector3f, _wi: &Vector3f, _n: &Normal3f, _mode: TransportMode) -> Spectrum {
        Spectrum::default()
    }
    fn sample_f(
        &self,
        wo: &Vector3f,
        n: &Normal3f,
        u: &Point2f,
        mode: TransportMode,
    ) -> Option<BsdfSample> {
        let cos_o: Float = vec3_dot_nrmf(wo, n);
        let f: Float = fr_dielectric(cos_o, 1.0 as Float, self.eta);
        if u.x < f {
            // compute specular reflection for _FresnelSpecular_
            let wi: Vector3f = vec3_reflect(wo, n);
            let cos: Float = vec3_abs_dot_nrmf(&wi, n);
            if cos == 0.0 as Float {
                return None;
            }
            Some(BsdfSample {
                wi,
                f: self.r * f / cos,
                pdf: f,
                sampled_type: BxdfType::BsdfSpecular as u8 | BxdfType::BsdfReflection as u8,
            })
        } else {
            // compute specular transmission for _FresnelSpecular_
            let entering: bool = cos_o > 0.0 as Float;
            let (eta_i, eta_t) = if entering {
                (1.0 as Float, self.eta)
            } else {
                (self.eta, 1.0 as Float)
            };
            let nf: Normal3f = nrm_faceforward_vec3(n, wo);
            let wi: Vector3f = refract(wo, &nf, eta_i / eta_t)?;
            let cos: Float = vec3_abs_dot_nrmf(&wi, n);
            if cos == 0.0 as Float {
                return None;
            }
            let mut ft: Spectrum = self.t * (1.0 as Float - f);
            // account for non-symmetry with transmission to different medium
            if mode == TransportMode::Radiance {
                ft *= (eta_i * eta_i) / (eta_t * eta_t);
            }
            Some(BsdfSample {
                wi,
                f: ft / cos,
                pdf: 1.0 as Float - f,
                sampled_type: BxdfType::BsdfSpecular as u8 | BxdfType::BsdfTransmission as u8,
            })
        }
    }
    fn pdf(&self, _wo: &Vector3f, _wi: &Vector3f, _n: &Normal3f) -> Float {
        0.0 as Float
    }
    fn flags(&self) -> u8 {
        BxdfType::BsdfReflection as u8
            | BxdfType::BsdfTransmission as u8
            | BxdfType::BsdfSpecular as u8
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reflection_and_transmission_weights() {
        let glass = GlassBsdf::new(Spectrum::new(1.0), Spectrum::new(1.0), 1.5);
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let reflected = glass
            .sample_f(&wo, &n, &Point2f { x: 0.01, y: 0.5 }, TransportMode::Importance)
            .unwrap();
        assert!(reflected.is_specular());
        assert!((reflected.pdf - 0.04).abs() < 1e-4);
        // f * cos / pdf is one for a lossless interface
        assert!((reflected.f[0] * 1.0 / reflected.pdf - 1.0).abs() < 1e-4);
        let transmitted = glass
            .sample_f(&wo, &n, &Point2f { x: 0.5, y: 0.5 }, TransportMode::Importance)
            .unwrap();
        assert!(transmitted.wi.z < 0.0);
        assert!((transmitted.f[0] / transmitted.pdf - 1.0).abs() < 1e-4);
        let radiance = glass
            .sample_f(&wo, &n, &Point2f { x: 0.5, y: 0.5 }, TransportMode::Radiance)
            .unwrap();
        assert!((radiance.f[0] / radiance.pdf - 1.0 / 2.25).abs() < 1e-4);
    }
}
