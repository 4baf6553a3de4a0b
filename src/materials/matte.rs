// pbrt
use crate::core::geometry::{
    nrm_faceforward_vec3, vec3_abs_dot_nrmf, vec3_coordinate_system, Normal3f, Point2f, Vector3f,
};
use crate::core::pbrt::{Float, Spectrum, INV_PI};
use crate::core::reflection::{same_hemisphere, Bsdf, BsdfSample, BxdfType, TransportMode};
use crate::core::sampling::{cosine_hemisphere_pdf, cosine_sample_hemisphere};

/// Lambertian reflection.
#[derive(Debug, Copy, Clone)]
pub struct MatteBsdf {
    pub r: Spectrum,
}

impl MatteBsdf {
    pub fn new(r: Spectrum) -> Self {
        MatteBsdf { r }
    }
}

impl Bsdf for MatteBsdf {
    fn f(&self, wo: &Vector3f, wi: &Vector3f, n: &Normal3f, _mode: TransportMode) -> Spectrum {
        if same_hemisphere(wo, wi, n) {
            self.r * INV_PI
        } else {
            Spectrum::default()
        }
    }
    fn sample_f(
        &self,
        wo: &Vector3f,
        n: &Normal3f,
        u: &Point2f,
        _mode: TransportMode,
    ) -> Option<BsdfSample> {
        let nf: Vector3f = Vector3f::from(nrm_faceforward_vec3(n, wo));
        let local: Vector3f = cosine_sample_hemisphere(u);
        let (s, t) = vec3_coordinate_system(&nf);
        let wi: Vector3f = s * local.x + t * local.y + nf * local.z;
        let pdf: Float = cosine_hemisphere_pdf(local.z);
        if pdf <= 0.0 as Float {
            return None;
        }
        Some(BsdfSample {
            wi,
            f: self.r * INV_PI,
            pdf,
            sampled_type: self.flags(),
        })
    }
    fn pdf(&self, wo: &Vector3f, wi: &Vector3f, n: &Normal3f) -> Float {
        if same_hemisphere(wo, wi, n) {
            cosine_hemisphere_pdf(vec3_abs_dot_nrmf(wi, n))
        } else {
            0.0 as Float
        }
    }
    fn flags(&self) -> u8 {
        BxdfType::BsdfReflection as u8 | BxdfType::BsdfDiffuse as u8
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::vec3_dot_nrmf;

    #[test]
    fn samples_stay_on_the_side_of_wo() {
        let bsdf = MatteBsdf::new(Spectrum::new(0.5));
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let wo = Vector3f::new(0.0, 0.6, -0.8);
        for i in 0..8 {
            let u = Point2f {
                x: (i as Float + 0.5) / 8.0,
                y: 0.3,
            };
            let bs = bsdf.sample_f(&wo, &n, &u, TransportMode::Radiance).unwrap();
            assert!(vec3_dot_nrmf(&bs.wi, &n) < 0.0);
            assert!((bs.pdf - bsdf.pdf(&wo, &bs.wi, &n)).abs() < 1e-4);
        }
        assert!(!bsdf.is_specular());
    }
}
