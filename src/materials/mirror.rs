// pbrt
use crate::core::geometry::{vec3_abs_dot_nrmf, vec3_reflect, Normal3f, Point2f, Vector3f};
use crate::core::pbrt::{Float, Spectrum};
use crate::core::reflection::{Bsdf, BsdfSample, BxdfType, TransportMode};

/// Perfect specular reflection.
#[derive(Debug, Copy, Clone)]
pub struct MirrorBsdf {
    pub r: Spectrum,
}

impl MirrorBsdf {
    pub fn new(r: Spectrum) -> Self {
        MirrorBsdf { r }
    }
}

impl Bsdf for MirrorBsdf {
    fn f(&self, _wo: &Vector3f, _wi: &Vector3f, _n: &Normal3f, _mode: TransportMode) -> Spectrum {
        Spectrum::default()
    }
    fn sample_f(
        &self,
        wo: &Vector3f,
        n: &Normal3f,
        _u: &Point2f,
        _mode: TransportMode,
    ) -> Option<BsdfSample> {
        let wi: Vector3f = vec3_reflect(wo, n);
        let cos: Float = vec3_abs_dot_nrmf(&wi, n);
        if cos == 0.0 as Float {
            return None;
        }
        Some(BsdfSample {
            wi,
            f: self.r / cos,
            pdf: 1.0 as Float,
            sampled_type: self.flags(),
        })
    }
    fn pdf(&self, _wo: &Vector3f, _wi: &Vector3f, _n: &Normal3f) -> Float {
        0.0 as Float
    }
    fn flags(&self) -> u8 {
        BxdfType::BsdfReflection as u8 | BxdfType::BsdfSpecular as u8
    }
}
