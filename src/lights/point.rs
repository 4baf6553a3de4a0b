// std
use std::sync::Arc;
// pbrt
use crate::core::geometry::{pnt3_distance_squaredf, Bounds3f, Normal3f, Point3f, Ray, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::pbrt::{Float, Spectrum};
use crate::core::primitive::{LightSample, Primitive};
use crate::core::reflection::Bsdf;
use crate::core::sampler::Sampler;
use crate::core::sampling::{uniform_sample_sphere, uniform_sphere_pdf};

/// Isotropic point light source emitting the same amount of light in
/// all directions. It can not be hit by rays.
#[derive(Debug, Copy, Clone)]
pub struct PointLight {
    pub p_light: Point3f,
    pub i: Spectrum,
}

impl PointLight {
    pub fn new(p_light: Point3f, i: Spectrum) -> Self {
        PointLight { p_light, i }
    }
}

impl Primitive for PointLight {
    fn intersect(&self, _ray: &Ray) -> Option<SurfaceInteraction> {
        None
    }
    fn occluded(&self, _ray: &Ray) -> bool {
        false
    }
    fn is_delta(&self) -> bool {
        true
    }
    fn is_emissive(&self) -> bool {
        !self.i.is_black()
    }
    fn sample_outbound_direction(&self, sampler: &mut dyn Sampler) -> Option<LightSample> {
        let d: Vector3f = uniform_sample_sphere(&sampler.get_2d());
        let pdf: Float = uniform_sphere_pdf();
        Some(LightSample {
            p: self.p_light,
            n: Normal3f::default(),
            d,
            dist: 0.0 as Float,
            weight: self.i / pdf,
            pdf,
        })
    }
    fn sample_inbound_direction(
        &self,
        p: &Point3f,
        _sampler: &mut dyn Sampler,
    ) -> Option<LightSample> {
        let dist_sq: Float = pnt3_distance_squaredf(&self.p_light, p);
        if dist_sq == 0.0 as Float {
            return None;
        }
        let dist: Float = dist_sq.sqrt();
        Some(LightSample {
            p: self.p_light,
            n: Normal3f::default(),
            d: (self.p_light - *p) / dist,
            dist,
            weight: self.i / dist_sq,
            pdf: 1.0 as Float,
        })
    }
    fn inbound_pdf(&self, _p: &Point3f, _si: &SurfaceInteraction) -> Float {
        0.0 as Float
    }
    fn emission(&self, _si: &SurfaceInteraction, _w: &Vector3f) -> Spectrum {
        Spectrum::default()
    }
    fn approximate_radiance(&self, p: Option<&Point3f>) -> Float {
        match p {
            None => self.i.y() / uniform_sphere_pdf(),
            Some(p) => {
                let dist_sq: Float = pnt3_distance_squaredf(&self.p_light, p);
                if dist_sq == 0.0 as Float {
                    self.i.y()
                } else {
                    self.i.y() / dist_sq
                }
            }
        }
    }
    fn bsdf(&self, _index: usize) -> Option<Arc<dyn Bsdf>> {
        None
    }
    fn world_bound(&self) -> Bounds3f {
        Bounds3f::new(self.p_light, self.p_light)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::samplers::random::RandomSampler;

    #[test]
    fn inbound_sample_falls_off_with_distance() {
        let light = PointLight::new(Point3f::new(0.0, 2.0, 0.0), Spectrum::new(8.0));
        let mut sampler = RandomSampler::new(1, 0);
        let ls = light
            .sample_inbound_direction(&Point3f::default(), &mut sampler)
            .unwrap();
        assert_eq!(ls.weight, Spectrum::new(2.0));
        assert_eq!(ls.dist, 2.0);
        assert_eq!(ls.d, Vector3f::new(0.0, 1.0, 0.0));
        assert!(light.is_delta());
        assert!(light.intersect(&Ray::new(Point3f::default(), ls.d)).is_none());
    }
}
