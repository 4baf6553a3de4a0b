// std
use std::f32::consts::PI;
use std::sync::Arc;
// pbrt
use crate::core::geometry::{vec3_coordinate_system, Bounds3f, Point3f, Ray, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::pbrt::{Float, Spectrum};
use crate::core::primitive::{LightSample, Primitive};
use crate::core::reflection::Bsdf;
use crate::core::sampler::Sampler;
use crate::core::sampling::{concentric_sample_disk, uniform_sample_sphere, uniform_sphere_pdf};

/// Constant radiance arriving from every direction. Photons are
/// emitted from a disk tangent to the scene's bounding sphere.
#[derive(Debug, Copy, Clone)]
pub struct UniformInfiniteLight {
    pub l: Spectrum,
    pub world_center: Point3f,
    pub world_radius: Float,
}

impl UniformInfiniteLight {
    pub fn new(l: Spectrum, world_bound: &Bounds3f) -> Self {
        let (world_center, world_radius) = world_bound.bounding_sphere();
        UniformInfiniteLight {
            l,
            world_center,
            world_radius,
        }
    }
}

impl Primitive for UniformInfiniteLight {
    fn intersect(&self, _ray: &Ray) -> Option<SurfaceInteraction> {
        None
    }
    fn occluded(&self, _ray: &Ray) -> bool {
        false
    }
    fn is_infinite(&self) -> bool {
        true
    }
    fn is_emissive(&self) -> bool {
        !self.l.is_black() && self.world_radius > 0.0 as Float
    }
    fn sample_outbound_direction(&self, sampler: &mut dyn Sampler) -> Option<LightSample> {
        if !self.is_emissive() {
            return None;
        }
        // compute direction for infinite light sample ray
        let d: Vector3f = -uniform_sample_sphere(&sampler.get_2d());
        // compute origin for infinite light sample ray
        let (v1, v2) = vec3_coordinate_system(&(-d));
        let cd = concentric_sample_disk(&sampler.get_2d());
        let p_disk: Point3f = self.world_center + (v1 * cd.x + v2 * cd.y) * self.world_radius;
        let p: Point3f = p_disk + -d * self.world_radius;
        // compute _InfiniteAreaLight_ ray PDFs
        let pdf_dir: Float = uniform_sphere_pdf();
        let pdf_pos: Float = 1.0 as Float / (PI * self.world_radius * self.world_radius);
        let pdf: Float = pdf_dir * pdf_pos;
        Some(LightSample {
            p,
            n: d.into(),
            d,
            dist: 0.0 as Float,
            weight: self.l / pdf,
            pdf,
        })
    }
    fn sample_inbound_direction(
        &self,
        p: &Point3f,
        sampler: &mut dyn Sampler,
    ) -> Option<LightSample> {
        if !self.is_emissive() {
            return None;
        }
        let d: Vector3f = uniform_sample_sphere(&sampler.get_2d());
        let pdf: Float = uniform_sphere_pdf();
        Some(LightSample {
            p: *p + d * (2.0 as Float * self.world_radius),
            n: (-d).into(),
            d,
            dist: Float::INFINITY,
            weight: self.l / pdf,
            pdf,
        })
    }
    fn inbound_pdf(&self, _p: &Point3f, _si: &SurfaceInteraction) -> Float {
        uniform_sphere_pdf()
    }
    fn emission(&self, _si: &SurfaceInteraction, _w: &Vector3f) -> Spectrum {
        self.l
    }
    fn approximate_radiance(&self, p: Option<&Point3f>) -> Float {
        match p {
            None => PI * self.world_radius * self.world_radius * self.l.y() / uniform_sphere_pdf(),
            Some(_) => self.l.y() / uniform_sphere_pdf(),
        }
    }
    fn bsdf(&self, _index: usize) -> Option<Arc<dyn Bsdf>> {
        None
    }
    fn world_bound(&self) -> Bounds3f {
        Bounds3f::default()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::pnt3_distancef;
    use crate::samplers::random::RandomSampler;

    #[test]
    fn photons_start_outside_and_head_inwards() {
        let bound = Bounds3f::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));
        let light = UniformInfiniteLight::new(Spectrum::new(1.0), &bound);
        let mut sampler = RandomSampler::new(1, 4);
        for _ in 0..16 {
            let ls = light.sample_outbound_direction(&mut sampler).unwrap();
            assert!(pnt3_distancef(&ls.p, &light.world_center) >= light.world_radius - 1e-4);
            let to_center: Vector3f = light.world_center - ls.p;
            assert!(crate::core::geometry::vec3_dot_vec3f(&to_center, &ls.d) > 0.0);
        }
    }
}
