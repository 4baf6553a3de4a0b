// std
use std::f32::consts::PI;
use std::sync::Arc;
// pbrt
use crate::core::geometry::{
    bnd3_union_pnt3f, pnt3_distance_squaredf, vec3_coordinate_system, vec3_cross_vec3,
    vec3_dot_nrmf, vec3_dot_vec3f, Bounds3f, Normal3f, Point3f, Ray, Vector3f,
};
use crate::core::interaction::SurfaceInteraction;
use crate::core::pbrt::{Float, Spectrum};
use crate::core::primitive::{LightSample, Primitive};
use crate::core::reflection::Bsdf;
use crate::core::sampler::Sampler;
use crate::core::sampling::cosine_sample_hemisphere;

/// Parallelogram spanned by two edges from a base corner. The front
/// side (the one an emissive quad lights) faces `edge0 x edge1`.
pub struct Quad {
    pub base: Point3f,
    pub edge0: Vector3f,
    pub edge1: Vector3f,
    pub n: Normal3f,
    pub area: Float,
    pub bsdf: Option<Arc<dyn Bsdf>>,
    pub emission: Option<Spectrum>,
}

impl Quad {
    pub fn new(
        base: Point3f,
        edge0: Vector3f,
        edge1: Vector3f,
        bsdf: Option<Arc<dyn Bsdf>>,
        emission: Option<Spectrum>,
    ) -> Self {
        let cross: Vector3f = vec3_cross_vec3(&edge0, &edge1);
        let area: Float = cross.length();
        Quad {
            base,
            edge0,
            edge1,
            n: Normal3f::from(cross / area),
            area,
            bsdf,
            emission: emission.filter(|l| !l.is_black()),
        }
    }
    /// Ray parameter of the hit, if any, on `(0, ray.t_max)`.
    fn hit(&self, ray: &Ray) -> Option<Float> {
        let denom: Float = vec3_dot_nrmf(&ray.d, &self.n);
        if denom == 0.0 as Float {
            return None;
        }
        let t: Float = vec3_dot_nrmf(&(self.base - ray.o), &self.n) / denom;
        if !(t > 0.0 as Float) || t >= ray.t_max.get() {
            return None;
        }
        let v: Vector3f = ray.position(t) - self.base;
        // barycentric coordinates within the parallelogram
        let u0: Float = vec3_dot_nrmf(&vec3_cross_vec3(&v, &self.edge1), &self.n) / self.area;
        let u1: Float = vec3_dot_nrmf(&vec3_cross_vec3(&self.edge0, &v), &self.n) / self.area;
        if !(0.0..=1.0).contains(&u0) || !(0.0..=1.0).contains(&u1) {
            return None;
        }
        Some(t)
    }
    fn sample_position(&self, sampler: &mut dyn Sampler) -> Point3f {
        let u = sampler.get_2d();
        self.base + self.edge0 * u.x + self.edge1 * u.y
    }
    fn radiance(&self) -> Spectrum {
        self.emission.unwrap_or_default()
    }
}

impl Primitive for Quad {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction> {
        let t: Float = self.hit(ray)?;
        ray.t_max.set(t);
        let mut si: SurfaceInteraction =
            SurfaceInteraction::new(ray.position(t), self.n, -ray.d.normalize(), t);
        si.bsdf = self.bsdf.clone();
        Some(si)
    }
    fn occluded(&self, ray: &Ray) -> bool {
        self.hit(ray).is_some()
    }
    fn is_emissive(&self) -> bool {
        self.emission.is_some()
    }
    fn sample_outbound_direction(&self, sampler: &mut dyn Sampler) -> Option<LightSample> {
        if !self.is_emissive() || self.area <= 0.0 as Float {
            return None;
        }
        let p: Point3f = self.sample_position(sampler);
        let local: Vector3f = cosine_sample_hemisphere(&sampler.get_2d());
        if local.z <= 0.0 as Float {
            return None;
        }
        let nv: Vector3f = Vector3f::from(self.n);
        let (s, t) = vec3_coordinate_system(&nv);
        let d: Vector3f = s * local.x + t * local.y + nv * local.z;
        // L cos / (1/A * cos/pi)
        Some(LightSample {
            p,
            n: self.n,
            d,
            dist: 0.0 as Float,
            weight: self.radiance() * (PI * self.area),
            pdf: local.z / (PI * self.area),
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
        let q: Point3f = self.sample_position(sampler);
        let dist_sq: Float = pnt3_distance_squaredf(&q, p);
        if dist_sq == 0.0 as Float {
            return None;
        }
        let dist: Float = dist_sq.sqrt();
        let d: Vector3f = (q - *p) / dist;
        let cos_light: Float = -vec3_dot_nrmf(&d, &self.n);
        if cos_light <= 0.0 as Float {
            return None;
        }
        let pdf: Float = dist_sq / (cos_light * self.area);
        Some(LightSample {
            p: q,
            n: self.n,
            d,
            dist,
            weight: self.radiance() / pdf,
            pdf,
        })
    }
    fn inbound_pdf(&self, p: &Point3f, si: &SurfaceInteraction) -> Float {
        let cos_light: Float = vec3_dot_nrmf(&si.wo.normalize(), &self.n);
        if cos_light <= 0.0 as Float {
            return 0.0 as Float;
        }
        pnt3_distance_squaredf(p, &si.p) / (cos_light * self.area)
    }
    fn emission(&self, _si: &SurfaceInteraction, w: &Vector3f) -> Spectrum {
        if vec3_dot_nrmf(w, &self.n) > 0.0 as Float {
            self.radiance()
        } else {
            Spectrum::default()
        }
    }
    fn approximate_radiance(&self, p: Option<&Point3f>) -> Float {
        let power: Float = self.radiance().y() * PI * self.area;
        match p {
            None => power,
            Some(p) => {
                let center: Point3f = self.base + (self.edge0 + self.edge1) * 0.5 as Float;
                let to_p: Vector3f = *p - center;
                let dist_sq: Float = to_p.length_squared();
                if dist_sq == 0.0 as Float {
                    return power;
                }
                let cos: Float = vec3_dot_vec3f(&to_p, &Vector3f::from(self.n)) / dist_sq.sqrt();
                (power * cos.max(0.0 as Float) / dist_sq).max(0.0 as Float)
            }
        }
    }
    fn bsdf(&self, index: usize) -> Option<Arc<dyn Bsdf>> {
        if index == 0 {
            self.bsdf.clone()
        } else {
            None
        }
    }
    fn world_bound(&self) -> Bounds3f {
        let mut b: Bounds3f = Bounds3f::new(self.base, self.base + self.edge0);
        b = bnd3_union_pnt3f(&b, &(self.base + self.edge1));
        bnd3_union_pnt3f(&b, &(self.base + self.edge0 + self.edge1))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::samplers::random::RandomSampler;

    fn unit_light() -> Quad {
        // facing down (-y) at height 1
        Quad::new(
            Point3f::new(-0.5, 1.0, -0.5),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
            None,
            Some(Spectrum::new(2.0)),
        )
    }

    #[test]
    fn hit_inside_and_miss_outside() {
        let quad = unit_light();
        assert_eq!(quad.n, Normal3f::new(0.0, -1.0, 0.0));
        let ray = Ray::new(Point3f::new(0.2, 0.0, 0.1), Vector3f::new(0.0, 1.0, 0.0));
        let si = quad.intersect(&ray).unwrap();
        assert!((si.t - 1.0).abs() < 1e-6);
        assert_eq!(ray.t_max.get(), si.t);
        let miss = Ray::new(Point3f::new(0.7, 0.0, 0.1), Vector3f::new(0.0, 1.0, 0.0));
        assert!(quad.intersect(&miss).is_none());
        assert!(!quad.occluded(&Ray::with_t_max(ray.o, ray.d, 0.5)));
    }

    #[test]
    fn one_sided_emission() {
        let quad = unit_light();
        let si = SurfaceInteraction::default();
        assert_eq!(quad.emission(&si, &Vector3f::new(0.0, -1.0, 0.0)), Spectrum::new(2.0));
        assert!(quad.emission(&si, &Vector3f::new(0.0, 1.0, 0.0)).is_black());
    }

    #[test]
    fn inbound_pdf_matches_sampled_pdf() {
        let quad = unit_light();
        let mut sampler = RandomSampler::new(1, 1);
        let p = Point3f::new(0.1, 0.0, 0.3);
        for _ in 0..32 {
            let ls = quad.sample_inbound_direction(&p, &mut sampler).unwrap();
            let ray = Ray::new(p, ls.d);
            let si = quad.intersect(&ray).unwrap();
            let pdf = quad.inbound_pdf(&p, &si);
            assert!((pdf - ls.pdf).abs() < 1e-3 * ls.pdf);
        }
    }

    #[test]
    fn outbound_weight_is_total_power() {
        let quad = unit_light();
        let mut sampler = RandomSampler::new(1, 2);
        let ls = quad.sample_outbound_direction(&mut sampler).unwrap();
        assert!((ls.weight[0] - 2.0 * PI).abs() < 1e-4);
        assert!(vec3_dot_nrmf(&ls.d, &quad.n) > 0.0);
    }
}
