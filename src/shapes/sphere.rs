// std
use std::f32::consts::PI;
use std::sync::Arc;
// pbrt
use crate::core::geometry::{
    pnt3_distance_squaredf, pnt3_distancef, spherical_direction_vec3,
    vec3_coordinate_system, vec3_dot_nrmf, vec3_dot_vec3f, Bounds3f, Normal3f, Point3f, Ray,
    Vector3f,
};
use crate::core::interaction::SurfaceInteraction;
use crate::core::pbrt::{quadratic, Float, Spectrum};
use crate::core::primitive::{LightSample, Primitive};
use crate::core::reflection::Bsdf;
use crate::core::sampler::Sampler;
use crate::core::sampling::{cosine_sample_hemisphere, uniform_cone_pdf, uniform_sample_sphere};

pub struct Sphere {
    pub center: Point3f,
    pub radius: Float,
    pub bsdf: Option<Arc<dyn Bsdf>>,
    pub emission: Option<Spectrum>,
}

impl Sphere {
    pub fn new(
        center: Point3f,
        radius: Float,
        bsdf: Option<Arc<dyn Bsdf>>,
        emission: Option<Spectrum>,
    ) -> Self {
        Sphere {
            center,
            radius,
            bsdf,
            emission: emission.filter(|l| !l.is_black()),
        }
    }
    pub fn area(&self) -> Float {
        4.0 as Float * PI * self.radius * self.radius
    }
    fn hit(&self, ray: &Ray) -> Option<Float> {
        // compute quadratic sphere coefficients
        let oc: Vector3f = ray.o - self.center;
        let a: Float = ray.d.length_squared();
        let b: Float = 2.0 as Float * vec3_dot_vec3f(&ray.d, &oc);
        let c: Float = oc.length_squared() - self.radius * self.radius;
        let (t0, t1) = quadratic(a, b, c)?;
        // check quadric shape _t0_ and _t1_ for nearest intersection
        let t_max: Float = ray.t_max.get();
        if t0 >= t_max || t1 <= 0.0 as Float {
            return None;
        }
        let t_shape_hit: Float = if t0 > 0.0 as Float { t0 } else { t1 };
        if t_shape_hit >= t_max {
            return None;
        }
        Some(t_shape_hit)
    }
    fn normal_at(&self, p: &Point3f) -> Normal3f {
        Normal3f::from((*p - self.center) / self.radius)
    }
    fn radiance(&self) -> Spectrum {
        self.emission.unwrap_or_default()
    }
    /// Cosine of the half angle of the cone the sphere covers as seen
    /// from *p*, or `None` if *p* is inside.
    fn cos_theta_max(&self, p: &Point3f) -> Option<Float> {
        let dc_sq: Float = pnt3_distance_squaredf(p, &self.center);
        let r_sq: Float = self.radius * self.radius;
        if dc_sq <= r_sq {
            return None;
        }
        let sin_theta_max2: Float = r_sq / dc_sq;
        Some((0.0 as Float).max(1.0 as Float - sin_theta_max2).sqrt())
    }
}

impl Primitive for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction> {
        let t: Float = self.hit(ray)?;
        ray.t_max.set(t);
        let mut p_hit: Point3f = ray.position(t);
        // refine sphere intersection point
        let n: Normal3f = self.normal_at(&p_hit);
        p_hit = self.center + Vector3f::from(n) * self.radius;
        let mut si: SurfaceInteraction = SurfaceInteraction::new(p_hit, n, -ray.d.normalize(), t);
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
        if !self.is_emissive() {
            return None;
        }
        let nv: Vector3f = uniform_sample_sphere(&sampler.get_2d());
        let p: Point3f = self.center + nv * self.radius;
        let local: Vector3f = cosine_sample_hemisphere(&sampler.get_2d());
        if local.z <= 0.0 as Float {
            return None;
        }
        let (s, t) = vec3_coordinate_system(&nv);
        let d: Vector3f = s * local.x + t * local.y + nv * local.z;
        Some(LightSample {
            p,
            n: Normal3f::from(nv),
            d,
            dist: 0.0 as Float,
            weight: self.radiance() * (PI * self.area()),
            pdf: local.z / (PI * self.area()),
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
        let u = sampler.get_2d();
        let cos_theta_max: Float = match self.cos_theta_max(p) {
            Some(c) => c,
            None => {
                // inside: the outward facing surface is never visible
                return None;
            }
        };
        // compute coordinate system for sphere sampling
        let dc: Float = pnt3_distancef(p, &self.center);
        let wc: Vector3f = (self.center - *p) / dc;
        let (wc_x, wc_y) = vec3_coordinate_system(&wc);
        // sample sphere uniformly inside subtended cone
        let cos_theta: Float = (1.0 as Float - u.x) + u.x * cos_theta_max;
        let sin_theta: Float = (0.0 as Float)
            .max(1.0 as Float - cos_theta * cos_theta)
            .sqrt();
        let phi: Float = u.y * 2.0 as Float * PI;
        // distance to the sampled point on the near side
        let ds: Float = dc * cos_theta
            - (0.0 as Float)
                .max(self.radius * self.radius - dc * dc * sin_theta * sin_theta)
                .sqrt();
        let d: Vector3f = spherical_direction_vec3(sin_theta, cos_theta, phi, &wc_x, &wc_y, &wc);
        let q: Point3f = *p + d * ds;
        let n: Normal3f = self.normal_at(&q);
        let pdf: Float = uniform_cone_pdf(cos_theta_max);
        Some(LightSample {
            p: q,
            n,
            d,
            dist: ds,
            weight: self.radiance() / pdf,
            pdf,
        })
    }
    fn inbound_pdf(&self, p: &Point3f, si: &SurfaceInteraction) -> Float {
        match self.cos_theta_max(p) {
            Some(cos_theta_max) => {
                if vec3_dot_nrmf(&si.wo, &si.n) <= 0.0 as Float {
                    return 0.0 as Float;
                }
                uniform_cone_pdf(cos_theta_max)
            }
            None => 0.0 as Float,
        }
    }
    fn emission(&self, si: &SurfaceInteraction, w: &Vector3f) -> Spectrum {
        if vec3_dot_nrmf(w, &si.n) > 0.0 as Float {
            self.radiance()
        } else {
            Spectrum::default()
        }
    }
    fn approximate_radiance(&self, p: Option<&Point3f>) -> Float {
        let power: Float = self.radiance().y() * PI * self.area();
        match p {
            None => power,
            Some(p) => match self.cos_theta_max(p) {
                Some(cos_theta_max) => {
                    self.radiance().y() * 2.0 as Float * PI * (1.0 as Float - cos_theta_max)
                }
                None => 0.0 as Float,
            },
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
        let r: Vector3f = Vector3f::new(self.radius, self.radius, self.radius);
        Bounds3f::new(self.center - r, self.center + r)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::samplers::random::RandomSampler;

    #[test]
    fn hits_front_then_back_from_inside() {
        let sphere = Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0, None, None);
        let ray = Ray::new(Point3f::default(), Vector3f::new(0.0, 0.0, 1.0));
        let si = sphere.intersect(&ray).unwrap();
        assert!((si.t - 4.0).abs() < 1e-5);
        assert!((si.n.z + 1.0).abs() < 1e-5);
        let inside = Ray::new(Point3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, 1.0));
        let si = sphere.intersect(&inside).unwrap();
        assert!((si.t - 1.0).abs() < 1e-5);
        assert!(!sphere.is_emissive());
    }

    #[test]
    fn cone_samples_land_on_visible_side() {
        let sphere = Sphere::new(Point3f::new(0.0, 3.0, 0.0), 0.5, None, Some(Spectrum::new(1.0)));
        let mut sampler = RandomSampler::new(1, 9);
        let p = Point3f::default();
        for _ in 0..64 {
            let ls = sphere.sample_inbound_direction(&p, &mut sampler).unwrap();
            assert!((pnt3_distancef(&ls.p, &sphere.center) - 0.5).abs() < 1e-3);
            assert!(vec3_dot_nrmf(&ls.d, &ls.n) <= 1e-4);
            let ray = Ray::new(p, ls.d);
            // grazing samples may miss numerically
            if let Some(si) = sphere.intersect(&ray) {
                assert!((sphere.inbound_pdf(&p, &si) - ls.pdf).abs() < 1e-3 * ls.pdf);
            }
        }
    }
}
