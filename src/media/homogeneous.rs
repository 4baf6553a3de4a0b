// pbrt
use crate::core::geometry::Ray;
use crate::core::medium::{HenyeyGreenstein, Medium, MediumSample, PhaseFunction};
use crate::core::pbrt::{Float, Spectrum};
use crate::core::sampler::Sampler;

/// Constant absorption and scattering coefficients throughout its
/// extent.
pub struct HomogeneousMedium {
    pub sigma_a: Spectrum,
    pub sigma_s: Spectrum,
    pub sigma_t: Spectrum,
    pub phase: HenyeyGreenstein,
}

impl HomogeneousMedium {
    pub fn new(sigma_a: &Spectrum, sigma_s: &Spectrum, g: Float) -> Self {
        HomogeneousMedium {
            sigma_a: *sigma_a,
            sigma_s: *sigma_s,
            sigma_t: *sigma_s + *sigma_a,
            phase: HenyeyGreenstein::new(g),
        }
    }
}

impl Medium for HomogeneousMedium {
    fn sample(&self, ray: &Ray, sampler: &mut dyn Sampler) -> MediumSample {
        // sample a channel and distance along the ray
        let channel: usize = ((sampler.get_1d() * 3.0 as Float) as usize).min(2_usize);
        let u: Float = sampler.get_1d();
        let ray_length: Float = ray.d.length();
        let t_max: Float = ray.t_max.get();
        let t: Float = if self.sigma_t[channel] > 0.0 as Float {
            let dist: Float = -(1.0 as Float - u).ln() / self.sigma_t[channel];
            (dist / ray_length).min(t_max)
        } else {
            t_max
        };
        let sampled_medium: bool = t < t_max;
        // compute the transmittance and sampling density
        let tr: Spectrum = (-self.sigma_t * (t * ray_length).min(Float::MAX)).exp();
        let density: Spectrum = if sampled_medium {
            self.sigma_t * tr
        } else {
            tr
        };
        let mut pdf: Float = density.average();
        if pdf == 0.0 as Float {
            pdf = 1.0;
        }
        MediumSample {
            p: ray.position(t),
            t,
            exited: !sampled_medium,
            tr_pdf: tr / pdf,
            sigma_s: self.sigma_s,
        }
    }
    fn tr(&self, ray: &Ray) -> Spectrum {
        (-self.sigma_t * (ray.t_max.get() * ray.d.length()).min(Float::MAX)).exp()
    }
    fn phase(&self) -> &dyn PhaseFunction {
        &self.phase
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::{Point3f, Vector3f};
    use crate::samplers::random::RandomSampler;

    #[test]
    fn transmittance_follows_beer_lambert() {
        let medium = HomogeneousMedium::new(&Spectrum::new(0.1), &Spectrum::new(0.4), 0.0);
        let ray = Ray::with_t_max(Point3f::default(), Vector3f::new(1.0, 0.0, 0.0), 2.0);
        let tr = medium.tr(&ray);
        assert!((tr[0] - (-1.0 as Float).exp()).abs() < 1e-6);
    }

    #[test]
    fn scattering_probability_matches_transmittance() {
        let medium = HomogeneousMedium::new(&Spectrum::new(0.0), &Spectrum::new(0.5), 0.0);
        let ray = Ray::with_t_max(Point3f::default(), Vector3f::new(0.0, 1.0, 0.0), 2.0);
        let mut sampler = RandomSampler::new(1, 5);
        let n = 20_000;
        let mut escaped = 0;
        let mut mean_weight: Float = 0.0;
        for _ in 0..n {
            let ms = medium.sample(&ray, &mut sampler);
            if ms.exited {
                escaped += 1;
            }
            mean_weight += ms.weight()[0] / n as Float;
        }
        let expected: Float = (-1.0 as Float).exp();
        assert!((escaped as Float / n as Float - expected).abs() < 0.02);
        // without absorption the throughput is preserved on average
        assert!((mean_weight - 1.0).abs() < 0.02);
    }
}
