//! Draw random samples from a chosen probability distribution.

// std
use std::f32::consts::PI;
// pbrt
use crate::core::geometry::{Point2f, Vector3f};
use crate::core::pbrt::find_interval;
use crate::core::pbrt::Float;
use crate::core::pbrt::{INV_4_PI, INV_PI, PI_OVER_2, PI_OVER_4};

/// Piecewise-constant 1D distribution. Weights which are negative or
/// not a number are stored as zero, so they are never selected.
#[derive(Debug, Default, Clone)]
pub struct Distribution1D {
    pub func: Vec<Float>,
    pub cdf: Vec<Float>,
    pub func_int: Float,
}

impl Distribution1D {
    pub fn new(f: Vec<Float>) -> Self {
        let func: Vec<Float> = f
            .into_iter()
            .map(|w| if w.is_nan() || w < 0.0 as Float { 0.0 } else { w })
            .collect();
        let n: usize = func.len();
        // compute integral of step function at $x_i$
        let mut cdf: Vec<Float> = Vec::with_capacity(n + 1);
        cdf.push(0.0 as Float);
        for i in 1..(n + 1) {
            let previous: Float = cdf[i - 1];
            cdf.push(previous + func[i - 1] / n as Float);
        }
        // transform step function integral into CDF
        let func_int: Float = cdf[n];
        if func_int == 0.0 as Float {
            for (i, c) in cdf.iter_mut().enumerate().skip(1) {
                *c = i as Float / n as Float;
            }
        } else {
            for c in cdf.iter_mut().skip(1) {
                *c /= func_int;
            }
        }
        if n > 0 {
            cdf[n] = 1.0 as Float;
        }
        Distribution1D {
            func,
            cdf,
            func_int,
        }
    }
    pub fn count(&self) -> usize {
        self.func.len()
    }
    /// Pick an entry with probability proportional to its weight,
    /// consuming one uniform value *u* in `[0, 1)`. Returns the entry
    /// and its probability mass, or `None` if nothing can be picked.
    pub fn sample_discrete(&self, u: Float) -> Option<(usize, Float)> {
        if self.func.is_empty() || self.func_int <= 0.0 as Float {
            return None;
        }
        let cdf: &[Float] = &self.cdf;
        let offset: usize = find_interval(cdf.len(), |index| cdf[index] <= u);
        let pdf: Float = self.discrete_pdf(offset);
        if pdf > 0.0 as Float {
            Some((offset, pdf))
        } else {
            None
        }
    }
    pub fn discrete_pdf(&self, index: usize) -> Float {
        if index >= self.func.len() || self.func_int <= 0.0 as Float {
            return 0.0 as Float;
        }
        self.func[index] / (self.func_int * self.func.len() as Float)
    }
}

/// Cosine-weighted hemisphere sampling using Malley's method.
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d: Point2f = concentric_sample_disk(u);
    let z: Float = (0.0 as Float)
        .max(1.0 as Float - d.x * d.x - d.y * d.y)
        .sqrt();
    Vector3f { x: d.x, y: d.y, z }
}

/// Returns a weight of cos_theta / PI.
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}

/// Reducing the variance according to Veach's heuristic.
pub fn power_heuristic(nf: u8, f_pdf: Float, ng: u8, g_pdf: Float) -> Float {
    let f: Float = nf as Float * f_pdf;
    let g: Float = ng as Float * g_pdf;
    if f == 0.0 as Float && g == 0.0 as Float {
        return 0.0 as Float;
    }
    (f * f) / (f * f + g * g)
}

/// Uniformly sample rays in a full sphere. Choose a direction.
pub fn uniform_sample_sphere(u: &Point2f) -> Vector3f {
    let z: Float = 1.0 as Float - 2.0 as Float * u.x;
    let r: Float = (0.0 as Float).max(1.0 as Float - z * z).sqrt();
    let phi: Float = 2.0 as Float * PI * u.y;
    Vector3f {
        x: r * phi.cos(),
        y: r * phi.sin(),
        z,
    }
}

/// Probability density function (PDF) of a sphere.
pub fn uniform_sphere_pdf() -> Float {
    INV_4_PI
}

/// Uniformly distribute samples over a unit disk.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // map uniform random numbers to $[-1,1]^2$
    let u_offset: Point2f = Point2f {
        x: u.x * 2.0 as Float - 1.0 as Float,
        y: u.y * 2.0 as Float - 1.0 as Float,
    };
    // handle degeneracy at the origin
    if u_offset.x == 0.0 as Float && u_offset.y == 0.0 as Float {
        return Point2f::default();
    }
    // apply concentric mapping to point
    let theta: Float;
    let r: Float;
    if u_offset.x.abs() > u_offset.y.abs() {
        r = u_offset.x;
        theta = PI_OVER_4 * (u_offset.y / u_offset.x);
    } else {
        r = u_offset.y;
        theta = PI_OVER_2 - PI_OVER_4 * (u_offset.x / u_offset.y);
    }
    Point2f {
        x: theta.cos() * r,
        y: theta.sin() * r,
    }
}

/// Uniformly sample rays in a cone of directions. Probability density
/// function (PDF).
pub fn uniform_cone_pdf(cos_theta_max: Float) -> Float {
    1.0 as Float / (2.0 as Float * PI * (1.0 as Float - cos_theta_max))
}

/// Samples in a cone of directions about the (0, 0, 1) axis.
pub fn uniform_sample_cone(u: &Point2f, cos_theta_max: Float) -> Vector3f {
    let cos_theta: Float = (1.0 as Float - u.x) + u.x * cos_theta_max;
    let sin_theta: Float = (0.0 as Float).max(1.0 as Float - cos_theta * cos_theta).sqrt();
    let phi: Float = u.y * 2.0 as Float * PI;
    Vector3f {
        x: phi.cos() * sin_theta,
        y: phi.sin() * sin_theta,
        z: cos_theta,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn discrete_masses_follow_weights() {
        let d = Distribution1D::new(vec![1.0, 3.0, 0.0, 4.0]);
        assert!(approx_eq!(f32, d.discrete_pdf(0), 0.125, ulps = 4));
        assert!(approx_eq!(f32, d.discrete_pdf(1), 0.375, ulps = 4));
        assert_eq!(d.discrete_pdf(2), 0.0);
        assert!(approx_eq!(f32, d.discrete_pdf(3), 0.5, ulps = 4));
        assert_eq!(d.sample_discrete(0.0), Some((0, d.discrete_pdf(0))));
        assert_eq!(d.sample_discrete(0.2).map(|(i, _)| i), Some(1));
        assert_eq!(d.sample_discrete(0.5).map(|(i, _)| i), Some(3));
    }

    #[test]
    fn zero_and_invalid_weights_are_never_picked() {
        let d = Distribution1D::new(vec![0.0, -2.0, Float::NAN, 1.0]);
        for i in 0..100 {
            let u = i as Float / 100.0;
            assert_eq!(d.sample_discrete(u).map(|(i, _)| i), Some(3));
        }
        let empty = Distribution1D::new(vec![0.0, 0.0]);
        assert!(empty.sample_discrete(0.3).is_none());
        assert!(Distribution1D::new(Vec::new()).sample_discrete(0.3).is_none());
    }

    #[test]
    fn cone_samples_stay_inside_cone() {
        let cos_max: Float = 0.9;
        for i in 0..10 {
            for j in 0..10 {
                let u = Point2f {
                    x: i as Float / 10.0,
                    y: j as Float / 10.0,
                };
                let w = uniform_sample_cone(&u, cos_max);
                assert!(w.z >= cos_max - 1e-5);
                assert!((w.length() - 1.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn power_heuristic_handles_zero_pdfs() {
        assert_eq!(power_heuristic(1, 0.0, 1, 0.0), 0.0);
        assert_eq!(power_heuristic(1, 1.0, 1, 0.0), 1.0);
    }
}
