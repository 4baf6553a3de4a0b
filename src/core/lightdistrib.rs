//! Importance-weighted selection of the emitter a photon (or a
//! next-event estimate) starts from.

// pbrt
use crate::core::pbrt::Float;
use crate::core::sampling::Distribution1D;
use crate::core::scene::Scene;

/// Discrete distribution over the scene's lights. Entry *i* refers to
/// `scene.lights[i]`.
#[derive(Debug, Clone)]
pub struct LightDistribution {
    distrib: Distribution1D,
}

impl LightDistribution {
    /// Returns `None` if no weight is positive.
    pub fn new(weights: Vec<Float>) -> Option<Self> {
        let distrib: Distribution1D = Distribution1D::new(weights);
        if distrib.func_int > 0.0 as Float {
            Some(LightDistribution { distrib })
        } else {
            None
        }
    }
    /// Consumes one uniform value; returns the chosen entry and its
    /// probability mass.
    pub fn sample(&self, u: Float) -> Option<(usize, Float)> {
        self.distrib.sample_discrete(u)
    }
    pub fn pdf(&self, index: usize) -> Float {
        self.distrib.discrete_pdf(index)
    }
    pub fn count(&self) -> usize {
        self.distrib.count()
    }
}

/// Weights each light by its approximate emitted power.
pub fn compute_light_power_distribution(scene: &Scene) -> Option<LightDistribution> {
    if scene.lights.is_empty() {
        return None;
    }
    let light_power: Vec<Float> = scene
        .lights
        .iter()
        .map(|index| scene.primitives[*index].approximate_radiance(None))
        .collect();
    LightDistribution::new(light_power)
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn masses_sum_to_one(weights in prop::collection::vec(0.0f32..100.0f32, 1..32)) {
            if let Some(d) = LightDistribution::new(weights.clone()) {
                let sum: Float = (0..d.count()).map(|i| d.pdf(i)).sum();
                prop_assert!((sum - 1.0).abs() < 1e-4);
                for (i, w) in weights.iter().enumerate() {
                    prop_assert_eq!(d.pdf(i) == 0.0, *w == 0.0);
                }
            } else {
                prop_assert!(weights.iter().all(|w| *w == 0.0));
            }
        }

        #[test]
        fn sampled_entry_has_positive_weight(
            weights in prop::collection::vec(0.0f32..10.0f32, 1..16),
            u in 0.0f32..1.0f32,
        ) {
            if let Some(d) = LightDistribution::new(weights.clone()) {
                let (i, pdf) = d.sample(u).unwrap();
                prop_assert!(weights[i] > 0.0);
                prop_assert_eq!(pdf, d.pdf(i));
            }
        }
    }

    #[test]
    fn selection_is_deterministic() {
        let a = LightDistribution::new(vec![0.2, 0.0, 5.0, 1.0]).unwrap();
        let b = LightDistribution::new(vec![0.2, 0.0, 5.0, 1.0]).unwrap();
        for i in 0..50 {
            let u = i as Float / 50.0;
            assert_eq!(a.sample(u), b.sample(u));
        }
        assert!(LightDistribution::new(vec![0.0, 0.0]).is_none());
    }
}
