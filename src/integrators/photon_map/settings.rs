//! Configuration of a photon mapping pass.

// others
use thiserror::Error;
// pbrt
use crate::core::pbrt::Float;

/// Weighting of the photons found within the gather radius.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GatherKernel {
    /// Constant weight `1 / (pi r^2)`.
    Uniform,
    /// `2 / (pi r^2) * (1 - d^2 / r^2)`, smoother at the cost of a
    /// little more bias.
    Epanechnikov,
}

/// Which estimator accounts for light arriving directly from the
/// emitters at the gather vertex.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DirectLighting {
    /// Photons are stored from their first hit on; the photon map
    /// covers direct and indirect light.
    Photons,
    /// First hits are not stored; direct light is sampled explicitly
    /// at the gather vertex.
    NextEvent,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SettingsError {
    #[error("photon count must be positive")]
    ZeroPhotonCount,
    #[error("gather radius must be positive and finite, got {0}")]
    InvalidGatherRadius(Float),
    #[error("volume gather radius must be positive and finite, got {0}")]
    InvalidVolumeGatherRadius(Float),
    #[error("gather count must be positive")]
    ZeroGatherCount,
    #[error("at least one sample per pixel is required")]
    ZeroSamplesPerPixel,
    #[error("a caustics-only photon map needs next event estimation for direct light")]
    CausticsWithoutNextEvent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotonMapSettings {
    /// Surface photons to store.
    pub photon_count: usize,
    /// Volume photons to store; 0 disables the volume photon map.
    pub volume_photon_count: usize,
    pub gather_radius: Float,
    pub volume_gather_radius: Float,
    /// Upper limit of photons used per density estimate.
    pub gather_count: usize,
    /// Longest path, counted in scattering events.
    pub max_bounces: u32,
    /// Eye path depth from which on Russian roulette is played.
    pub rr_depth: u32,
    /// Store surface photons only if they arrived over purely
    /// specular paths.
    pub caustics_only: bool,
    pub gather_kernel: GatherKernel,
    pub direct_lighting: DirectLighting,
    /// Samples per pixel.
    pub spp: u32,
    pub seed: u64,
    /// Photon paths traced before giving up on filling the stores;
    /// 0 picks 32 times the larger store size.
    pub max_photon_paths: usize,
    /// 0 uses all cores.
    pub num_threads: usize,
}

impl Default for PhotonMapSettings {
    fn default() -> Self {
        PhotonMapSettings {
            photon_count: 1_000_000,
            volume_photon_count: 1_000_000,
            gather_radius: 0.05,
            volume_gather_radius: 0.1,
            gather_count: 20,
            max_bounces: 64,
            rr_depth: 3,
            caustics_only: false,
            gather_kernel: GatherKernel::Uniform,
            direct_lighting: DirectLighting::Photons,
            spp: 4,
            seed: 0,
            max_photon_paths: 0,
            num_threads: 0,
        }
    }
}

impl PhotonMapSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.photon_count == 0 {
            return Err(SettingsError::ZeroPhotonCount);
        }
        if !(self.gather_radius > 0.0 as Float) || !self.gather_radius.is_finite() {
            return Err(SettingsError::InvalidGatherRadius(self.gather_radius));
        }
        if self.volume_photon_count > 0
            && (!(self.volume_gather_radius > 0.0 as Float)
                || !self.volume_gather_radius.is_finite())
        {
            return Err(SettingsError::InvalidVolumeGatherRadius(
                self.volume_gather_radius,
            ));
        }
        if self.gather_count == 0 {
            return Err(SettingsError::ZeroGatherCount);
        }
        if self.spp == 0 {
            return Err(SettingsError::ZeroSamplesPerPixel);
        }
        if self.caustics_only && self.direct_lighting != DirectLighting::NextEvent {
            return Err(SettingsError::CausticsWithoutNextEvent);
        }
        Ok(())
    }
    /// Photon paths after which emission stops even if a store is not
    /// full yet.
    pub fn path_budget(&self) -> usize {
        if self.max_photon_paths > 0 {
            self.max_photon_paths
        } else {
            32 * self.photon_count.max(self.volume_photon_count)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(PhotonMapSettings::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_broken_configurations() {
        let base = PhotonMapSettings::default();
        let s = PhotonMapSettings {
            gather_radius: 0.0,
            ..base.clone()
        };
        assert_eq!(s.validate(), Err(SettingsError::InvalidGatherRadius(0.0)));
        let s = PhotonMapSettings {
            gather_radius: Float::NAN,
            ..base.clone()
        };
        assert!(matches!(
            s.validate(),
            Err(SettingsError::InvalidGatherRadius(_))
        ));
        let s = PhotonMapSettings {
            photon_count: 0,
            ..base.clone()
        };
        assert_eq!(s.validate(), Err(SettingsError::ZeroPhotonCount));
        let s = PhotonMapSettings {
            gather_count: 0,
            ..base.clone()
        };
        assert_eq!(s.validate(), Err(SettingsError::ZeroGatherCount));
        let s = PhotonMapSettings {
            caustics_only: true,
            ..base.clone()
        };
        assert_eq!(s.validate(), Err(SettingsError::CausticsWithoutNextEvent));
        let s = PhotonMapSettings {
            caustics_only: true,
            direct_lighting: DirectLighting::NextEvent,
            ..base
        };
        assert_eq!(s.validate(), Ok(()));
    }

    #[test]
    fn volume_radius_only_matters_with_volume_photons() {
        let s = PhotonMapSettings {
            volume_photon_count: 0,
            volume_gather_radius: -1.0,
            ..Default::default()
        };
        assert_eq!(s.validate(), Ok(()));
        assert_eq!(s.path_budget(), 32 * s.photon_count);
    }
}
