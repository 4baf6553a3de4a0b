// std
use std::fmt;
use std::sync::Arc;
// pbrt
use crate::core::geometry::{Point3f, Vector3f};
use crate::core::medium::Medium;
use crate::core::pbrt::Spectrum;

/// Properties of the light path a photon travelled on, stored as bits
/// of the photon's `flags`.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PathFlags {
    /// Every scattering event before the deposit was specular.
    Specular = 1,
    /// The path scattered in a participating medium at least once.
    Medium = 2,
    /// The path was reflected or transmitted by a non-specular surface.
    Diffuse = 4,
}

pub fn path_has(flags: u8, flag: PathFlags) -> bool {
    flags & flag as u8 != 0
}

/// Anything the **KdTree** can index.
pub trait PhotonPoint {
    fn position(&self) -> Point3f;
}

/// A photon stored on a surface.
#[derive(Debug, Default, Copy, Clone)]
pub struct Photon {
    pub p: Point3f,
    /// Direction of travel when the photon arrived.
    pub d: Vector3f,
    pub power: Spectrum,
    /// Scattering events before the deposit.
    pub bounce: u32,
    pub flags: u8,
}

impl Photon {
    /// Light that reached a diffuse receiver over specular bounces only.
    pub fn is_caustic(&self) -> bool {
        self.bounce > 0 && path_has(self.flags, PathFlags::Specular)
    }
    pub fn scattered_in_medium(&self) -> bool {
        path_has(self.flags, PathFlags::Medium)
    }
}

impl PhotonPoint for Photon {
    fn position(&self) -> Point3f {
        self.p
    }
}

/// A photon stored at a scattering event inside a medium.
#[derive(Clone)]
pub struct VolumePhoton {
    pub p: Point3f,
    pub d: Vector3f,
    pub power: Spectrum,
    pub bounce: u32,
    pub flags: u8,
    /// Medium the photon scattered in; its phase function weights the
    /// photon during the gather.
    pub medium: Arc<dyn Medium>,
}

impl VolumePhoton {
    pub fn scattered_in_medium(&self) -> bool {
        path_has(self.flags, PathFlags::Medium)
    }
}

impl PhotonPoint for VolumePhoton {
    fn position(&self) -> Point3f {
        self.p
    }
}

impl fmt::Debug for VolumePhoton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VolumePhoton")
            .field("p", &self.p)
            .field("d", &self.d)
            .field("power", &self.power)
            .field("bounce", &self.bounce)
            .field("flags", &self.flags)
            .finish()
    }
}
