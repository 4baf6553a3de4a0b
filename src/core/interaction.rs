//! The geometry of a particular point on a surface is represented by a
//! **SurfaceInteraction**. Having this abstraction lets the photon
//! walker and the gather pass work with points on surfaces without
//! knowing which shape produced them.

// std
use std::fmt;
use std::sync::Arc;
// pbrt
use crate::core::geometry::{vec3_dot_nrmf, Normal3f, Point3f, Ray, Vector3f};
use crate::core::pbrt::{Float, RAY_EPSILON, SHADOW_EPSILON};
use crate::core::reflection::Bsdf;

#[derive(Default, Clone)]
pub struct SurfaceInteraction {
    pub p: Point3f,
    /// Geometric normal, facing out of the shape.
    pub n: Normal3f,
    /// Direction towards the origin of the ray that found the hit.
    pub wo: Vector3f,
    /// Ray parameter of the hit.
    pub t: Float,
    /// Index of the hit primitive in the scene, set by the scene.
    pub primitive: Option<usize>,
    pub bsdf: Option<Arc<dyn Bsdf>>,
}

impl SurfaceInteraction {
    pub fn new(p: Point3f, n: Normal3f, wo: Vector3f, t: Float) -> Self {
        SurfaceInteraction {
            p,
            n,
            wo,
            t,
            primitive: None,
            bsdf: None,
        }
    }
    /// Origin pushed off the surface to the side *w* points to.
    pub fn offset_origin(&self, w: &Vector3f) -> Point3f {
        let offset: Vector3f = Vector3f::from(self.n) * RAY_EPSILON;
        if vec3_dot_nrmf(w, &self.n) < 0.0 as Float {
            self.p - offset
        } else {
            self.p + offset
        }
    }
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        Ray::new(self.offset_origin(d), *d)
    }
    /// Shadow ray towards *target*; it stops just short of it.
    pub fn spawn_ray_to(&self, target: &Point3f) -> Ray {
        let origin: Point3f = self.offset_origin(&(*target - self.p));
        let d: Vector3f = *target - origin;
        Ray::with_t_max(origin, d, 1.0 - SHADOW_EPSILON)
    }
}

impl fmt::Debug for SurfaceInteraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceInteraction")
            .field("p", &self.p)
            .field("n", &self.n)
            .field("wo", &self.wo)
            .field("t", &self.t)
            .field("primitive", &self.primitive)
            .field("bsdf", &self.bsdf.is_some())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn spawned_rays_leave_on_the_right_side() {
        let si = SurfaceInteraction::new(
            Point3f::new(0.0, 0.0, 0.0),
            Normal3f::new(0.0, 1.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            1.0,
        );
        let up = si.spawn_ray(&Vector3f::new(0.0, 1.0, 0.0));
        assert!(up.o.y > 0.0);
        let down = si.spawn_ray(&Vector3f::new(0.3, -1.0, 0.0));
        assert!(down.o.y < 0.0);
        let shadow = si.spawn_ray_to(&Point3f::new(0.0, 2.0, 0.0));
        assert!(shadow.position(shadow.t_max.get()).y < 2.0);
    }
}
