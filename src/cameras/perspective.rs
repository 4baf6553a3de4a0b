// pbrt
use crate::core::camera::Camera;
use crate::core::geometry::{vec3_cross_vec3, Point2f, Point2i, Point3f, Ray, Vector3f};
use crate::core::pbrt::{radians, Float};

/// Pinhole perspective camera. The field of view spans the shorter
/// image axis.
#[derive(Debug, Copy, Clone)]
pub struct PinholeCamera {
    pub pos: Point3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    pub resolution: Point2i,
}

impl PinholeCamera {
    pub fn new(pos: Point3f, look_at: Point3f, up: Vector3f, fov: Float, resolution: Point2i) -> Self {
        let forward: Vector3f = (look_at - pos).normalize();
        let right: Vector3f = vec3_cross_vec3(&up, &forward).normalize();
        let true_up: Vector3f = vec3_cross_vec3(&forward, &right);
        let tan_half: Float = (radians(fov) * 0.5 as Float).tan();
        let w: Float = resolution.x.max(1) as Float;
        let h: Float = resolution.y.max(1) as Float;
        let (sx, sy) = if w > h {
            (tan_half * w / h, tan_half)
        } else {
            (tan_half, tan_half * h / w)
        };
        PinholeCamera {
            pos,
            forward,
            right: right * sx,
            up: true_up * sy,
            resolution,
        }
    }
}

impl Camera for PinholeCamera {
    fn generate_ray(&self, pixel: &Point2i, sample: &Point2f) -> Ray {
        let x: Float = (pixel.x as Float + sample.x) / self.resolution.x as Float;
        let y: Float = (pixel.y as Float + sample.y) / self.resolution.y as Float;
        // raster y grows downwards
        let ndc_x: Float = 2.0 as Float * x - 1.0 as Float;
        let ndc_y: Float = 1.0 as Float - 2.0 as Float * y;
        let d: Vector3f = (self.forward + self.right * ndc_x + self.up * ndc_y).normalize();
        Ray::new(self.pos, d)
    }
    fn resolution(&self) -> Point2i {
        self.resolution
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn center_pixel_looks_forward() {
        let camera = PinholeCamera::new(
            Point3f::new(0.0, 1.0, -3.0),
            Point3f::new(0.0, 1.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            45.0,
            Point2i { x: 64, y: 32 },
        );
        let ray = camera.generate_ray(&Point2i { x: 32, y: 16 }, &Point2f { x: 0.0, y: 0.0 });
        assert!((ray.d.z - 1.0).abs() < 1e-5);
        let corner = camera.generate_ray(&Point2i { x: 0, y: 0 }, &Point2f { x: 0.0, y: 0.0 });
        // top left in raster space is up and to the left
        assert!(corner.d.y > 0.0);
        assert!(corner.d.x < 0.0);
    }
}
