//! Geometric classes used throughout the photon mapper: points,
//! vectors, normals, bounding boxes and rays.
//!
//! ```rust
//! use rs_photon::core::geometry::{Point3f, Vector3f};
//!
//! let origin = Point3f { x: 0.0, y: 0.0, z: 0.0 };
//! let up = Vector3f { x: 0.0, y: 1.0, z: 0.0 };
//! let p: Point3f = origin + up * 2.0;
//! assert_eq!(p.y, 2.0);
//! ```

// std
use std::cell::Cell;
use std::ops;
use std::ops::{Index, IndexMut};
// others
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
// pbrt
use crate::core::pbrt::Float;

#[derive(EnumIter, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum XYZEnum {
    X = 0,
    Y = 1,
    Z = 2,
}

impl From<u8> for XYZEnum {
    fn from(i: u8) -> Self {
        match i {
            0 => XYZEnum::X,
            1 => XYZEnum::Y,
            _ => XYZEnum::Z,
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point2f {
    pub x: Float,
    pub y: Float,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Point2i {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Vector3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Vector3f { x, y, z }
    }
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
    pub fn abs(&self) -> Vector3f {
        Vector3f {
            x: self.x.abs(),
            y: self.y.abs(),
            z: self.z.abs(),
        }
    }
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
    /// Compute a new vector pointing in the same direction but with unit
    /// length.
    pub fn normalize(&self) -> Vector3f {
        *self / self.length()
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Point3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Point3f { x, y, z }
    }
}

/// A surface normal; kept apart from **Vector3f** because normals
/// are tied to a surface.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Normal3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Normal3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Normal3f { x, y, z }
    }
    pub fn length(&self) -> Float {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
    pub fn normalize(&self) -> Normal3f {
        *self / self.length()
    }
}

impl_op!(-|a: Vector3f| -> Vector3f {
    Vector3f {
        x: -a.x,
        y: -a.y,
        z: -a.z,
    }
});

impl_op!(-|a: Normal3f| -> Normal3f {
    Normal3f {
        x: -a.x,
        y: -a.y,
        z: -a.z,
    }
});

impl_op_ex!(+|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(+|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(+|a: &Point3f, b: &Point3f| -> Point3f {
    Point3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Point3f, b: &Point3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(*|a: &Vector3f, b: Float| -> Vector3f {
    Vector3f {
        x: a.x * b,
        y: a.y * b,
        z: a.z * b,
    }
});

impl_op_ex!(*|a: &Point3f, b: Float| -> Point3f {
    Point3f {
        x: a.x * b,
        y: a.y * b,
        z: a.z * b,
    }
});

impl_op_ex!(*|a: &Normal3f, b: Float| -> Normal3f {
    Normal3f {
        x: a.x * b,
        y: a.y * b,
        z: a.z * b,
    }
});

impl_op_ex!(/|a: &Vector3f, b: Float| -> Vector3f {
    let inv: Float = 1.0 as Float / b;
    Vector3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

impl_op_ex!(/|a: &Point3f, b: Float| -> Point3f {
    let inv: Float = 1.0 as Float / b;
    Point3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

impl_op_ex!(/|a: &Normal3f, b: Float| -> Normal3f {
    let inv: Float = 1.0 as Float / b;
    Normal3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

impl_op!(+= |a: &mut Vector3f, b: Vector3f| {
    a.x += b.x;
    a.y += b.y;
    a.z += b.z;
});

impl_op!(*= |a: &mut Vector3f, b: Float| {
    a.x *= b;
    a.y *= b;
    a.z *= b;
});

impl Index<XYZEnum> for Vector3f {
    type Output = Float;
    fn index(&self, index: XYZEnum) -> &Float {
        match index {
            XYZEnum::X => &self.x,
            XYZEnum::Y => &self.y,
            XYZEnum::Z => &self.z,
        }
    }
}

impl Index<XYZEnum> for Point3f {
    type Output = Float;
    fn index(&self, index: XYZEnum) -> &Float {
        match index {
            XYZEnum::X => &self.x,
            XYZEnum::Y => &self.y,
            XYZEnum::Z => &self.z,
        }
    }
}

impl IndexMut<XYZEnum> for Point3f {
    fn index_mut(&mut self, index: XYZEnum) -> &mut Float {
        match index {
            XYZEnum::X => &mut self.x,
            XYZEnum::Y => &mut self.y,
            XYZEnum::Z => &mut self.z,
        }
    }
}

impl From<Point3f> for Vector3f {
    fn from(p: Point3f) -> Self {
        Vector3f {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

impl From<Normal3f> for Vector3f {
    fn from(n: Normal3f) -> Self {
        Vector3f {
            x: n.x,
            y: n.y,
            z: n.z,
        }
    }
}

impl From<Vector3f> for Normal3f {
    fn from(v: Vector3f) -> Self {
        Normal3f {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Product of the Euclidean magnitudes of the two vectors and the
/// cosine of the angle between them.
pub fn vec3_dot_vec3f(v1: &Vector3f, v2: &Vector3f) -> Float {
    v1.x * v2.x + v1.y * v2.y + v1.z * v2.z
}

pub fn vec3_dot_nrmf(v1: &Vector3f, n2: &Normal3f) -> Float {
    v1.x * n2.x + v1.y * n2.y + v1.z * n2.z
}

pub fn vec3_abs_dot_nrmf(v1: &Vector3f, n2: &Normal3f) -> Float {
    vec3_dot_nrmf(v1, n2).abs()
}

/// Given two vectors in 3D, the cross product is a vector that is
/// perpendicular to both of them.
pub fn vec3_cross_vec3(v1: &Vector3f, v2: &Vector3f) -> Vector3f {
    let v1x: f64 = v1.x as f64;
    let v1y: f64 = v1.y as f64;
    let v1z: f64 = v1.z as f64;
    let v2x: f64 = v2.x as f64;
    let v2y: f64 = v2.y as f64;
    let v2z: f64 = v2.z as f64;
    Vector3f {
        x: ((v1y * v2z) - (v1z * v2y)) as Float,
        y: ((v1z * v2x) - (v1x * v2z)) as Float,
        z: ((v1x * v2y) - (v1y * v2x)) as Float,
    }
}

/// Return the largest coordinate value.
/// Construct a local coordinate system given only a single 3D
/// vector.
pub fn vec3_coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2: Vector3f = if v1.x.abs() > v1.y.abs() {
        Vector3f {
            x: -v1.z,
            y: 0.0 as Float,
            z: v1.x,
        } / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f {
            x: 0.0 as Float,
            y: v1.z,
            z: -v1.y,
        } / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    let v3: Vector3f = vec3_cross_vec3(v1, &v2);
    (v2, v3)
}

/// Express a direction given in spherical coordinates relative to
/// the frame *x*, *y*, *z*.
pub fn spherical_direction_vec3(
    sin_theta: Float,
    cos_theta: Float,
    phi: Float,
    x: &Vector3f,
    y: &Vector3f,
    z: &Vector3f,
) -> Vector3f {
    *x * (sin_theta * phi.cos()) + *y * (sin_theta * phi.sin()) + *z * cos_theta
}

/// Flip a surface normal so that it lies in the same hemisphere as
/// a given vector.
pub fn nrm_faceforward_vec3(n: &Normal3f, v: &Vector3f) -> Normal3f {
    if vec3_dot_nrmf(v, n) < 0.0 as Float {
        -(*n)
    } else {
        *n
    }
}

/// Mirror *wo* about the normal *n*.
pub fn vec3_reflect(wo: &Vector3f, n: &Normal3f) -> Vector3f {
    let nv: Vector3f = Vector3f::from(*n);
    -(*wo) + nv * (2.0 as Float * vec3_dot_nrmf(wo, n))
}

/// The distance between two points is the length of the vector
/// between them.
pub fn pnt3_distancef(p1: &Point3f, p2: &Point3f) -> Float {
    (*p1 - *p2).length()
}

pub fn pnt3_distance_squaredf(p1: &Point3f, p2: &Point3f) -> Float {
    (*p1 - *p2).length_squared()
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Bounds2i {
    pub p_min: Point2i,
    pub p_max: Point2i,
}

impl Bounds2i {
    pub fn new(p1: Point2i, p2: Point2i) -> Self {
        Bounds2i {
            p_min: Point2i {
                x: p1.x.min(p2.x),
                y: p1.y.min(p2.y),
            },
            p_max: Point2i {
                x: p1.x.max(p2.x),
                y: p1.y.max(p2.y),
            },
        }
    }
    pub fn area(&self) -> i32 {
        (self.p_max.x - self.p_min.x) * (self.p_max.y - self.p_min.y)
    }
}

pub struct Bounds2Iterator<'a> {
    p: Point2i,
    bounds: &'a Bounds2i,
}

impl<'a> Iterator for Bounds2Iterator<'a> {
    type Item = Point2i;
    fn next(&mut self) -> Option<Point2i> {
        if self.p.y >= self.bounds.p_max.y || self.bounds.p_min.x >= self.bounds.p_max.x {
            return None;
        }
        let current: Point2i = self.p;
        self.p.x += 1;
        if self.p.x == self.bounds.p_max.x {
            self.p.x = self.bounds.p_min.x;
            self.p.y += 1;
        }
        Some(current)
    }
}

impl<'a> IntoIterator for &'a Bounds2i {
    type Item = Point2i;
    type IntoIter = Bounds2Iterator<'a>;
    fn into_iter(self) -> Self::IntoIter {
        Bounds2Iterator {
            p: self.p_min,
            bounds: self,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds3f {
    pub p_min: Point3f,
    pub p_max: Point3f,
}

impl Default for Bounds3f {
    fn default() -> Bounds3f {
        let min_num: Float = std::f32::MIN;
        let max_num: Float = std::f32::MAX;
        Bounds3f {
            p_min: Point3f {
                x: max_num,
                y: max_num,
                z: max_num,
            },
            p_max: Point3f {
                x: min_num,
                y: min_num,
                z: min_num,
            },
        }
    }
}

impl Bounds3f {
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        let p_min: Point3f = Point3f {
            x: p1.x.min(p2.x),
            y: p1.y.min(p2.y),
            z: p1.z.min(p2.z),
        };
        let p_max: Point3f = Point3f {
            x: p1.x.max(p2.x),
            y: p1.y.max(p2.y),
            z: p1.z.max(p2.z),
        };
        Bounds3f { p_min, p_max }
    }
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }
    pub fn maximum_extent(&self) -> XYZEnum {
        let d: Vector3f = self.diagonal();
        if d.x > d.y && d.x > d.z {
            XYZEnum::X
        } else if d.y > d.z {
            XYZEnum::Y
        } else {
            XYZEnum::Z
        }
    }
    pub fn centroid(&self) -> Point3f {
        (self.p_min + self.p_max) * 0.5 as Float
    }
    /// Center and radius of a sphere enclosing the box.
    pub fn bounding_sphere(&self) -> (Point3f, Float) {
        if self.is_empty() {
            return (Point3f::default(), 0.0 as Float);
        }
        let center: Point3f = self.centroid();
        (center, pnt3_distancef(&center, &self.p_max))
    }
    /// Parametric range of the ray inside the box, clipped to
    /// `[0, ray.t_max]`.
    pub fn intersect_p(&self, ray: &Ray) -> Option<(Float, Float)> {
        let mut t0: Float = 0.0;
        let mut t1: Float = ray.t_max.get();
        for i in XYZEnum::iter() {
            // update interval for _i_th bounding box slab
            let inv_ray_dir: Float = 1.0 as Float / ray.d[i];
            let mut t_near: Float = (self.p_min[i] - ray.o[i]) * inv_ray_dir;
            let mut t_far: Float = (self.p_max[i] - ray.o[i]) * inv_ray_dir;
            // update parametric interval from slab intersection $t$ values
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            t0 = if t_near > t0 { t_near } else { t0 };
            t1 = if t_far < t1 { t_far } else { t1 };
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }
}

pub fn bnd3_union_pnt3f(b: &Bounds3f, p: &Point3f) -> Bounds3f {
    Bounds3f {
        p_min: Point3f {
            x: b.p_min.x.min(p.x),
            y: b.p_min.y.min(p.y),
            z: b.p_min.z.min(p.z),
        },
        p_max: Point3f {
            x: b.p_max.x.max(p.x),
            y: b.p_max.y.max(p.y),
            z: b.p_max.z.max(p.z),
        },
    }
}

pub fn bnd3_union_bnd3f(b1: &Bounds3f, b2: &Bounds3f) -> Bounds3f {
    Bounds3f {
        p_min: Point3f {
            x: b1.p_min.x.min(b2.p_min.x),
            y: b1.p_min.y.min(b2.p_min.y),
            z: b1.p_min.z.min(b2.p_min.z),
        },
        p_max: Point3f {
            x: b1.p_max.x.max(b2.p_max.x),
            y: b1.p_max.y.max(b2.p_max.y),
            z: b1.p_max.z.max(b2.p_max.z),
        },
    }
}

/// Pad the bounding box by a constant factor in all dimensions.
pub fn bnd3_expand(b: &Bounds3f, delta: Float) -> Bounds3f {
    let d: Vector3f = Vector3f {
        x: delta,
        y: delta,
        z: delta,
    };
    Bounds3f::new(b.p_min - d, b.p_max + d)
}

pub fn pnt3_inside_bnd3(p: &Point3f, b: &Bounds3f) -> bool {
    p.x >= b.p_min.x
        && p.x <= b.p_max.x
        && p.y >= b.p_min.y
        && p.y <= b.p_max.y
        && p.z >= b.p_min.z
        && p.z <= b.p_max.z
}

#[derive(Debug, Clone)]
pub struct Ray {
    /// origin
    pub o: Point3f,
    /// direction
    pub d: Vector3f,
    /// limits the ray to a segment along its infinite extent
    pub t_max: Cell<Float>,
}

impl Default for Ray {
    fn default() -> Self {
        Ray {
            o: Point3f::default(),
            d: Vector3f::default(),
            t_max: Cell::new(std::f32::INFINITY),
        }
    }
}

impl Ray {
    pub fn new(o: Point3f, d: Vector3f) -> Self {
        Ray {
            o,
            d,
            t_max: Cell::new(std::f32::INFINITY),
        }
    }
    pub fn with_t_max(o: Point3f, d: Vector3f, t_max: Float) -> Self {
        Ray {
            o,
            d,
            t_max: Cell::new(t_max),
        }
    }
    // Point3f operator()(Float t) const { return o + d * t; }
    pub fn position(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bounds2_iterator_visits_every_pixel_once() {
        let b = Bounds2i::new(Point2i { x: 1, y: 2 }, Point2i { x: 4, y: 4 });
        let pixels: Vec<Point2i> = (&b).into_iter().collect();
        assert_eq!(pixels.len(), b.area() as usize);
        assert_eq!(pixels[0], Point2i { x: 1, y: 2 });
        assert_eq!(pixels[5], Point2i { x: 3, y: 3 });
    }

    #[test]
    fn ray_box_slab_test() {
        let b = Bounds3f::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));
        let inside = Ray::new(Point3f::default(), Vector3f::new(0.0, 0.0, 1.0));
        let (t0, t1) = b.intersect_p(&inside).unwrap();
        assert_eq!(t0, 0.0);
        assert!((t1 - 1.0).abs() < 1e-6);
        let miss = Ray::new(Point3f::new(0.0, 3.0, 0.0), Vector3f::new(0.0, 0.0, 1.0));
        assert!(b.intersect_p(&miss).is_none());
    }

    #[test]
    fn coordinate_system_is_orthonormal() {
        let v1 = Vector3f::new(0.3, -0.4, 0.866).normalize();
        let (v2, v3) = vec3_coordinate_system(&v1);
        assert!(vec3_dot_vec3f(&v1, &v2).abs() < 1e-5);
        assert!(vec3_dot_vec3f(&v1, &v3).abs() < 1e-5);
        assert!(vec3_dot_vec3f(&v2, &v3).abs() < 1e-5);
        assert!((v3.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn point_and_vector_operators() {
        let p = Point3f::new(1.0, 2.0, 3.0);
        let q = Point3f::new(0.5, 0.0, -1.0);
        let v: Vector3f = p - q;
        assert_eq!(v, Vector3f::new(0.5, 2.0, 4.0));
        assert_eq!(q + v, p);
        assert_eq!(p - v, q);
        assert_eq!(v * 2.0, Vector3f::new(1.0, 4.0, 8.0));
        assert_eq!(v / 2.0, Vector3f::new(0.25, 1.0, 2.0));
        assert_eq!(-v, Vector3f::new(-0.5, -2.0, -4.0));
        assert_eq!(-Normal3f::new(0.0, 1.0, 0.0), Normal3f::new(0.0, -1.0, 0.0));
        let mut w = Vector3f::new(1.0, 1.0, 1.0);
        w += v;
        w *= 2.0;
        assert_eq!(w, Vector3f::new(3.0, 6.0, 10.0));
        let axes: Vec<XYZEnum> = XYZEnum::iter().collect();
        assert_eq!(axes, vec![XYZEnum::X, XYZEnum::Y, XYZEnum::Z]);
    }

    #[test]
    fn maximum_extent_picks_longest_axis() {
        let b = Bounds3f::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 5.0, 2.0));
        assert_eq!(b.maximum_extent(), XYZEnum::Y);
    }
}
