//! Shape dispatch and shared intersection helpers.
//!
//! Every shape is canonical: unit sized, centered at the origin of its object
//! space. Rays handed to [`Geometry`] are already in that space.

use whitted_core::Shape;
use whitted_math::{Interval, Ray, Vec3};

use crate::{cone, cube, cylinder, sphere};

/// Half extent (and radius) of every canonical shape.
pub const HALF_EXTENT: f32 = 0.5;

/// Relative size below which a direction component counts as zero.
///
/// Object-space directions shrink with the instance scale, so the
/// threshold is always taken relative to the full direction.
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Distance within which an object point counts as lying on a flat cap.
pub const CAP_EPSILON: f32 = 1e-4;

/// Object-space geometry of a canonical shape.
pub trait Geometry {
    /// Smallest ray parameter strictly inside `ray_t` at which the ray
    /// meets the surface.
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32>;

    /// Outward unit normal at a surface point.
    fn normal(&self, p: Vec3) -> Vec3;

    /// Texture coordinates of a surface point, nominally in [0, 1].
    fn uv(&self, p: Vec3) -> (f32, f32);
}

impl Geometry for Shape {
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        match self {
            Shape::Cube => cube::intersect(ray, ray_t),
            Shape::Cylinder => cylinder::intersect(ray, ray_t),
            Shape::Cone => cone::intersect(ray, ray_t),
            Shape::Sphere => sphere::intersect(ray, ray_t),
        }
    }

    fn normal(&self, p: Vec3) -> Vec3 {
        match self {
            Shape::Cube => cube::normal(p),
            Shape::Cylinder => cylinder::normal(p),
            Shape::Cone => cone::normal(p),
            Shape::Sphere => sphere::normal(p),
        }
    }

    fn uv(&self, p: Vec3) -> (f32, f32) {
        match self {
            Shape::Cube => cube::uv(p),
            Shape::Cylinder => cylinder::uv(p),
            Shape::Cone => cone::uv(p),
            Shape::Sphere => sphere::uv(p),
        }
    }
}

/// Real roots of `a t^2 + b t + c`, smaller first. `None` when the
/// discriminant is negative or `a` is zero.
///
/// Callers decide when a small `a` is degenerate, see [`negligible`].
pub(crate) fn solve_quadratic(a: f32, b: f32, c: f32) -> Option<(f32, f32)> {
    if a == 0.0 || !a.is_finite() {
        return None;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    let t0 = (-b - sqrtd) / (2.0 * a);
    let t1 = (-b + sqrtd) / (2.0 * a);
    Some((t0.min(t1), t0.max(t1)))
}

/// True when `value` vanishes next to `scale`.
///
/// Pass a direction component with `|d|`, or a squared component with
/// `|d|^2`.
pub(crate) fn negligible(value: f32, scale: f32) -> bool {
    value.abs() <= PARALLEL_EPSILON * scale
}

/// Smallest candidate strictly inside `ray_t`.
pub(crate) fn nearest(candidates: impl IntoIterator<Item = f32>, ray_t: Interval) -> Option<f32> {
    candidates
        .into_iter()
        .filter(|t| ray_t.surrounds(*t))
        .fold(None, |best: Option<f32>, t| match best {
            Some(b) if b <= t => Some(b),
            _ => Some(t),
        })
}

/// Hit parameter of the disk of radius 0.5 in the plane `y = cap_y`.
pub(crate) fn cap_hit(ray: &Ray, cap_y: f32) -> Option<f32> {
    let (p, d) = (ray.origin, ray.direction);
    if negligible(d.y, d.length()) {
        return None;
    }

    let t = (cap_y - p.y) / d.y;
    let x = p.x + t * d.x;
    let z = p.z + t * d.z;
    (x * x + z * z <= HALF_EXTENT * HALF_EXTENT).then_some(t)
}

/// Longitude in [0, 1] about the y axis.
pub(crate) fn longitude(p: Vec3) -> f32 {
    use std::f32::consts::PI;
    ((-p.z).atan2(p.x) + PI) / (2.0 * PI)
}

/// Planar mapping of a point on a flat cap at height `p.y`.
pub(crate) fn cap_uv(p: Vec3) -> (f32, f32) {
    ((-p.x / p.y + 1.0) * 0.5, (p.z / p.y + 1.0) * 0.5)
}
