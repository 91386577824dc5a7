//! Sphere primitive for ray tracing.

use std::f32::consts::PI;

use whitted_math::{Interval, Ray, Vec3};

use crate::shape::{longitude, nearest, solve_quadratic, HALF_EXTENT};

/// Above this |y| a point counts as a pole.
const POLE_Y: f32 = 0.499;

pub fn intersect(ray: &Ray, ray_t: Interval) -> Option<f32> {
    let a = ray.direction.length_squared();
    let b = 2.0 * ray.origin.dot(ray.direction);
    let c = ray.origin.length_squared() - HALF_EXTENT * HALF_EXTENT;

    let (t0, t1) = solve_quadratic(a, b, c)?;
    nearest([t0, t1], ray_t)
}

pub fn normal(p: Vec3) -> Vec3 {
    p.normalize_or_zero()
}

/// Longitude / latitude. Longitude is undefined at the poles and
/// pinned to 0.5 there.
pub fn uv(p: Vec3) -> (f32, f32) {
    let latitude = (p.y / HALF_EXTENT).clamp(-1.0, 1.0).asin();
    let v = latitude / PI + 0.5;

    if p.y.abs() > POLE_Y {
        return (0.5, v);
    }
    (longitude(p), v)
}
