//! Unit cylinder along y with flat caps.

use whitted_math::{Interval, Ray, Vec3};

use crate::shape::{
    cap_hit, cap_uv, longitude, negligible, nearest, solve_quadratic, CAP_EPSILON, HALF_EXTENT,
};

/// Nearest of the body and the two caps.
pub fn intersect(ray: &Ray, ray_t: Interval) -> Option<f32> {
    let (p, d) = (ray.origin, ray.direction);

    let a = d.x * d.x + d.z * d.z;
    let b = 2.0 * (p.x * d.x + p.z * d.z);
    let c = p.x * p.x + p.z * p.z - HALF_EXTENT * HALF_EXTENT;

    let within_height = |t: f32| (p.y + t * d.y).abs() <= HALF_EXTENT;
    // Along the axis only the caps can be hit
    let radial = if negligible(a, d.length_squared()) {
        None
    } else {
        solve_quadratic(a, b, c)
    };
    let body = radial
        .map(|(t0, t1)| [t0, t1])
        .into_iter()
        .flatten()
        .filter(|t| within_height(*t));

    let caps = [cap_hit(ray, HALF_EXTENT), cap_hit(ray, -HALF_EXTENT)]
        .into_iter()
        .flatten();

    nearest(body.chain(caps), ray_t)
}

pub fn normal(p: Vec3) -> Vec3 {
    if (p.y - HALF_EXTENT).abs() < CAP_EPSILON {
        Vec3::Y
    } else if (p.y + HALF_EXTENT).abs() < CAP_EPSILON {
        Vec3::NEG_Y
    } else {
        Vec3::new(p.x, 0.0, p.z).normalize_or_zero()
    }
}

pub fn uv(p: Vec3) -> (f32, f32) {
    if (p.y.abs() - HALF_EXTENT).abs() < CAP_EPSILON {
        return cap_uv(p);
    }
    (longitude(p), p.y + 0.5)
}
