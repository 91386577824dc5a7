//! Unit cone: apex at y = 0.5, base of radius 0.5 at y = -0.5.

use whitted_math::{Interval, Ray, Vec3};

use crate::shape::{
    cap_hit, cap_uv, longitude, negligible, nearest, solve_quadratic, CAP_EPSILON, HALF_EXTENT,
};

/// Squared radius-to-height slope: r(y) = (0.5 - y) / 2.
const SLOPE_SQ: f32 = 0.25;

/// Nearest of the body and the base cap.
pub fn intersect(ray: &Ray, ray_t: Interval) -> Option<f32> {
    let (p, d) = (ray.origin, ray.direction);
    let h = HALF_EXTENT - p.y;

    let a = d.x * d.x + d.z * d.z - SLOPE_SQ * d.y * d.y;
    let b = 2.0 * (p.x * d.x + p.z * d.z + SLOPE_SQ * h * d.y);
    let c = p.x * p.x + p.z * p.z - SLOPE_SQ * h * h;

    let roots: [Option<f32>; 2] = if negligible(a, d.length_squared()) {
        // Ray parallel to a generator line: linear
        if b == 0.0 {
            [None, None]
        } else {
            [Some(-c / b), None]
        }
    } else {
        match solve_quadratic(a, b, c) {
            Some((t0, t1)) => [Some(t0), Some(t1)],
            None => [None, None],
        }
    };

    // Clipping to the height also drops the mirrored upper nappe
    let body = roots
        .into_iter()
        .flatten()
        .filter(|t| (p.y + t * d.y).abs() <= HALF_EXTENT);

    nearest(body.chain(cap_hit(ray, -HALF_EXTENT)), ray_t)
}

pub fn normal(p: Vec3) -> Vec3 {
    if (p.y + HALF_EXTENT).abs() < CAP_EPSILON {
        return Vec3::NEG_Y;
    }
    Vec3::new(p.x, SLOPE_SQ * (HALF_EXTENT - p.y), p.z).normalize_or_zero()
}

pub fn uv(p: Vec3) -> (f32, f32) {
    if (p.y + HALF_EXTENT).abs() < CAP_EPSILON {
        return cap_uv(p);
    }
    (longitude(p), p.y + 0.5)
}
