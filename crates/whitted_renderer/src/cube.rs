//! Axis-aligned unit cube.

use whitted_math::{Interval, Ray, Vec3};

use crate::shape::{negligible, HALF_EXTENT};

/// Slab test against the three pairs of faces.
pub fn intersect(ray: &Ray, ray_t: Interval) -> Option<f32> {
    let slab = Interval::new(-HALF_EXTENT, HALF_EXTENT);
    let mut span = Interval::UNIVERSE;
    let length = ray.direction.length();

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];

        // Parallel to this slab: inside it or a miss
        if negligible(dir, length) {
            if !slab.contains(origin) {
                return None;
            }
            continue;
        }

        let inv_d = 1.0 / dir;
        let t0 = (-HALF_EXTENT - origin) * inv_d;
        let t1 = (HALF_EXTENT - origin) * inv_d;
        span = span.intersect(&Interval::new(t0.min(t1), t0.max(t1)));

        if span.is_empty() {
            return None;
        }
    }

    if ray_t.surrounds(span.min) {
        Some(span.min)
    } else if ray_t.surrounds(span.max) {
        Some(span.max)
    } else {
        None
    }
}

/// Normal of the face whose axis dominates the point.
pub fn normal(p: Vec3) -> Vec3 {
    let a = p.abs();
    if a.x >= a.y && a.x >= a.z {
        Vec3::new(p.x.signum(), 0.0, 0.0)
    } else if a.y >= a.z {
        Vec3::new(0.0, p.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, p.z.signum())
    }
}

/// Each face maps onto the full unit square.
pub fn uv(p: Vec3) -> (f32, f32) {
    let a = p.abs();
    let (u, v) = if a.x >= a.y && a.x >= a.z {
        if p.x > 0.0 {
            (-p.z / p.x, p.y / p.x)
        } else {
            (p.z / p.x, p.y / p.x)
        }
    } else if a.y >= a.z {
        (p.x / p.y, p.z / p.y)
    } else if p.z > 0.0 {
        (p.x / p.z, p.y / p.z)
    } else {
        (-p.x / p.z, p.y / p.z)
    };

    ((u + 1.0) * 0.5, (v + 1.0) * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_inside_hits_far_face() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let t = intersect(&ray, Interval::new(0.0, f32::INFINITY)).unwrap();
        assert!((t - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_cube_diagonal_hit() {
        let ray = Ray::new(Vec3::new(2.0, 2.0, 0.0), Vec3::new(-1.0, -1.0, 0.0));
        let t = intersect(&ray, Interval::new(0.0, f32::INFINITY)).unwrap();
        assert!((t - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_cube_parallel_outside_slab() {
        // Travels along x but sits above the cube
        let ray = Ray::new(Vec3::new(-3.0, 0.6, 0.0), Vec3::X);
        assert!(intersect(&ray, Interval::new(0.0, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_cube_face_normals() {
        assert_eq!(normal(Vec3::new(0.5, 0.1, -0.2)), Vec3::X);
        assert_eq!(normal(Vec3::new(0.1, -0.5, 0.2)), Vec3::NEG_Y);
        assert_eq!(normal(Vec3::new(0.1, 0.2, -0.5)), Vec3::NEG_Z);
    }

    #[test]
    fn test_cube_face_uv() {
        // Center of every face maps to the center of the texture
        for n in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z] {
            let (u, v) = uv(n * 0.5);
            assert!((u - 0.5).abs() < 1e-6 && (v - 0.5).abs() < 1e-6);
        }

        // Front face spans the square
        let (u, v) = uv(Vec3::new(-0.49, -0.49, 0.5));
        assert!(u < 0.02 && v < 0.02);
        let (u, v) = uv(Vec3::new(0.49, 0.49, 0.5));
        assert!(u > 0.98 && v > 0.98);
    }
}
