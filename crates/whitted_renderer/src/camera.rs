//! Primary ray generation.

use whitted_math::{safe_normalize, Camera, Mat4, Ray, Vec3};

/// Turns pixel coordinates into world-space eye rays for one frame.
///
/// Unprojects through the inverse of `projection * model_view`, so it has
/// to be rebuilt whenever the camera changes.
#[derive(Debug, Clone, Copy)]
pub struct RayGenerator {
    eye: Vec3,
    inverse_view_projection: Mat4,
    width: u32,
    height: u32,
}

impl RayGenerator {
    pub fn new(camera: &Camera, width: u32, height: u32) -> Self {
        Self {
            eye: camera.eye_point(),
            inverse_view_projection: camera.view_projection_matrix().inverse(),
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Ray through pixel `(x, y)`, rows counted from the top of the image.
    pub fn generate(&self, x: u32, y: u32) -> Ray {
        let ndc_x = (x as f32 / self.width as f32 - 0.5) * 2.0;
        let ndc_y = (0.5 - y as f32 / self.height as f32) * 2.0;

        // z = 0 is the near plane
        let on_near = self
            .inverse_view_projection
            .project_point3(Vec3::new(ndc_x, ndc_y, 0.0));

        Ray::new(self.eye, safe_normalize(on_near - self.eye))
    }
}

/// One-off ray through a pixel of a `width x height` screen.
pub fn generate_ray(x: u32, y: u32, width: u32, height: u32, camera: &Camera) -> Ray {
    RayGenerator::new(camera, width, height).generate(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(width: u32, height: u32) -> Camera {
        let mut camera = Camera::new();
        camera.orient_look_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y);
        camera.set_screen_size(width, height);
        camera
    }

    #[test]
    fn test_center_pixel_looks_forward() {
        let cam = camera(10, 10);
        let ray = generate_ray(5, 5, 10, 10, &cam);

        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 3.0));
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
        assert!((ray.direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_top_edge_matches_view_angle() {
        let cam = camera(10, 10);
        let ray = generate_ray(5, 0, 10, 10, &cam);

        // Half of the 60 degree view angle above the axis
        let slope = ray.direction.y / -ray.direction.z;
        assert!((slope - 30f32.to_radians().tan()).abs() < 1e-3);
        assert!(ray.direction.x.abs() < 1e-4);
    }

    #[test]
    fn test_rows_run_top_down_and_columns_left_right() {
        let cam = camera(20, 10);
        let top_left = generate_ray(0, 0, 20, 10, &cam);
        let bottom_right = generate_ray(19, 9, 20, 10, &cam);

        assert!(top_left.direction.x < 0.0 && top_left.direction.y > 0.0);
        assert!(bottom_right.direction.x > 0.0 && bottom_right.direction.y < 0.0);
    }

    #[test]
    fn test_aspect_widens_horizontal_extent() {
        let cam = camera(20, 10);
        let left = generate_ray(0, 5, 20, 10, &cam);
        let top = generate_ray(10, 0, 20, 10, &cam);

        let horizontal = -left.direction.x / -left.direction.z;
        let vertical = top.direction.y / -top.direction.z;
        assert!((horizontal / vertical - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_rays_follow_camera_orientation() {
        let mut cam = camera(10, 10);
        cam.orient_look_vec(Vec3::new(1.0, 2.0, 3.0), Vec3::X, Vec3::Y);

        let ray = RayGenerator::new(&cam, 10, 10).generate(5, 5);
        assert_eq!(ray.origin, Vec3::new(1.0, 2.0, 3.0));
        assert!((ray.direction - Vec3::X).length() < 1e-4);
    }
}
