use glam::{Mat3, Mat4, Quat, Vec3, Vec4};

/// Default vertical view angle in degrees.
pub const DEFAULT_VIEW_ANGLE: f32 = 60.0;
/// Default near clipping plane distance.
pub const DEFAULT_NEAR_PLANE: f32 = 0.01;
/// Default far clipping plane distance.
pub const DEFAULT_FAR_PLANE: f32 = 20.0;
/// Default screen size in pixels.
pub const DEFAULT_SCREEN_SIZE: (u32, u32) = (800, 600);

/// Distance from the eye to the focus point after `reset()`.
const DEFAULT_FOCUS_LENGTH: f32 = 1.0;

/// Below this length a look/up vector (or their cross product) is degenerate.
const DEGENERATE_LENGTH: f32 = 1e-6;

/// Perspective camera with an explicit orthonormal basis.
///
/// The basis follows the usual convention: `w` points away from the view
/// direction, `u` to the right and `v` up. All public angles are degrees.
/// Setters never fail: out-of-range input is logged and replaced with the
/// default value, so the camera always stays usable.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    eye: Vec3,
    look: Vec3,
    up: Vec3,

    u: Vec3,
    v: Vec3,
    w: Vec3,

    view_angle: f32,
    near: f32,
    far: f32,

    screen_width: u32,
    screen_height: u32,
    aspect: f32,

    // Last absolute slider rotation, see `set_rot_uvw`
    rot_u: f32,
    rot_v: f32,
    rot_w: f32,
}

impl Camera {
    /// Create a camera at (0, 0, 1) looking at the origin.
    pub fn new() -> Self {
        let (width, height) = DEFAULT_SCREEN_SIZE;
        let mut camera = Self {
            eye: Vec3::ZERO,
            look: Vec3::NEG_Z,
            up: Vec3::Y,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            view_angle: DEFAULT_VIEW_ANGLE,
            near: DEFAULT_NEAR_PLANE,
            far: DEFAULT_FAR_PLANE,
            screen_width: width,
            screen_height: height,
            aspect: width as f32 / height as f32,
            rot_u: 0.0,
            rot_v: 0.0,
            rot_w: 0.0,
        };
        camera.reset();
        camera
    }

    /// Restore orientation, view angle and clip planes to their defaults.
    ///
    /// The screen size is kept; it belongs to the display, not the scene.
    pub fn reset(&mut self) {
        self.orient_look_at(Vec3::new(0.0, 0.0, DEFAULT_FOCUS_LENGTH), Vec3::ZERO, Vec3::Y);
        self.view_angle = DEFAULT_VIEW_ANGLE;
        self.near = DEFAULT_NEAR_PLANE;
        self.far = DEFAULT_FAR_PLANE;
        self.rot_u = 0.0;
        self.rot_v = 0.0;
        self.rot_w = 0.0;
    }

    /// Orient the camera at `eye`, looking towards `focus`.
    pub fn orient_look_at(&mut self, eye: Vec3, focus: Vec3, up: Vec3) {
        self.orient_look_vec(eye, focus - eye, up);
    }

    /// Orient the camera at `eye`, looking along `look`.
    ///
    /// A zero-length look or up vector, or a look vector parallel to up,
    /// leaves the camera unchanged.
    pub fn orient_look_vec(&mut self, eye: Vec3, look: Vec3, up: Vec3) {
        if !eye.is_finite() {
            log::warn!("Camera: ignoring non-finite eye point {eye:?}");
            return;
        }
        let Some((look, up)) = checked_look_up(look, up) else {
            log::warn!(
                "Camera: degenerate look {look:?} / up {up:?}; keeping previous orientation"
            );
            return;
        };

        self.eye = eye;
        self.look = look;
        self.up = up;
        self.update_basis();
    }

    /// Set the vertical view angle in degrees, strictly between 0 and 180.
    pub fn set_view_angle(&mut self, degrees: f32) {
        if degrees.is_finite() && degrees > 0.0 && degrees < 180.0 {
            self.view_angle = degrees;
        } else {
            log::warn!(
                "Camera: view angle {degrees} outside (0, 180); using {DEFAULT_VIEW_ANGLE}"
            );
            self.view_angle = DEFAULT_VIEW_ANGLE;
        }
    }

    /// Set the near clipping plane; must satisfy 0 < near < far.
    pub fn set_near_plane(&mut self, near: f32) {
        if near.is_finite() && near > 0.0 && near < self.far {
            self.near = near;
        } else {
            log::warn!(
                "Camera: near plane {near} invalid for far plane {}; using {DEFAULT_NEAR_PLANE}",
                self.far
            );
            self.near = DEFAULT_NEAR_PLANE;
            self.enforce_clip_order();
        }
    }

    /// Set the far clipping plane; must satisfy 0 < near < far.
    pub fn set_far_plane(&mut self, far: f32) {
        if far.is_finite() && far > self.near {
            self.far = far;
        } else {
            log::warn!(
                "Camera: far plane {far} invalid for near plane {}; using {DEFAULT_FAR_PLANE}",
                self.near
            );
            self.far = DEFAULT_FAR_PLANE;
            self.enforce_clip_order();
        }
    }

    /// Set the screen size in pixels and update the aspect ratio.
    pub fn set_screen_size(&mut self, width: u32, height: u32) {
        let (width, height) = if width > 0 && height > 0 {
            (width, height)
        } else {
            log::warn!(
                "Camera: screen size {width}x{height} invalid; using {}x{}",
                DEFAULT_SCREEN_SIZE.0,
                DEFAULT_SCREEN_SIZE.1
            );
            DEFAULT_SCREEN_SIZE
        };
        self.screen_width = width;
        self.screen_height = height;
        self.aspect = width as f32 / height as f32;
    }

    /// A defaulted plane can still collide with the other one; fall back to
    /// both defaults when it does.
    fn enforce_clip_order(&mut self) {
        if self.near >= self.far {
            log::warn!(
                "Camera: near {} >= far {}; restoring default clip planes",
                self.near,
                self.far
            );
            self.near = DEFAULT_NEAR_PLANE;
            self.far = DEFAULT_FAR_PLANE;
        }
    }

    fn update_basis(&mut self) {
        self.w = -self.look;
        self.u = self.up.cross(self.w).normalize();
        self.v = self.w.cross(self.u);
    }

    /// Perspective projection as `unhinge * scale`.
    pub fn projection_matrix(&self) -> Mat4 {
        self.unhinge_matrix() * self.scale_matrix()
    }

    /// Scales the view volume to the canonical frustum whose far plane sits at z = -1.
    pub fn scale_matrix(&self) -> Mat4 {
        let scale_y = 1.0 / ((self.view_angle.to_radians() / 2.0).tan() * self.far);
        let scale_x = scale_y / self.aspect;
        let scale_z = 1.0 / self.far;
        Mat4::from_scale(Vec3::new(scale_x, scale_y, scale_z))
    }

    /// Maps the canonical perspective frustum to the parallel view volume.
    ///
    /// With `c = -near / far`, the near plane lands on z = 0 and the far plane
    /// on z = 1 after the perspective divide.
    pub fn unhinge_matrix(&self) -> Mat4 {
        let c = -(self.near / self.far);
        Mat4::from_cols(
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -1.0 / (c + 1.0), -1.0),
            Vec4::new(0.0, 0.0, c / (c + 1.0), 0.0),
        )
    }

    /// World-to-camera transform (right-handed, camera looks down -w).
    pub fn model_view_matrix(&self) -> Mat4 {
        let rotation = Mat4::from_mat3(Mat3::from_cols(self.u, self.v, self.w).transpose());
        rotation * Mat4::from_translation(-self.eye)
    }

    /// Camera-to-world transform.
    pub fn inverse_model_view_matrix(&self) -> Mat4 {
        self.model_view_matrix().inverse()
    }

    /// Combined `projection * model_view`.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.model_view_matrix()
    }

    /// Rotate look and up about the camera's `u` axis.
    pub fn rotate_u(&mut self, degrees: f32) {
        self.rotate_basis(self.u, degrees);
    }

    /// Rotate look and up about the camera's `v` axis.
    pub fn rotate_v(&mut self, degrees: f32) {
        self.rotate_basis(self.v, degrees);
    }

    /// Roll about the camera's `w` axis. Positive angles roll clockwise as
    /// seen through the camera.
    pub fn rotate_w(&mut self, degrees: f32) {
        self.rotate_basis(self.w, -degrees);
    }

    /// Apply absolute rotation angles (e.g. from sliders) incrementally,
    /// relative to the previously applied values.
    pub fn set_rot_uvw(&mut self, u: f32, v: f32, w: f32) {
        self.rotate_u(u - self.rot_u);
        self.rotate_v(v - self.rot_v);
        self.rotate_w(w - self.rot_w);
        self.rot_u = u;
        self.rot_v = v;
        self.rot_w = w;
    }

    /// Orbit the eye about `point` around `axis`, turning the view with it.
    pub fn rotate_about(&mut self, point: Vec3, axis: Vec3, degrees: f32) {
        let Some(axis) = axis.try_normalize() else {
            log::warn!("Camera: ignoring rotation about zero axis");
            return;
        };
        let rotation = Quat::from_axis_angle(axis, degrees.to_radians());
        self.eye = point + rotation * (self.eye - point);
        self.look = (rotation * self.look).normalize();
        self.up = (rotation * self.up).normalize();
        self.update_basis();
    }

    fn rotate_basis(&mut self, axis: Vec3, degrees: f32) {
        let rotation = Quat::from_axis_angle(axis, degrees.to_radians());
        self.look = (rotation * self.look).normalize();
        self.up = (rotation * self.up).normalize();
        self.update_basis();
    }

    /// Move the eye point by a world-space offset.
    pub fn translate(&mut self, offset: Vec3) {
        self.eye += offset;
    }

    pub fn eye_point(&self) -> Vec3 {
        self.eye
    }

    pub fn look_vector(&self) -> Vec3 {
        self.look
    }

    pub fn up_vector(&self) -> Vec3 {
        self.up
    }

    /// The orthonormal basis `(u, v, w)`.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    pub fn view_angle(&self) -> f32 {
        self.view_angle
    }

    pub fn near_plane(&self) -> f32 {
        self.near
    }

    pub fn far_plane(&self) -> f32 {
        self.far
    }

    pub fn screen_width(&self) -> u32 {
        self.screen_width
    }

    pub fn screen_height(&self) -> u32 {
        self.screen_height
    }

    /// Width / height.
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Distance to a film plane of half-height 1 for the current view angle.
    pub fn film_plane_depth(&self) -> f32 {
        1.0 / (self.view_angle.to_radians() / 2.0).tan()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

fn checked_look_up(look: Vec3, up: Vec3) -> Option<(Vec3, Vec3)> {
    if look.length() < DEGENERATE_LENGTH || up.length() < DEGENERATE_LENGTH {
        return None;
    }
    let look = look.try_normalize()?;
    let up = up.try_normalize()?;
    if look.cross(up).length() < DEGENERATE_LENGTH {
        return None;
    }
    Some((look, up))
}
