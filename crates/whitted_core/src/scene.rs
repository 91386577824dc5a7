//! Scene description types.
//!
//! This is the read-only input of the tracer: a camera descriptor, global
//! shading coefficients, an ordered light list and a tree of nodes carrying
//! transformations and primitive instances. Everything deserializes from the
//! JSON scene format (see [`crate::loader`]).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use whitted_math::{Mat4, Vec3};

/// RGB triple, each channel nominally in [0, 1].
pub type Color = Vec3;

/// The closed set of canonical primitives.
///
/// Every shape is unit sized and centered at the origin of its own object
/// space (radius / half-extent 0.5).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Cube,
    Cylinder,
    Cone,
    Sphere,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Cube, Shape::Cylinder, Shape::Cone, Shape::Sphere];

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Cube => "cube",
            Shape::Cylinder => "cylinder",
            Shape::Cone => "cone",
            Shape::Sphere => "sphere",
        }
    }
}

/// Texture reference of a material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureMap {
    /// Image file, relative paths resolve against the scene directory
    pub file: String,

    /// Tiling along u
    pub repeat_u: f32,

    /// Tiling along v
    pub repeat_v: f32,

    pub enabled: bool,
}

impl Default for TextureMap {
    fn default() -> Self {
        Self {
            file: String::new(),
            repeat_u: 1.0,
            repeat_v: 1.0,
            enabled: true,
        }
    }
}

impl TextureMap {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..Default::default()
        }
    }
}

/// Phong material owned by a single primitive instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,

    /// Per-channel weight of the recursive reflection
    pub reflective: Color,

    /// Carried through from the scene file; refraction is not traced
    pub transparent: Color,

    pub shininess: f32,

    /// Texture weight: 0 keeps the material colour, 1 replaces it
    pub blend: f32,

    pub texture: Option<TextureMap>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Color::ZERO,
            diffuse: Color::splat(0.5), // Grey default
            specular: Color::ZERO,
            reflective: Color::ZERO,
            transparent: Color::ZERO,
            shininess: 1.0,
            blend: 0.0,
            texture: None,
        }
    }
}

impl Material {
    /// A material with only a diffuse colour.
    pub fn diffuse(color: Color) -> Self {
        Self {
            diffuse: color,
            ..Default::default()
        }
    }

    /// The texture to sample, if one is set, enabled and names a file.
    pub fn active_texture(&self) -> Option<&TextureMap> {
        self.texture
            .as_ref()
            .filter(|tex| tex.enabled && !tex.file.is_empty())
    }

    /// Check if any reflective channel is non-zero.
    pub fn is_reflective(&self) -> bool {
        self.reflective.max_element() > 0.0
    }
}

/// A primitive instance attached to a scene node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub shape: Shape,

    #[serde(default)]
    pub material: Material,
}

impl Primitive {
    pub fn new(shape: Shape, material: Material) -> Self {
        Self { shape, material }
    }
}

/// One transformation operation of a node. Angles are radians.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transformation {
    Translate(Vec3),
    Scale(Vec3),
    Rotate { axis: Vec3, angle: f32 },
    /// Column-major 4x4
    Matrix(Mat4),
}

impl Transformation {
    /// The matrix of this operation.
    ///
    /// A zero rotation axis yields the identity.
    pub fn to_matrix(&self) -> Mat4 {
        match self {
            Transformation::Translate(t) => Mat4::from_translation(*t),
            Transformation::Scale(s) => Mat4::from_scale(*s),
            Transformation::Rotate { axis, angle } => match axis.try_normalize() {
                Some(axis) => Mat4::from_axis_angle(axis, *angle),
                None => Mat4::IDENTITY,
            },
            Transformation::Matrix(m) => *m,
        }
    }

    /// Describe why this operation cannot be used, if it cannot.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Transformation::Translate(t) if !t.is_finite() => {
                Err(format!("non-finite translation {t}"))
            }
            Transformation::Scale(s) if !s.is_finite() => Err(format!("non-finite scale {s}")),
            Transformation::Scale(s) if s.x == 0.0 || s.y == 0.0 || s.z == 0.0 => {
                Err(format!("scale {s} has a zero component"))
            }
            Transformation::Rotate { axis, angle } if !axis.is_finite() || !angle.is_finite() => {
                Err(format!("non-finite rotation about {axis} by {angle}"))
            }
            Transformation::Rotate { axis, .. } if axis.length_squared() == 0.0 => {
                Err("rotation axis has zero length".to_string())
            }
            Transformation::Matrix(m) if !m.is_finite() => {
                Err("matrix has non-finite entries".to_string())
            }
            Transformation::Matrix(m) if m.determinant() == 0.0 => {
                Err("matrix is singular".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// A node of the scene tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneNode {
    /// Applied left to right onto the inherited transform
    pub transformations: Vec<Transformation>,
    pub primitives: Vec<Primitive>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transformation(mut self, transformation: Transformation) -> Self {
        self.transformations.push(transformation);
        self
    }

    pub fn with_primitive(mut self, primitive: Primitive) -> Self {
        self.primitives.push(primitive);
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Compose this node's own operations, in order.
    pub fn local_matrix(&self) -> Mat4 {
        self.transformations
            .iter()
            .fold(Mat4::IDENTITY, |acc, op| acc * op.to_matrix())
    }

    /// Primitive instances reachable from this node, itself included.
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
            + self
                .children
                .iter()
                .map(SceneNode::primitive_count)
                .sum::<usize>()
    }
}

fn default_attenuation() -> Vec3 {
    Vec3::new(1.0, 0.0, 0.0)
}

/// A light source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Light {
    Point {
        position: Vec3,
        color: Color,
        /// (constant, linear, quadratic)
        #[serde(default = "default_attenuation")]
        attenuation: Vec3,
    },
    Directional {
        /// Direction the light travels; not required to be unit length
        direction: Vec3,
        color: Color,
    },
}

impl Light {
    pub fn point(position: Vec3, color: Color) -> Self {
        Light::Point {
            position,
            color,
            attenuation: default_attenuation(),
        }
    }

    pub fn directional(direction: Vec3, color: Color) -> Self {
        Light::Directional { direction, color }
    }

    pub fn color(&self) -> Color {
        match self {
            Light::Point { color, .. } | Light::Directional { color, .. } => *color,
        }
    }

    /// Distance falloff `1 / max(1, c + l*d + q*d^2)`. Directional lights
    /// never fall off.
    pub fn attenuation_at(&self, distance: f32) -> f32 {
        match self {
            Light::Point { attenuation, .. } => {
                let falloff =
                    attenuation.x + attenuation.y * distance + attenuation.z * distance * distance;
                1.0 / falloff.max(1.0)
            }
            Light::Directional { .. } => 1.0,
        }
    }
}

/// Scene-wide weights of the material terms.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalData {
    pub ka: f32,
    pub kd: f32,
    pub ks: f32,
    pub kt: f32,
}

impl Default for GlobalData {
    fn default() -> Self {
        Self {
            ka: 1.0,
            kd: 1.0,
            ks: 0.0,
            kt: 0.0,
        }
    }
}

/// How the camera descriptor states its viewing direction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CameraOrientation {
    LookAt { look_at: Vec3 },
    LookVector { look: Vec3 },
}

fn default_up() -> Vec3 {
    Vec3::Y
}

fn default_height_angle() -> f32 {
    60.0
}

/// Camera descriptor as stored in the scene file.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraData {
    pub position: Vec3,

    #[serde(flatten)]
    pub orientation: CameraOrientation,

    #[serde(default = "default_up")]
    pub up: Vec3,

    /// Vertical field of view in degrees
    #[serde(default = "default_height_angle")]
    pub height_angle: f32,
}

impl CameraData {
    pub fn look_at(position: Vec3, look_at: Vec3, up: Vec3) -> Self {
        Self {
            position,
            orientation: CameraOrientation::LookAt { look_at },
            up,
            height_angle: default_height_angle(),
        }
    }

    pub fn look_vector(position: Vec3, look: Vec3, up: Vec3) -> Self {
        Self {
            position,
            orientation: CameraOrientation::LookVector { look },
            up,
            height_angle: default_height_angle(),
        }
    }

    pub fn with_height_angle(mut self, degrees: f32) -> Self {
        self.height_angle = degrees;
        self
    }

    /// The viewing direction, whichever form was given.
    pub fn look_direction(&self) -> Vec3 {
        match self.orientation {
            CameraOrientation::LookAt { look_at } => look_at - self.position,
            CameraOrientation::LookVector { look } => look,
        }
    }
}

/// A complete scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene name (usually from filename)
    #[serde(default)]
    pub name: String,

    pub camera: CameraData,

    #[serde(default)]
    pub globals: GlobalData,

    #[serde(default)]
    pub lights: Vec<Light>,

    #[serde(default)]
    pub root: SceneNode,

    /// Directory relative texture paths resolve against
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Scene {
    /// Create a scene with no lights and an empty root.
    pub fn new(name: impl Into<String>, camera: CameraData) -> Self {
        Self {
            name: name.into(),
            camera,
            globals: GlobalData::default(),
            lights: Vec::new(),
            root: SceneNode::default(),
            base_dir: None,
        }
    }

    pub fn with_globals(mut self, globals: GlobalData) -> Self {
        self.globals = globals;
        self
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    pub fn with_root(mut self, root: SceneNode) -> Self {
        self.root = root;
        self
    }

    /// Get total primitive instance count.
    pub fn primitive_count(&self) -> usize {
        self.root.primitive_count()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_counts_nested_primitives() {
        let root = SceneNode::new()
            .with_primitive(Primitive::new(Shape::Cube, Material::default()))
            .with_child(
                SceneNode::new()
                    .with_primitive(Primitive::new(Shape::Sphere, Material::default()))
                    .with_child(
                        SceneNode::new()
                            .with_primitive(Primitive::new(Shape::Cone, Material::default())),
                    ),
            )
            .with_child(SceneNode::new());

        assert_eq!(root.primitive_count(), 3);
    }

    #[test]
    fn test_local_matrix_order() {
        let node = SceneNode::new()
            .with_transformation(Transformation::Translate(Vec3::new(1.0, 0.0, 0.0)))
            .with_transformation(Transformation::Scale(Vec3::splat(2.0)));

        // Scale first, then translate: x = 2 * 1 + 1
        let p = node.local_matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_rotation_normalizes_axis() {
        let op = Transformation::Rotate {
            axis: Vec3::new(0.0, 0.0, 5.0),
            angle: std::f32::consts::FRAC_PI_2,
        };
        let p = op.to_matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_transformation_validation() {
        assert!(Transformation::Scale(Vec3::new(1.0, 0.0, 1.0))
            .validate()
            .is_err());
        assert!(Transformation::Rotate {
            axis: Vec3::ZERO,
            angle: 1.0
        }
        .validate()
        .is_err());
        assert!(Transformation::Translate(Vec3::new(f32::NAN, 0.0, 0.0))
            .validate()
            .is_err());
        assert!(Transformation::Matrix(Mat4::ZERO).validate().is_err());
        assert!(Transformation::Scale(Vec3::splat(-1.0)).validate().is_ok());
    }

    #[test]
    fn test_material_texture_gating() {
        let mut material = Material::default();
        assert!(material.active_texture().is_none());

        material.texture = Some(TextureMap::new("wood.png"));
        assert!(material.active_texture().is_some());

        if let Some(tex) = material.texture.as_mut() {
            tex.enabled = false;
        }
        assert!(material.active_texture().is_none());

        material.texture = Some(TextureMap::new(""));
        assert!(material.active_texture().is_none());
    }

    #[test]
    fn test_light_attenuation() {
        let plain = Light::point(Vec3::ZERO, Color::ONE);
        assert_eq!(plain.attenuation_at(100.0), 1.0);

        let falloff = Light::Point {
            position: Vec3::ZERO,
            color: Color::ONE,
            attenuation: Vec3::new(0.0, 0.0, 1.0),
        };
        assert!((falloff.attenuation_at(4.0) - 1.0 / 16.0).abs() < 1e-6);
        // Never brightens
        assert_eq!(falloff.attenuation_at(0.5), 1.0);

        let sun = Light::directional(Vec3::NEG_Y, Color::ONE);
        assert_eq!(sun.attenuation_at(1e6), 1.0);
    }

    #[test]
    fn test_camera_look_direction() {
        let at = CameraData::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        assert_eq!(at.look_direction(), Vec3::new(0.0, 0.0, -5.0));

        let vec = CameraData::look_vector(Vec3::ZERO, Vec3::X, Vec3::Y);
        assert_eq!(vec.look_direction(), Vec3::X);
        assert_eq!(vec.height_angle, 60.0);
    }
}
