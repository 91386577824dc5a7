//! Scene file loading.
//!
//! Scene files are JSON documents (see [`crate::scene`] for the types they
//! deserialize into). Loading parses, fills in the name and base directory,
//! then validates everything the tracer cannot recover from at render time.

use std::path::{Path, PathBuf};

use thiserror::Error;
use whitted_math::Vec3;

use crate::scene::{Light, Scene, SceneNode};

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid scene: {0}")]
    InvalidScene(String),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load a scene file.
///
/// The scene is named after the file stem and relative texture paths
/// resolve against the file's directory.
///
/// # Example
///
/// ```ignore
/// use whitted_core::load_scene;
///
/// let scene = load_scene("scenes/spheres.json")?;
/// println!("Loaded {} primitives", scene.primitive_count());
/// ```
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<Scene> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");

    let content = std::fs::read_to_string(path)?;
    let base_dir = path.parent().map(Path::to_path_buf);

    load_scene_from_str(&content, name, base_dir)
}

/// Load a scene from a JSON string.
///
/// `name` is used when the document does not name itself.
pub fn load_scene_from_str(
    content: &str,
    name: &str,
    base_dir: Option<PathBuf>,
) -> LoadResult<Scene> {
    let mut scene: Scene = serde_json::from_str(content)?;

    if scene.name.is_empty() {
        scene.name = name.to_string();
    }
    scene.base_dir = base_dir;

    validate_scene(&scene)?;

    log::debug!(
        "Parsed scene '{}': {} primitives, {} lights",
        scene.name,
        scene.primitive_count(),
        scene.light_count()
    );

    Ok(scene)
}

fn validate_scene(scene: &Scene) -> LoadResult<()> {
    let camera = &scene.camera;
    if !camera.position.is_finite() {
        return Err(invalid("camera position is not finite"));
    }
    check_direction(camera.look_direction(), "camera look")?;
    check_direction(camera.up, "camera up")?;
    if !camera.height_angle.is_finite() {
        return Err(invalid("camera height angle is not finite"));
    }

    for (i, light) in scene.lights.iter().enumerate() {
        validate_light(light).map_err(|msg| invalid(format!("light {i}: {msg}")))?;
    }

    validate_node(&scene.root, "root")
}

fn validate_light(light: &Light) -> Result<(), String> {
    match light {
        Light::Point {
            position,
            color,
            attenuation,
        } => {
            if !position.is_finite() || !color.is_finite() || !attenuation.is_finite() {
                return Err("non-finite point light".to_string());
            }
        }
        Light::Directional { direction, color } => {
            if !color.is_finite() {
                return Err("non-finite light colour".to_string());
            }
            if direction.try_normalize().is_none() {
                return Err("directional light has no direction".to_string());
            }
        }
    }
    Ok(())
}

fn validate_node(node: &SceneNode, path: &str) -> LoadResult<()> {
    for (i, op) in node.transformations.iter().enumerate() {
        op.validate()
            .map_err(|msg| invalid(format!("{path}/transformations[{i}]: {msg}")))?;
    }

    for (i, child) in node.children.iter().enumerate() {
        validate_node(child, &format!("{path}/children[{i}]"))?;
    }

    Ok(())
}

fn check_direction(v: Vec3, what: &str) -> LoadResult<()> {
    if !v.is_finite() || v.length_squared() == 0.0 {
        return Err(invalid(format!("{what} vector must be finite and non-zero")));
    }
    Ok(())
}

fn invalid(msg: impl Into<String>) -> LoadError {
    LoadError::InvalidScene(msg.into())
}
