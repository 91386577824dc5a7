//! Whitted Core - Scene description, scene files and textures.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `SceneNode`, `Primitive`, `Material`, `Light`
//! - **Scene files**: JSON loading and validation
//! - **Textures**: RGB texture decoding and a lazily filled cache
//!
//! # Example
//!
//! ```ignore
//! use whitted_core::load_scene;
//!
//! let scene = load_scene("scenes/spheres.json")?;
//! println!("Loaded {} primitives, {} lights",
//!     scene.primitive_count(),
//!     scene.light_count());
//! ```

pub mod loader;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use loader::{load_scene, load_scene_from_str, LoadError, LoadResult};
pub use scene::{
    CameraData, CameraOrientation, Color, GlobalData, Light, Material, Primitive, Scene,
    SceneNode, Shape, TextureMap, Transformation,
};
pub use texture::{Texture, TextureCache, TextureError, TextureResult};
