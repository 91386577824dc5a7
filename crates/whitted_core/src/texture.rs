//! Texture loading and caching for materials.
//!
//! Textures are decoded to 8-bit RGB, row-major with the origin at the top
//! left, and cached by the file name the material references. Failed loads
//! are remembered so a broken reference is reported once per scene.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use whitted_math::Vec3;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A loaded texture with pixel data.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Interleaved RGB bytes, row-major, first row at the top
    pub pixels: Vec<u8>,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a texture from RGB bytes.
    ///
    /// Fails when the buffer does not hold `width * height` pixels or the
    /// image is empty.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        path: impl Into<String>,
    ) -> TextureResult<Self> {
        let path = path.into();
        if width == 0 || height == 0 {
            return Err(TextureError::LoadError(format!("{path} has no pixels")));
        }
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(TextureError::LoadError(format!(
                "{path}: expected {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
            path,
        })
    }

    /// Nearest-pixel lookup with tiling.
    ///
    /// `(u, v)` is scaled by the repeat counts and wrapped into [0, 1); v
    /// runs bottom to top, so it is flipped to match the row order.
    pub fn sample_repeat(&self, u: f32, v: f32, repeat_u: f32, repeat_v: f32) -> Vec3 {
        let s = wrap(u * repeat_u);
        let t = wrap(v * repeat_v);

        let x = (s * (self.width - 1) as f32) as u32;
        let y = ((1.0 - t) * (self.height - 1) as f32) as u32;

        self.get_pixel(x.min(self.width - 1), y.min(self.height - 1))
    }

    /// Get pixel at integer coordinates as a colour in [0, 1].
    fn get_pixel(&self, x: u32, y: u32) -> Vec3 {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        match self.pixels.get(idx..idx + 3) {
            Some(rgb) => Vec3::new(rgb[0] as f32, rgb[1] as f32, rgb[2] as f32) / 255.0,
            None => Vec3::ZERO,
        }
    }

    /// Get total size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.pixels.len()
    }
}

/// Fractional part in [0, 1), also for negative input.
fn wrap(x: f32) -> f32 {
    let f = x - x.floor();
    if f.is_finite() && f < 1.0 {
        f
    } else {
        0.0
    }
}

/// Cache for loaded textures.
///
/// Textures are loaded on first reference and stay read-only until
/// [`TextureCache::clear`].
#[derive(Debug, Default)]
pub struct TextureCache {
    /// Cached textures by file name as referenced
    textures: HashMap<String, Arc<Texture>>,

    /// References that failed to load
    failed: HashSet<String>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
            ..Default::default()
        }
    }

    /// Set or unset the base directory for resolving relative paths.
    pub fn set_base_dir(&mut self, base_dir: Option<PathBuf>) {
        self.base_dir = base_dir;
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<Texture>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let texture = Arc::new(load_texture_file(&full_path)?);

        self.textures.insert(path.to_string(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path,
            texture.width,
            texture.height,
            texture.size_bytes() as f32 / 1024.0
        );

        Ok(texture)
    }

    /// Load a texture, or `None` if it cannot be loaded.
    ///
    /// A failure is logged the first time and remembered, so later lookups
    /// of the same reference return `None` without touching the disk.
    pub fn get_or_load(&mut self, path: &str) -> Option<Arc<Texture>> {
        if self.failed.contains(path) {
            return None;
        }

        match self.load(path) {
            Ok(texture) => Some(texture),
            Err(e) => {
                log::warn!("Texture '{}' unavailable, shading untextured: {}", path, e);
                self.failed.insert(path.to_string());
                None
            }
        }
    }

    /// Check if a reference previously failed to load.
    pub fn has_failed(&self, path: &str) -> bool {
        self.failed.contains(path)
    }

    /// Get the number of cached textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Drop every cached texture and failure record.
    pub fn clear(&mut self) {
        self.textures.clear();
        self.failed.clear();
    }

    /// Get total memory usage of cached textures.
    pub fn total_size_bytes(&self) -> usize {
        self.textures.values().map(|t| t.size_bytes()).sum()
    }

    /// Resolve a path relative to the base directory.
    fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);

        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Load a texture from a file path.
fn load_texture_file(path: &Path) -> TextureResult<Texture> {
    if !path.exists() {
        return Err(TextureError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        )));
    }

    let img = image::open(path)?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    Texture::new(
        width,
        height,
        rgb.into_raw(),
        path.to_string_lossy().to_string(),
    )
}
