//! Stateful render session: owns the camera, the loaded scene, its
//! flattened object list, the texture cache and the output image.

use std::path::{Path, PathBuf};
use std::time::Instant;

use whitted_core::{load_scene, load_scene_from_str, LoadResult, Scene, TextureCache};
use whitted_math::Camera;

use crate::flatten::flatten;
use crate::hittable::ObjectList;
use crate::renderer::{render, ImageBuffer, RenderConfig, TraceStats, Tracer};

/// Scene state between render passes.
///
/// A failed load leaves the session without a scene: renders are no-ops
/// and the last image stays as it was until a load succeeds.
pub struct RenderSession {
    camera: Camera,
    config: RenderConfig,
    scene: Option<Scene>,
    objects: ObjectList,
    textures: TextureCache,
    image: ImageBuffer,
    stats: TraceStats,
}

impl RenderSession {
    /// Create an empty session rendering at `width x height`.
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Camera::new();
        camera.set_screen_size(width, height);
        let image = ImageBuffer::new(camera.screen_width(), camera.screen_height());

        Self {
            camera,
            config: RenderConfig::default(),
            scene: None,
            objects: ObjectList::new(),
            textures: TextureCache::new(),
            image,
            stats: TraceStats::default(),
        }
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Load a scene file, replacing the current scene.
    pub fn load_scene<P: AsRef<Path>>(&mut self, path: P) -> LoadResult<()> {
        let path = path.as_ref();
        log::info!("Loading scene from: {}", path.display());
        let result = load_scene(path);
        self.install(result)
    }

    /// Load a scene from JSON text. Relative texture paths resolve
    /// against `base_dir`.
    pub fn load_scene_str(&mut self, json: &str, base_dir: Option<PathBuf>) -> LoadResult<()> {
        let result = load_scene_from_str(json, "unnamed", base_dir);
        self.install(result)
    }

    fn install(&mut self, result: LoadResult<Scene>) -> LoadResult<()> {
        match result {
            Ok(scene) => {
                self.set_scene(scene);
                Ok(())
            }
            Err(e) => {
                log::warn!("Scene load failed, no scene loaded: {}", e);
                self.scene = None;
                self.objects.clear();
                self.textures.clear();
                Err(e)
            }
        }
    }

    /// Install an already built scene.
    pub fn set_scene(&mut self, scene: Scene) {
        self.textures.clear();
        self.textures.set_base_dir(scene.base_dir.clone());
        self.objects = flatten(&scene.root);

        let data = scene.camera;
        self.camera.reset();
        self.camera
            .orient_look_vec(data.position, data.look_direction(), data.up);
        self.camera.set_view_angle(data.height_angle);

        log::info!(
            "Loaded scene '{}': {} objects, {} lights",
            scene.name,
            self.objects.len(),
            scene.light_count()
        );
        self.scene = Some(scene);
    }

    /// Update the screen size; takes effect on the next render.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_screen_size(width, height);
        let (width, height) = (self.camera.screen_width(), self.camera.screen_height());
        if (width, height) != (self.image.width, self.image.height) {
            log::debug!("Resized to {}x{}", width, height);
            self.image = ImageBuffer::new(width, height);
        }
    }

    /// Render the current scene. Without a scene this does nothing and
    /// returns the previous image.
    pub fn render(&mut self) -> &ImageBuffer {
        let Some(scene) = &self.scene else {
            log::warn!("Render requested without a loaded scene");
            return &self.image;
        };

        let start = Instant::now();
        let mut image = ImageBuffer::new(self.camera.screen_width(), self.camera.screen_height());
        let mut tracer = Tracer::new(
            &self.objects,
            &scene.lights,
            scene.globals,
            &self.config,
            &mut self.textures,
        );
        self.stats = render(&self.camera, &mut tracer, &mut image);
        self.image = image;

        log::info!(
            "Rendered {}x{} in {:.2?}",
            self.image.width,
            self.image.height,
            start.elapsed()
        );
        log::debug!(
            "Rays: {} primary, {} reflection, {} shadow",
            self.stats.primary_rays,
            self.stats.reflection_rays,
            self.stats.shadow_rays
        );
        log::debug!(
            "Textures: {} cached ({:.1} KB)",
            self.textures.len(),
            self.textures.total_size_bytes() as f32 / 1024.0
        );

        &self.image
    }

    pub fn image(&self) -> &ImageBuffer {
        &self.image
    }

    pub fn has_scene(&self) -> bool {
        self.scene.is_some()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn objects(&self) -> &ObjectList {
        &self.objects
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Interactive camera changes apply to the next render.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    /// Ray counts of the last render.
    pub fn stats(&self) -> TraceStats {
        self.stats
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }
}
