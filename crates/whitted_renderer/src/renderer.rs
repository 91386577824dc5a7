//! Whitted ray tracing: nearest hit, Phong with shadow rays, recursive
//! mirror reflection, and the per-pixel frame loop.

use std::path::Path;

use whitted_core::{Color, GlobalData, Light, TextureCache};
use whitted_math::{Camera, Interval, Ray, Vec3};

use crate::camera::RayGenerator;
use crate::hittable::{HitRecord, ObjectList};
use crate::shading::{ambient, direct_light, reflect, surface_response, LightSample};

/// Hits closer than this along any ray are treated as self-intersection.
pub const INTERSECTION_EPSILON: f32 = 1e-3;

/// Offset of secondary ray origins off the surface.
pub const SHADOW_EPSILON: f32 = 2e-3;

/// What a render pass writes into the image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Full shading with shadows and reflections
    #[default]
    Shaded,
    /// White where a primary ray hits anything, black elsewhere
    IntersectOnly,
}

/// When a hit spawns a reflection ray.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReflectionGate {
    /// Whenever the global specular coefficient is positive
    #[default]
    GlobalSpecular,
    /// Only when additionally the hit material has a non-zero reflective colour
    MaterialReflective,
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Maximum reflection recursion depth
    pub max_depth: u32,
    pub mode: RenderMode,
    pub reflection_gate: ReflectionGate,
    /// Scale point lights by their distance falloff
    pub light_attenuation: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            mode: RenderMode::Shaded,
            reflection_gate: ReflectionGate::GlobalSpecular,
            light_attenuation: false,
        }
    }
}

/// Ray counts of one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    pub primary_rays: u64,
    pub reflection_rays: u64,
    pub shadow_rays: u64,
}

impl TraceStats {
    pub fn total(&self) -> u64 {
        self.primary_rays + self.reflection_rays + self.shadow_rays
    }
}

/// Recursive tracer over a frozen object list.
pub struct Tracer<'a> {
    objects: &'a ObjectList,
    lights: &'a [Light],
    globals: GlobalData,
    config: &'a RenderConfig,
    textures: &'a mut TextureCache,
    stats: TraceStats,
}

impl<'a> Tracer<'a> {
    pub fn new(
        objects: &'a ObjectList,
        lights: &'a [Light],
        globals: GlobalData,
        config: &'a RenderConfig,
        textures: &'a mut TextureCache,
    ) -> Self {
        Self {
            objects,
            lights,
            globals,
            config,
            textures,
            stats: TraceStats::default(),
        }
    }

    pub fn stats(&self) -> TraceStats {
        self.stats
    }

    /// Colour seen along `ray` at reflection depth `depth` (0 for eye rays).
    ///
    /// Black past the maximum depth or when nothing is hit.
    pub fn trace(&mut self, ray: &Ray, depth: u32) -> Color {
        if depth > self.config.max_depth {
            return Color::ZERO;
        }

        let objects = self.objects;
        let forward = Interval::new(INTERSECTION_EPSILON, f32::INFINITY);
        let Some(hit) = objects.closest_hit(ray, forward) else {
            return Color::ZERO;
        };

        let mut color = self.direct_lighting(ray, &hit);

        let material = hit.object.material();
        if self.should_reflect(&hit, depth) {
            let incoming = ray.direction.normalize_or_zero();
            let reflected = Ray::new(
                hit.p + SHADOW_EPSILON * hit.normal,
                reflect(incoming, hit.normal),
            );
            self.stats.reflection_rays += 1;

            let bounce = self.trace(&reflected, depth + 1);
            color += bounce * material.reflective * self.globals.ks;
        }

        color.clamp(Color::ZERO, Color::ONE)
    }

    /// True if anything hits `ray` at all, ignoring shading.
    pub fn hits_anything(&self, ray: &Ray) -> bool {
        let forward = Interval::new(INTERSECTION_EPSILON, f32::INFINITY);
        self.objects.closest_hit(ray, forward).is_some()
    }

    fn should_reflect(&self, hit: &HitRecord, depth: u32) -> bool {
        if self.globals.ks <= 0.0 || depth >= self.config.max_depth {
            return false;
        }
        match self.config.reflection_gate {
            ReflectionGate::GlobalSpecular => true,
            ReflectionGate::MaterialReflective => hit.object.material().is_reflective(),
        }
    }

    /// Ambient floor plus every light that reaches the point.
    fn direct_lighting(&mut self, ray: &Ray, hit: &HitRecord) -> Color {
        let material = hit.object.material();
        let view = (ray.origin - hit.p).normalize_or_zero();
        let texel = self.texel(hit);
        let response = surface_response(material, &self.globals, texel);

        let mut color = ambient(material, &self.globals);

        for light in self.lights {
            let Some(sample) = LightSample::new(light, hit.p, self.config.light_attenuation)
            else {
                continue;
            };

            let shadow_ray = Ray::new(hit.p + SHADOW_EPSILON * sample.direction, sample.direction);
            self.stats.shadow_rays += 1;
            if self
                .objects
                .occluded(&shadow_ray, Interval::new(INTERSECTION_EPSILON, sample.distance))
            {
                continue;
            }

            color += direct_light(&sample, hit.normal, view, material, &self.globals, response);
        }

        color.clamp(Color::ZERO, Color::ONE)
    }

    /// Texture colour at the hit, if the material has a loadable texture.
    fn texel(&mut self, hit: &HitRecord) -> Option<Color> {
        let map = hit.object.material().active_texture()?;
        let texture = self.textures.get_or_load(&map.file)?;
        let (u, v) = hit.object.uv_at(hit.p);
        Some(texture.sample_repeat(u, v, map.repeat_u, map.repeat_v))
    }
}

/// Row-major RGB8 pixel buffer, first row at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 3],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        let i = self.index(x, y);
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i..i + 3].copy_from_slice(&color_to_rgb(color));
    }

    /// Raw RGB bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Check if every pixel is black.
    pub fn is_black(&self) -> bool {
        self.pixels.iter().all(|&b| b == 0)
    }

    /// Write the image; the format follows the file extension.
    pub fn save(&self, path: &Path) -> image::ImageResult<()> {
        image::save_buffer(
            path,
            &self.pixels,
            self.width,
            self.height,
            image::ColorType::Rgb8,
        )
    }
}

/// Clamp a color to [0, 1] and convert it to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let byte = |c: f32| (255.0 * Interval::UNIT.clamp(c)) as u8;
    [byte(color.x), byte(color.y), byte(color.z)]
}

/// Render every pixel of `image` with one eye ray each, in the mode of the
/// tracer's config.
///
/// Single-threaded: rows top to bottom, each pixel traced to completion
/// before the next.
pub fn render(camera: &Camera, tracer: &mut Tracer, image: &mut ImageBuffer) -> TraceStats {
    let generator = RayGenerator::new(camera, image.width, image.height);
    let mode = tracer.config.mode;

    for y in 0..image.height {
        for x in 0..image.width {
            let ray = generator.generate(x, y);
            tracer.stats.primary_rays += 1;

            let color = match mode {
                RenderMode::Shaded => tracer.trace(&ray, 0),
                RenderMode::IntersectOnly if tracer.hits_anything(&ray) => Color::ONE,
                RenderMode::IntersectOnly => Color::ZERO,
            };
            image.set(x, y, color);
        }
    }

    tracer.stats()
}
