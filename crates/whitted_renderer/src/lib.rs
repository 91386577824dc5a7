//! Whitted Renderer - CPU recursive ray tracing
//!
//! One eye ray per pixel against analytic primitives (cube, cylinder, cone,
//! sphere), Phong shading with hard shadows, and mirror reflection up to a
//! fixed depth.

mod camera;
mod cone;
mod cube;
mod cylinder;
mod flatten;
mod hittable;
mod renderer;
mod session;
mod shading;
mod shape;
mod sphere;

pub use camera::{generate_ray, RayGenerator};
pub use flatten::flatten;
pub use hittable::{HitRecord, ObjectList, SceneObject};
pub use renderer::{
    color_to_rgb, render, ImageBuffer, ReflectionGate, RenderConfig, RenderMode, TraceStats,
    Tracer, INTERSECTION_EPSILON, SHADOW_EPSILON,
};
pub use session::RenderSession;
pub use shading::{reflect, LightSample};
pub use shape::{Geometry, CAP_EPSILON, HALF_EXTENT, PARALLEL_EPSILON};

/// Re-export common math and scene types
pub use whitted_core::{Color, Scene, Shape};
pub use whitted_math::{Camera, Interval, Ray, Vec3};
